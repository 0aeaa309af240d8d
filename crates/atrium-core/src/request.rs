//! The per-request context and its deferred-callback queues.
//!
//! A [`RequestContext`] is created by the router once per inbound request,
//! lives for the duration of that request's processing, and is discarded
//! after the finished callbacks have run. It wraps the immutable inbound
//! request by composition and adds the two callback queues, the transient
//! routing fields the router fills in, and the URL forwarding helpers.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri, Version};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::environ::Environ;
use crate::error::{CoreError, CoreResult};
use crate::registry::Registry;
use crate::session::Session;
use crate::tmpl::TemplateContext;
use crate::url::{UrlError, UrlGenerator};

/// The inbound HTTP request type wrapped by [`RequestContext`].
///
/// Requests arrive fully ingested; the body is a plain byte buffer.
pub type Request = http::Request<Bytes>;

/// The HTTP response type that response callbacks operate on.
pub type Response = http::Response<Bytes>;

/// A deferred action run once a response object exists.
///
/// Receives the request context and the response; errors halt the drain and
/// propagate to the router unmodified.
pub type ResponseCallback =
    Box<dyn FnOnce(&mut RequestContext, &mut Response) -> anyhow::Result<()> + Send>;

/// A deferred action run unconditionally at the end of request processing.
pub type FinishedCallback = Box<dyn FnOnce(&mut RequestContext) -> anyhow::Result<()> + Send>;

/// A unique identifier for each request, using UUID v7.
///
/// Time-ordered, which makes it suitable for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The route the router matched for this request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMatch {
    name: String,
    pattern: String,
}

impl RouteMatch {
    /// Creates a route match from a route name and its path pattern.
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// Returns the route name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path pattern the route was registered with.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Per-request state carried through request processing.
///
/// Application code registers deferred work through
/// [`add_response_callback`](Self::add_response_callback) and
/// [`add_finished_callback`](Self::add_finished_callback); the router drains
/// both queues at the points fixed by the lifecycle contract. The wrapped
/// request is immutable; its fields are reachable through the forwarding
/// accessors.
///
/// One context exists per inbound request. It is not shared across threads
/// and not reused across requests.
pub struct RequestContext {
    request_id: RequestId,
    inner: Request,
    environ: Environ,
    response_callbacks: VecDeque<ResponseCallback>,
    finished_callbacks: VecDeque<FinishedCallback>,
    exception: Option<Arc<anyhow::Error>>,
    matched_route: Option<RouteMatch>,
    match_dict: Option<HashMap<String, String>>,
    tmpl_context: Option<TemplateContext>,
    session: Option<Session>,
    registry: Arc<dyn Registry>,
}

impl RequestContext {
    /// Creates a context wrapping `inner` with an empty environment.
    #[must_use]
    pub fn new(inner: Request, registry: Arc<dyn Registry>) -> Self {
        Self::with_environ(inner, Environ::new(), registry)
    }

    /// Creates a context wrapping `inner` with the gateway environment the
    /// request arrived with.
    #[must_use]
    pub fn with_environ(inner: Request, environ: Environ, registry: Arc<dyn Registry>) -> Self {
        Self {
            request_id: RequestId::new(),
            inner,
            environ,
            response_callbacks: VecDeque::new(),
            finished_callbacks: VecDeque::new(),
            exception: None,
            matched_route: None,
            match_dict: None,
            tmpl_context: None,
            session: None,
            registry,
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the wrapped inbound request.
    #[must_use]
    pub fn inner(&self) -> &Request {
        &self.inner
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Returns the HTTP version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Returns the request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    /// Returns the service registry this request resolves collaborators from.
    #[must_use]
    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Deferred callbacks
    // ------------------------------------------------------------------

    /// Adds a callback to be called by the router once a response object has
    /// been successfully created.
    ///
    /// Callbacks run in the order they were added, strictly after the
    /// response-created notification has been dispatched to subscribers.
    /// None of them run if request processing fails before a valid response
    /// exists. Errors are not handled specially: a failing callback halts
    /// the drain and the error propagates to the router's caller.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use atrium_core::{RequestContext, ServiceRegistry};
    /// use bytes::Bytes;
    ///
    /// let registry = Arc::new(ServiceRegistry::new());
    /// let request = http::Request::builder().body(Bytes::new()).unwrap();
    /// let mut ctx = RequestContext::new(request, registry);
    ///
    /// ctx.add_response_callback(|_ctx, response| {
    ///     response.headers_mut().insert(
    ///         http::header::CACHE_CONTROL,
    ///         http::HeaderValue::from_static("max-age=360"),
    ///     );
    ///     Ok(())
    /// });
    /// ```
    pub fn add_response_callback<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut RequestContext, &mut Response) -> anyhow::Result<()> + Send + 'static,
    {
        self.response_callbacks.push_back(Box::new(callback));
    }

    /// Adds a callback to be called unconditionally by the router at the
    /// very end of request processing.
    ///
    /// Finished callbacks run in the order they were added, even when request
    /// processing failed and no response callback ever ran. They run after
    /// response handling has completed, so mutations to the request have no
    /// further effect on the response. The error contract matches
    /// [`add_response_callback`](Self::add_response_callback): a failing
    /// callback halts the drain.
    pub fn add_finished_callback<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut RequestContext) -> anyhow::Result<()> + Send + 'static,
    {
        self.finished_callbacks.push_back(Box::new(callback));
    }

    /// Drains the response-callback queue against `response`.
    ///
    /// Router-facing; called exactly once per request, after a valid response
    /// exists and the response-created notification has been dispatched.
    ///
    /// Each callback is removed from the queue before it is invoked, so a
    /// callback that enqueues another response callback during its own
    /// execution still gets that callback visited in this same pass.
    pub fn process_response_callbacks(&mut self, response: &mut Response) -> anyhow::Result<()> {
        tracing::trace!(
            request_id = %self.request_id,
            queued = self.response_callbacks.len(),
            "draining response callbacks"
        );
        while let Some(callback) = self.response_callbacks.pop_front() {
            callback(self, response)?;
        }
        Ok(())
    }

    /// Drains the finished-callback queue.
    ///
    /// Router-facing; called exactly once per request as the final step of
    /// request processing, regardless of whether a response was produced.
    /// Same removal-before-invocation loop as
    /// [`process_response_callbacks`](Self::process_response_callbacks).
    pub fn process_finished_callbacks(&mut self) -> anyhow::Result<()> {
        tracing::trace!(
            request_id = %self.request_id,
            queued = self.finished_callbacks.len(),
            "draining finished callbacks"
        );
        while let Some(callback) = self.finished_callbacks.pop_front() {
            callback(self)?;
        }
        Ok(())
    }

    /// Returns the number of response callbacks still queued.
    #[must_use]
    pub fn pending_response_callbacks(&self) -> usize {
        self.response_callbacks.len()
    }

    /// Returns the number of finished callbacks still queued.
    #[must_use]
    pub fn pending_finished_callbacks(&self) -> usize {
        self.finished_callbacks.len()
    }

    // ------------------------------------------------------------------
    // Router-set transient fields
    // ------------------------------------------------------------------

    /// Returns the error raised by the view handler, if any.
    ///
    /// Set by the router before finished callbacks run, so a finished
    /// callback can decide between commit and abort style cleanup.
    #[must_use]
    pub fn exception(&self) -> Option<&anyhow::Error> {
        self.exception.as_deref()
    }

    /// Records the view handler's error. Router-facing.
    pub fn set_exception(&mut self, error: Arc<anyhow::Error>) {
        self.exception = Some(error);
    }

    /// Returns the matched route, if routing has happened.
    #[must_use]
    pub fn matched_route(&self) -> Option<&RouteMatch> {
        self.matched_route.as_ref()
    }

    /// Records the matched route. Router-facing, set once per request.
    pub fn set_matched_route(&mut self, route: RouteMatch) {
        self.matched_route = Some(route);
    }

    /// Returns the path parameters extracted by route matching, if any.
    #[must_use]
    pub fn match_dict(&self) -> Option<&HashMap<String, String>> {
        self.match_dict.as_ref()
    }

    /// Records the extracted path parameters. Router-facing.
    pub fn set_match_dict(&mut self, params: HashMap<String, String>) {
        self.match_dict = Some(params);
    }

    // ------------------------------------------------------------------
    // Lazily created per-request objects
    // ------------------------------------------------------------------

    /// Returns the session associated with this request.
    ///
    /// On first access the session factory registered on the service
    /// registry is invoked with this request; the result is cached and every
    /// later access returns the same object without invoking the factory
    /// again.
    ///
    /// # Errors
    ///
    /// [`CoreError::SessionFactoryMissing`] if no factory is registered. The
    /// failure is not cached; a later access after a factory has been
    /// registered succeeds.
    pub fn session(&mut self) -> CoreResult<Session> {
        if let Some(session) = &self.session {
            return Ok(Arc::clone(session));
        }
        let factory = self
            .registry
            .session_factory()
            .ok_or(CoreError::SessionFactoryMissing)?;
        let session = factory.make_session(self);
        self.session = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Returns the template context, creating it on first access.
    ///
    /// A compatibility shim for template glue; the framework itself never
    /// reads it.
    pub fn tmpl_context(&mut self) -> &mut TemplateContext {
        self.tmpl_context.get_or_insert_with(TemplateContext::new)
    }

    // ------------------------------------------------------------------
    // URL forwarding helpers
    // ------------------------------------------------------------------

    /// Returns the URL for the route named `route_name`.
    ///
    /// Forwards to the registered URL generator with this request as the
    /// request argument; `elements` and `query` pass through unchanged and
    /// the generator's result is returned verbatim.
    pub fn route_url(
        &self,
        route_name: &str,
        elements: &[&str],
        query: &[(&str, &str)],
    ) -> Result<String, UrlError> {
        self.url_generator()?
            .route_url(route_name, self, elements, query)
    }

    /// Returns the URL for a resource object. Same forwarding contract as
    /// [`route_url`](Self::route_url).
    pub fn resource_url(
        &self,
        resource: &dyn std::any::Any,
        elements: &[&str],
        query: &[(&str, &str)],
    ) -> Result<String, UrlError> {
        self.url_generator()?
            .resource_url(resource, self, elements, query)
    }

    /// Returns a fully qualified URL for a static asset path. Same
    /// forwarding contract as [`route_url`](Self::route_url).
    pub fn static_url(&self, path: &str, query: &[(&str, &str)]) -> Result<String, UrlError> {
        self.url_generator()?.static_url(path, self, query)
    }

    fn url_generator(&self) -> Result<Arc<dyn UrlGenerator>, UrlError> {
        self.registry.url_generator().ok_or(UrlError::GeneratorMissing)
    }

    // ------------------------------------------------------------------
    // Environment-mapping facade
    // ------------------------------------------------------------------

    /// Returns the gateway environment mapping.
    #[must_use]
    pub fn environ(&self) -> &Environ {
        &self.environ
    }

    /// Returns the gateway environment mapping mutably.
    pub fn environ_mut(&mut self) -> &mut Environ {
        &mut self.environ
    }

    /// Returns `true` if the environment contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.environ.contains_key(key)
    }

    /// Returns the environment value under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.environ.get(key)
    }

    /// Inserts an environment entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.environ.insert(key, value)
    }

    /// Removes an environment entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.environ.remove(key)
    }

    /// Removes and returns the most recently inserted environment entry.
    pub fn pop(&mut self) -> Option<(String, Value)> {
        self.environ.pop()
    }

    /// Returns the environment value under `key`, inserting the result of
    /// `default` first if the key is absent.
    pub fn get_or_insert_with(
        &mut self,
        key: impl Into<String>,
        default: impl FnOnce() -> Value,
    ) -> &mut Value {
        self.environ.get_or_insert_with(key, default)
    }

    /// Merges entries into the environment, overwriting existing keys.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.environ.extend(entries);
    }

    /// Returns the number of environment entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.environ.len()
    }

    /// Returns `true` if the environment has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environ.is_empty()
    }

    /// Iterates over environment entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.environ.iter()
    }

    /// Iterates over environment keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.environ.keys()
    }

    /// Iterates over environment values.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.environ.values()
    }
}

impl<'a> IntoIterator for &'a RequestContext {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.environ.into_iter()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("method", self.inner.method())
            .field("uri", self.inner.uri())
            .field("response_callbacks", &self.response_callbacks.len())
            .field("finished_callbacks", &self.finished_callbacks.len())
            .field("matched_route", &self.matched_route)
            .field("has_exception", &self.exception.is_some())
            .finish()
    }
}

/// Registers one response callback on `request` that appends every header
/// pair to the eventual response, in the given order, when the response
/// callbacks are drained.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use atrium_core::{add_global_response_headers, RequestContext, ServiceRegistry};
/// use bytes::Bytes;
/// use http::header::{HeaderName, HeaderValue};
///
/// let registry = Arc::new(ServiceRegistry::new());
/// let request = http::Request::builder().body(Bytes::new()).unwrap();
/// let mut ctx = RequestContext::new(request, registry);
///
/// add_global_response_headers(
///     &mut ctx,
///     vec![(
///         HeaderName::from_static("x-frame-options"),
///         HeaderValue::from_static("DENY"),
///     )],
/// );
/// assert_eq!(ctx.pending_response_callbacks(), 1);
/// ```
pub fn add_global_response_headers(
    request: &mut RequestContext,
    headers: Vec<(HeaderName, HeaderValue)>,
) {
    request.add_response_callback(move |_ctx, response| {
        for (name, value) in headers {
            response.headers_mut().append(name, value);
        }
        Ok(())
    });
}
