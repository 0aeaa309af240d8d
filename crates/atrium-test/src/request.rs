//! In-memory request construction.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::Method;
use serde_json::Value;

use atrium_core::{Environ, Request, RequestContext, ServiceRegistry};

/// Builder for test requests and request contexts.
///
/// # Example
///
/// ```
/// use atrium_test::TestRequest;
///
/// let ctx = TestRequest::get("/widgets/7")
///     .environ("REMOTE_ADDR", "127.0.0.1")
///     .build();
/// assert_eq!(ctx.path(), "/widgets/7");
/// ```
#[derive(Debug)]
pub struct TestRequest {
    method: Method,
    path: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    environ: Environ,
    body: Bytes,
    registry: Option<Arc<ServiceRegistry>>,
}

impl TestRequest {
    /// Starts a request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            environ: Environ::new(),
            body: Bytes::new(),
            registry: None,
        }
    }

    /// Starts a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Starts a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Adds a gateway environment entry.
    #[must_use]
    pub fn environ(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.environ.insert(key, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Uses `registry` instead of a fresh empty one.
    #[must_use]
    pub fn registry(mut self, registry: Arc<ServiceRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builds the bare HTTP request.
    #[must_use]
    pub fn build_request(&self) -> Request {
        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(self.path.as_str());
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        builder.body(self.body.clone()).expect("test request builds")
    }

    /// Builds a request context around the request.
    #[must_use]
    pub fn build(self) -> RequestContext {
        let request = self.build_request();
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(ServiceRegistry::new()));
        RequestContext::with_environ(request, self.environ, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_carries_method_path_and_environ() {
        let ctx = TestRequest::post("/submit")
            .environ("gateway.url_scheme", "https")
            .build();

        assert_eq!(ctx.method(), Method::POST);
        assert_eq!(ctx.path(), "/submit");
        assert_eq!(ctx.get("gateway.url_scheme"), Some(&json!("https")));
    }

    #[test]
    fn test_build_with_shared_registry() {
        let registry = Arc::new(ServiceRegistry::new());
        struct Marker;
        registry.register(Arc::new(Marker));

        let ctx = TestRequest::get("/").registry(Arc::clone(&registry)).build();
        let held = ctx.registry();
        assert!(format!("{held:?}").contains("utility_count: 1"));
    }
}
