//! Service doubles for registry-resolved collaborators.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use atrium_core::{RequestContext, Session, SessionFactory, UrlError, UrlGenerator};

/// Session factory that counts invocations and returns string sessions.
#[derive(Debug, Default)]
pub struct CountingSessionFactory {
    calls: AtomicUsize,
}

impl CountingSessionFactory {
    /// Creates a factory with a zeroed counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times the factory has been invoked.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SessionFactory for CountingSessionFactory {
    fn make_session(&self, request: &RequestContext) -> Session {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Arc::new(format!("session-{call}-{}", request.request_id()))
    }
}

/// URL generator that formats deterministic URLs from its inputs.
///
/// Useful for asserting that the forwarding helpers pass their arguments
/// through unchanged.
#[derive(Debug, Clone)]
pub struct StaticUrlGenerator {
    base: String,
}

impl StaticUrlGenerator {
    /// Creates a generator rooted at `base` (e.g. `https://test.example`).
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn join(&self, segments: &[&str], query: &[(&str, &str)]) -> String {
        let mut url = self.base.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }
}

impl Default for StaticUrlGenerator {
    fn default() -> Self {
        Self::new("https://test.example")
    }
}

impl UrlGenerator for StaticUrlGenerator {
    fn route_url(
        &self,
        route_name: &str,
        _request: &RequestContext,
        elements: &[&str],
        query: &[(&str, &str)],
    ) -> Result<String, UrlError> {
        let mut segments = vec!["route", route_name];
        segments.extend_from_slice(elements);
        Ok(self.join(&segments, query))
    }

    fn resource_url(
        &self,
        resource: &dyn Any,
        _request: &RequestContext,
        elements: &[&str],
        query: &[(&str, &str)],
    ) -> Result<String, UrlError> {
        // Resources are opaque to the core; this double understands string
        // paths and rejects everything else.
        let path = resource
            .downcast_ref::<String>()
            .ok_or_else(|| UrlError::generation("unsupported resource type"))?;
        let mut segments = vec!["resource", path.as_str()];
        segments.extend_from_slice(elements);
        Ok(self.join(&segments, query))
    }

    fn static_url(
        &self,
        path: &str,
        _request: &RequestContext,
        query: &[(&str, &str)],
    ) -> Result<String, UrlError> {
        Ok(self.join(&["static", path], query))
    }
}
