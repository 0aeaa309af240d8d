//! Session factory seam.
//!
//! Session implementations live outside this crate. The framework only needs
//! a way to produce one session per request, lazily, through a factory
//! registered on the service registry.

use std::any::Any;
use std::sync::Arc;

use crate::request::RequestContext;

/// An opaque per-request session object.
///
/// The core never inspects the session; consumers downcast it to the
/// concrete type their configured factory produces.
pub type Session = Arc<dyn Any + Send + Sync>;

/// External service producing a per-request session object.
///
/// Looked up on first access of `RequestContext::session` and invoked at
/// most once per request; the result is cached for the request's lifetime.
pub trait SessionFactory: Send + Sync {
    /// Creates the session object for `request`.
    fn make_session(&self, request: &RequestContext) -> Session;
}
