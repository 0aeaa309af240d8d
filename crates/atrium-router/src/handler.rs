//! View-callable handler seam.

use std::future::Future;
use std::pin::Pin;

use atrium_core::{RequestContext, Response};

/// Boxed future returned by type-erased handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A view callable: turns a request into a response.
///
/// The handler receives the mutable request context so it can read routing
/// results and register deferred callbacks before constructing its future.
///
/// # Errors
///
/// A handler error is recorded on the context as the request exception (so
/// finished callbacks can observe it) and propagated to the router's caller;
/// no response callback runs in that case.
pub trait Handler: Send + Sync {
    /// Handles the request.
    fn handle(&self, ctx: &mut RequestContext) -> BoxFuture<'static, anyhow::Result<Response>>;
}

/// Function-based handler adapter.
///
/// # Example
///
/// ```
/// use atrium_router::FnHandler;
/// use bytes::Bytes;
///
/// let handler = FnHandler::new(|_ctx| {
///     Box::pin(async {
///         Ok(http::Response::builder()
///             .body(Bytes::from_static(b"hello"))
///             .unwrap())
///     })
/// });
/// ```
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&mut RequestContext) -> BoxFuture<'static, anyhow::Result<Response>> + Send + Sync,
{
    /// Creates a handler from a function.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut RequestContext) -> BoxFuture<'static, anyhow::Result<Response>> + Send + Sync,
{
    fn handle(&self, ctx: &mut RequestContext) -> BoxFuture<'static, anyhow::Result<Response>> {
        (self.func)(ctx)
    }
}
