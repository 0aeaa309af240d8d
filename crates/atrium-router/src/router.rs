//! The request-processing pipeline driver.
//!
//! One [`RequestContext`] is created per inbound request and driven through
//! the fixed lifecycle: new-request notification, route resolution, handler
//! invocation, new-response notification, response-callback drain, and the
//! unconditional finished-callback drain as the final step.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use thiserror::Error;

use atrium_core::{Registry, Request, RequestContext, Response};

use crate::events::Subscribers;
use crate::handler::Handler;
use crate::resolver::RouteResolver;

/// Errors surfaced by request processing.
#[derive(Error, Debug)]
pub enum RouterError {
    /// No route matched the request.
    #[error("no route matched {method} {path}")]
    NotFound {
        /// The request method.
        method: Method,
        /// The request path.
        path: String,
    },

    /// A route matched but no handler is registered under its name.
    #[error("no handler registered for route '{route}'")]
    NoHandler {
        /// The matched route name.
        route: String,
    },

    /// The view handler failed.
    #[error("handler for route '{route}' failed: {error}")]
    Handler {
        /// The matched route name.
        route: String,
        /// The handler's error, shared with the request context's exception
        /// field.
        error: Arc<anyhow::Error>,
    },

    /// A response or finished callback failed; the inner error is the
    /// callback's own, unmodified.
    #[error("callback failed: {0}")]
    Callback(anyhow::Error),
}

/// Drives requests through the processing lifecycle.
///
/// The router owns the route resolver, the handler table, the lifecycle
/// subscribers, and the service registry it hands to every request context.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use atrium_core::ServiceRegistry;
/// use atrium_router::Router;
///
/// # struct NoRoutes;
/// # impl atrium_router::RouteResolver for NoRoutes {
/// #     fn resolve(
/// #         &self,
/// #         _request: &atrium_core::RequestContext,
/// #     ) -> Option<(atrium_core::RouteMatch, std::collections::HashMap<String, String>)> {
/// #         None
/// #     }
/// # }
/// let registry = Arc::new(ServiceRegistry::new());
/// let mut router = Router::new(Arc::new(NoRoutes), registry);
/// router.on_new_request(|ctx| {
///     ctx.add_finished_callback(|_ctx| Ok(()));
/// });
/// ```
pub struct Router {
    resolver: Arc<dyn RouteResolver>,
    handlers: HashMap<String, Arc<dyn Handler>>,
    subscribers: Subscribers,
    registry: Arc<dyn Registry>,
}

impl Router {
    /// Creates a router over the given resolver and registry.
    #[must_use]
    pub fn new(resolver: Arc<dyn RouteResolver>, registry: Arc<dyn Registry>) -> Self {
        Self {
            resolver,
            handlers: HashMap::new(),
            subscribers: Subscribers::new(),
            registry,
        }
    }

    /// Registers the handler invoked for the route named `route_name`.
    pub fn add_handler(&mut self, route_name: impl Into<String>, handler: Arc<dyn Handler>) {
        self.handlers.insert(route_name.into(), handler);
    }

    /// Registers an observer for requests entering the router.
    pub fn on_new_request<F>(&mut self, subscriber: F)
    where
        F: Fn(&mut RequestContext) + Send + Sync + 'static,
    {
        self.subscribers.on_new_request(subscriber);
    }

    /// Registers an observer for created responses.
    ///
    /// New-response observers always run before any response callback.
    pub fn on_new_response<F>(&mut self, subscriber: F)
    where
        F: Fn(&mut RequestContext, &Response) + Send + Sync + 'static,
    {
        self.subscribers.on_new_response(subscriber);
    }

    /// Processes one inbound request through the full lifecycle.
    ///
    /// Response callbacks run only if the handler produced a valid response,
    /// strictly after the new-response notification. Finished callbacks run
    /// as the last step no matter how the request fared; the context is
    /// dropped when this method returns.
    ///
    /// # Errors
    ///
    /// - [`RouterError::NotFound`] / [`RouterError::NoHandler`] when dispatch
    ///   fails before a handler runs
    /// - [`RouterError::Handler`] when the handler fails; the same error is
    ///   recorded on the context for finished callbacks to observe
    /// - [`RouterError::Callback`] when a drain was halted by a failing
    ///   callback
    pub async fn handle_request(&self, request: Request) -> Result<Response, RouterError> {
        let mut ctx = RequestContext::new(request, Arc::clone(&self.registry));
        tracing::debug!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = ctx.path(),
            "request received"
        );

        self.subscribers.notify_new_request(&mut ctx);

        let result = match self.dispatch(&mut ctx).await {
            Ok(mut response) => {
                // Response callbacks run strictly after the response-created
                // notification has been dispatched.
                self.subscribers.notify_new_response(&mut ctx, &response);
                match ctx.process_response_callbacks(&mut response) {
                    Ok(()) => Ok(response),
                    Err(error) => Err(RouterError::Callback(error)),
                }
            }
            Err(error) => Err(error),
        };

        // The finished drain is the guaranteed final step of request
        // processing.
        let finished = ctx.process_finished_callbacks();

        match (result, finished) {
            (Ok(response), Ok(())) => {
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    status = %response.status(),
                    "request complete"
                );
                Ok(response)
            }
            (Ok(_), Err(error)) => Err(RouterError::Callback(error)),
            (Err(primary), Ok(())) => Err(primary),
            (Err(primary), Err(error)) => {
                // A failing finished callback must not mask the error that
                // already failed the request.
                tracing::error!(
                    request_id = %ctx.request_id(),
                    error = %error,
                    "finished callback failed after request error"
                );
                Err(primary)
            }
        }
    }

    async fn dispatch(&self, ctx: &mut RequestContext) -> Result<Response, RouterError> {
        let Some((route, params)) = self.resolver.resolve(ctx) else {
            return Err(RouterError::NotFound {
                method: ctx.method().clone(),
                path: ctx.path().to_string(),
            });
        };

        let route_name = route.name().to_string();
        tracing::debug!(
            request_id = %ctx.request_id(),
            route = %route_name,
            "route matched"
        );
        ctx.set_matched_route(route);
        ctx.set_match_dict(params);

        let handler = self
            .handlers
            .get(&route_name)
            .ok_or_else(|| RouterError::NoHandler {
                route: route_name.clone(),
            })?;

        match handler.handle(ctx).await {
            Ok(response) => Ok(response),
            Err(error) => {
                let error = Arc::new(error);
                ctx.set_exception(Arc::clone(&error));
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    route = %route_name,
                    error = %error,
                    "handler failed"
                );
                Err(RouterError::Handler {
                    route: route_name,
                    error,
                })
            }
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("handlers", &self.handlers.len())
            .field("subscribers", &self.subscribers)
            .field("registry", &self.registry)
            .finish()
    }
}
