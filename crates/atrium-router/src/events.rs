//! Request-lifecycle notifications.
//!
//! Subscribers observe the two fixed lifecycle moments: a request entering
//! the router, and a response object coming into existence. The
//! response-created notification is always dispatched before any response
//! callback runs.

use std::fmt;
use std::sync::Arc;

use atrium_core::{RequestContext, Response};

/// Observer invoked when a request enters the router.
///
/// Receives the context mutably so it can register per-request callbacks.
pub type NewRequestSubscriber = Arc<dyn Fn(&mut RequestContext) + Send + Sync>;

/// Observer invoked once a response object exists, before any response
/// callback runs.
pub type NewResponseSubscriber = Arc<dyn Fn(&mut RequestContext, &Response) + Send + Sync>;

/// Ordered subscriber lists for the lifecycle notifications.
///
/// Subscribers run in registration order.
#[derive(Default, Clone)]
pub struct Subscribers {
    new_request: Vec<NewRequestSubscriber>,
    new_response: Vec<NewResponseSubscriber>,
}

impl Subscribers {
    /// Creates empty subscriber lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for requests entering the router.
    pub fn on_new_request<F>(&mut self, subscriber: F)
    where
        F: Fn(&mut RequestContext) + Send + Sync + 'static,
    {
        self.new_request.push(Arc::new(subscriber));
    }

    /// Registers an observer for created responses.
    pub fn on_new_response<F>(&mut self, subscriber: F)
    where
        F: Fn(&mut RequestContext, &Response) + Send + Sync + 'static,
    {
        self.new_response.push(Arc::new(subscriber));
    }

    pub(crate) fn notify_new_request(&self, ctx: &mut RequestContext) {
        for subscriber in &self.new_request {
            subscriber(ctx);
        }
    }

    pub(crate) fn notify_new_response(&self, ctx: &mut RequestContext, response: &Response) {
        for subscriber in &self.new_response {
            subscriber(ctx, response);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("new_request", &self.new_request.len())
            .field("new_response", &self.new_response.len())
            .finish()
    }
}
