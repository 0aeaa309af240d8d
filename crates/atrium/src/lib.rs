//! # Atrium
//!
//! **Request-lifecycle core for routing frameworks**
//!
//! Atrium provides the per-request machinery a router builds on:
//!
//! - A `RequestContext` wrapping each inbound HTTP request
//! - Two ordered deferred-callback queues: response callbacks (run once a
//!   valid response exists) and finished callbacks (run unconditionally at
//!   the very end of request processing)
//! - Lazily resolved per-request objects (session, template context)
//! - URL helpers forwarding to an external generator with the request bound
//! - A lifecycle driver that honors the drain-ordering and
//!   failure-propagation contract
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use atrium::prelude::*;
//!
//! let registry = Arc::new(ServiceRegistry::new());
//! let mut router = Router::new(my_resolver, registry);
//! router.on_new_request(|ctx| {
//!     ctx.add_finished_callback(|ctx| {
//!         if ctx.exception().is_some() {
//!             // abort the transaction
//!         }
//!         Ok(())
//!     });
//! });
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! Request → NewRequest → resolve route → handler
//!                                           ↓
//!   finished callbacks ← response callbacks ← NewResponse
//!   (always run)          (only on success)
//! ```

#![doc(html_root_url = "https://docs.rs/atrium/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use atrium_core as core;

// Re-export router types
pub use atrium_router as router;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use atrium_core::{
        add_global_response_headers, route_request_iface, CoreError, Environ, Registry, Request,
        RequestContext, RequestId, Response, RouteMatch, ServiceRegistry, Session, SessionFactory,
        TemplateContext, UrlError, UrlGenerator,
    };
    pub use atrium_router::{FnHandler, Handler, RouteResolver, Router, RouterError};
}
