//! # Atrium Router
//!
//! Request-processing lifecycle driver for the Atrium framework.
//!
//! The [`Router`] creates one `RequestContext` per inbound request and walks
//! it through the fixed lifecycle:
//!
//! ```text
//! Request → NewRequest notification → route resolution → handler
//!                                                           ↓
//!            finished-callback drain ← response-callback drain ← NewResponse notification
//!            (always runs)             (only on success)
//! ```
//!
//! Route matching itself lives behind the [`RouteResolver`] seam; this crate
//! owns the ordering and failure-propagation contract, not the matching
//! algorithm.

#![doc(html_root_url = "https://docs.rs/atrium-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod events;
mod handler;
mod resolver;
mod router;

pub use events::{NewRequestSubscriber, NewResponseSubscriber, Subscribers};
pub use handler::{BoxFuture, FnHandler, Handler};
pub use resolver::RouteResolver;
pub use router::{Router, RouterError};
