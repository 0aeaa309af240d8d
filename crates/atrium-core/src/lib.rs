//! # Atrium Core
//!
//! Per-request context and deferred-callback lifecycle for the Atrium
//! framework.
//!
//! This crate provides the foundational request-scoped types:
//!
//! - [`RequestContext`] - Per-request state wrapping the inbound HTTP request
//! - [`ResponseCallback`] / [`FinishedCallback`] - Deferred actions drained by
//!   the router at fixed lifecycle points
//! - [`Environ`] - The gateway environment mapping behind the dict-style
//!   facade
//! - [`Registry`] / [`ServiceRegistry`] - Lookup for external collaborators
//! - [`SessionFactory`] / [`UrlGenerator`] - Narrow seams to session and URL
//!   construction services
//! - [`route_request_iface`] - Marker tags for capability-based view dispatch
//!
//! The router that drives a [`RequestContext`] through its lifecycle lives in
//! `atrium-router`; this crate only defines the contract it honors: response
//! callbacks drain FIFO once a valid response exists, finished callbacks
//! drain FIFO unconditionally at the very end, and a callback error halts the
//! drain it occurred in.

#![doc(html_root_url = "https://docs.rs/atrium-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod environ;
mod error;
mod iface;
mod registry;
mod request;
mod session;
mod tmpl;
mod url;

pub use environ::Environ;
pub use error::{CoreError, CoreResult};
pub use iface::{route_request_iface, IfaceTag, RouteIfaces, REQUEST_IFACE_ID};
pub use registry::{Registry, ServiceRegistry};
pub use request::{
    add_global_response_headers, FinishedCallback, Request, RequestContext, RequestId, Response,
    ResponseCallback, RouteMatch,
};
pub use session::{Session, SessionFactory};
pub use tmpl::TemplateContext;
pub use url::{UrlError, UrlGenerator};
