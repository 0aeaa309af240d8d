//! # Atrium Test
//!
//! Test utilities for the Atrium framework:
//!
//! - [`TestRequest`] - Builder for in-memory requests and request contexts
//! - [`CountingSessionFactory`] / [`StaticUrlGenerator`] - Doubles for
//!   registry-resolved services
//! - [`EventLog`] - Shared append-only recorder for lifecycle-ordering
//!   assertions
//! - [`empty_response`] / [`text_response`] - Response constructors

#![doc(html_root_url = "https://docs.rs/atrium-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod recorder;
mod request;
mod response;
mod services;

pub use recorder::EventLog;
pub use request::TestRequest;
pub use response::{empty_response, text_response};
pub use services::{CountingSessionFactory, StaticUrlGenerator};
