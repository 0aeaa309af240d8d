//! URL-construction seam.
//!
//! The three URL helpers on `RequestContext` forward to an external
//! [`UrlGenerator`] registered on the service registry, passing the request
//! itself as the first argument. This crate never inspects how URLs are
//! actually built.

use std::any::Any;

use thiserror::Error;

use crate::request::RequestContext;

/// Errors produced by URL construction.
///
/// All variants except [`UrlError::GeneratorMissing`] originate in the
/// external generator and pass through the forwarding helpers untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// No URL generator has been registered on the service registry.
    #[error(
        "no URL generator registered; register one on the service registry \
         before using the URL helpers"
    )]
    GeneratorMissing,

    /// The named route is not known to the generator.
    #[error("no route named '{name}' is configured")]
    UnknownRoute {
        /// The route name that failed to resolve.
        name: String,
    },

    /// Generator-specific failure.
    #[error("URL generation failed: {message}")]
    Generation {
        /// Human-readable description of the failure.
        message: String,
    },
}

impl UrlError {
    /// Creates an [`UrlError::UnknownRoute`] for `name`.
    #[must_use]
    pub fn unknown_route(name: impl Into<String>) -> Self {
        Self::UnknownRoute { name: name.into() }
    }

    /// Creates a generator-specific failure.
    #[must_use]
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}

/// External owner of URL construction.
///
/// Implementations hold whatever route tables or asset mappings they need;
/// the request argument gives them access to scheme, host, and matched-route
/// state. Elements and query modifiers are passed through unchanged.
pub trait UrlGenerator: Send + Sync {
    /// Builds the URL for the route named `route_name`.
    fn route_url(
        &self,
        route_name: &str,
        request: &RequestContext,
        elements: &[&str],
        query: &[(&str, &str)],
    ) -> Result<String, UrlError>;

    /// Builds the URL for a resource object.
    ///
    /// The resource is opaque to the core; generators downcast it to the
    /// resource types they understand.
    fn resource_url(
        &self,
        resource: &dyn Any,
        request: &RequestContext,
        elements: &[&str],
        query: &[(&str, &str)],
    ) -> Result<String, UrlError>;

    /// Builds a fully qualified URL for a static asset path.
    fn static_url(
        &self,
        path: &str,
        request: &RequestContext,
        query: &[(&str, &str)],
    ) -> Result<String, UrlError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_route_message() {
        let err = UrlError::unknown_route("login");
        assert_eq!(err.to_string(), "no route named 'login' is configured");
    }

    #[test]
    fn test_generator_missing_message() {
        let msg = UrlError::GeneratorMissing.to_string();
        assert!(msg.contains("no URL generator registered"));
    }
}
