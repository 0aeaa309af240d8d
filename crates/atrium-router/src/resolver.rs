//! Route-resolution seam.

use std::collections::HashMap;

use atrium_core::{RequestContext, RouteMatch};

/// External owner of the route-matching algorithm.
///
/// The router consults the resolver exactly once per request, before the
/// handler runs. Returning `None` means no route matched; the router then
/// fails the request with a not-found error without invoking any handler.
pub trait RouteResolver: Send + Sync {
    /// Matches `request` against the configured routes.
    ///
    /// On a match, returns the matched route and the path parameters
    /// extracted from the request path.
    fn resolve(&self, request: &RequestContext) -> Option<(RouteMatch, HashMap<String, String>)>;
}
