//! Marker tags for request-capability dispatch.
//!
//! Downstream view lookup (exception views in particular) matches requests by
//! capability rather than by type. A [`IfaceTag`] is a deterministic
//! identifier for one capability; [`route_request_iface`] derives the pair of
//! tags associated with a named route.

/// Identifier of the base request capability that every request satisfies.
pub const REQUEST_IFACE_ID: &str = "IRequest";

/// A marker identifier used for dispatch-by-match.
///
/// Tags carry no data beyond their identity and the identities of the tags
/// they additionally satisfy.
///
/// # Example
///
/// ```
/// use atrium_core::{route_request_iface, IfaceTag};
///
/// let ifaces = route_request_iface("home");
/// assert!(ifaces.combined().satisfies(&IfaceTag::request()));
/// assert!(ifaces.combined().satisfies(ifaces.route()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IfaceTag {
    id: String,
    bases: Vec<String>,
}

impl IfaceTag {
    /// Creates a tag with the given identity and no bases.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bases: Vec::new(),
        }
    }

    /// Returns the base request tag.
    #[must_use]
    pub fn request() -> Self {
        Self::new(REQUEST_IFACE_ID)
    }

    /// Returns this tag's identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns `true` if this tag provides the capability identified by
    /// `other` (its own identity, or any of its declared bases).
    #[must_use]
    pub fn satisfies(&self, other: &IfaceTag) -> bool {
        self.id == other.id || self.bases.iter().any(|base| base == other.id())
    }
}

/// The pair of marker tags derived from a route name.
///
/// The plain tag means "this request matched the route"; the combined tag
/// additionally satisfies the base request capability, so exception-view
/// lookup can match either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteIfaces {
    route: IfaceTag,
    combined: IfaceTag,
}

impl RouteIfaces {
    /// Returns the route-specific tag.
    #[must_use]
    pub fn route(&self) -> &IfaceTag {
        &self.route
    }

    /// Returns the combined tag satisfying both the route-specific tag and
    /// the base request tag.
    #[must_use]
    pub fn combined(&self) -> &IfaceTag {
        &self.combined
    }
}

/// Derives the marker tags for requests matched to `route_name`.
///
/// The derivation is deterministic: calling this twice with the same name
/// yields equal tags.
#[must_use]
pub fn route_request_iface(route_name: &str) -> RouteIfaces {
    let route = IfaceTag::new(format!("{route_name}_IRequest"));
    let combined = IfaceTag {
        id: format!("{route_name}_combined_IRequest"),
        bases: vec![route.id.clone(), REQUEST_IFACE_ID.to_string()],
    };
    RouteIfaces { route, combined }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let first = route_request_iface("users");
        let second = route_request_iface("users");
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_routes_get_distinct_tags() {
        let users = route_request_iface("users");
        let groups = route_request_iface("groups");
        assert_ne!(users.route(), groups.route());
        assert_ne!(users.combined(), groups.combined());
    }

    #[test]
    fn test_combined_satisfies_both() {
        let ifaces = route_request_iface("home");
        assert!(ifaces.combined().satisfies(ifaces.route()));
        assert!(ifaces.combined().satisfies(&IfaceTag::request()));
        assert!(ifaces.combined().satisfies(ifaces.combined()));
    }

    #[test]
    fn test_plain_route_tag_does_not_satisfy_request() {
        let ifaces = route_request_iface("home");
        assert!(!ifaces.route().satisfies(&IfaceTag::request()));
        assert!(!ifaces.route().satisfies(ifaces.combined()));
    }
}
