//! Legacy template-context shim.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Per-request value bag kept for template-layer compatibility.
///
/// The framework attaches no behavior to it; template glue that expects a
/// writable scratch object on the request stores typed values here. Created
/// lazily by `RequestContext::tmpl_context`, at most once per request.
#[derive(Default)]
pub struct TemplateContext {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl TemplateContext {
    /// Creates an empty template context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a typed value, replacing any previous value of the same type.
    pub fn set<T: Send + Sync + 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns the stored value of type `T`, if any.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref())
    }

    /// Removes and returns the stored value of type `T`, if any.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast().ok())
            .map(|boxed| *boxed)
    }

    /// Returns `true` if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for TemplateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateContext")
            .field("value_count", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        #[derive(Debug, PartialEq)]
        struct Breadcrumbs(Vec<String>);

        let mut tmpl = TemplateContext::new();
        assert!(tmpl.is_empty());

        tmpl.set(Breadcrumbs(vec!["home".to_string()]));
        assert_eq!(
            tmpl.get::<Breadcrumbs>(),
            Some(&Breadcrumbs(vec!["home".to_string()]))
        );
    }

    #[test]
    fn test_remove() {
        let mut tmpl = TemplateContext::new();
        tmpl.set(42_u32);

        assert_eq!(tmpl.remove::<u32>(), Some(42));
        assert!(tmpl.get::<u32>().is_none());
        assert!(tmpl.is_empty());
    }
}
