//! Service lookup for request-scoped collaborators.
//!
//! The request context reaches its external collaborators (session factory,
//! URL generator) through the narrow [`Registry`] interface. The
//! [`ServiceRegistry`] here is the default implementation; applications with
//! their own component system can implement [`Registry`] over it instead.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::session::SessionFactory;
use crate::url::UrlGenerator;

/// Lookup-by-capability interface consulted by the request context.
///
/// Both lookups return `None` when nothing is registered; the request
/// context decides what that means (a configuration error for the session
/// factory and the URL helpers).
pub trait Registry: Send + Sync + fmt::Debug {
    /// Returns the registered session factory, if any.
    fn session_factory(&self) -> Option<Arc<dyn SessionFactory>>;

    /// Returns the registered URL generator, if any.
    fn url_generator(&self) -> Option<Arc<dyn UrlGenerator>>;
}

/// Default [`Registry`] implementation.
///
/// Holds the two framework capabilities plus a type-keyed utility store for
/// application services. Registration goes through `&self` so startup code
/// can configure a registry that is already shared.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use atrium_core::ServiceRegistry;
///
/// struct Mailer;
///
/// let registry = ServiceRegistry::new();
/// registry.register(Arc::new(Mailer));
/// assert!(registry.resolve::<Mailer>().is_some());
/// ```
#[derive(Default)]
pub struct ServiceRegistry {
    session_factory: RwLock<Option<Arc<dyn SessionFactory>>>,
    url_generator: RwLock<Option<Arc<dyn UrlGenerator>>>,
    utilities: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the session factory, replacing any previous one.
    pub fn set_session_factory(&self, factory: Arc<dyn SessionFactory>) {
        *self.session_factory.write() = Some(factory);
    }

    /// Registers the URL generator, replacing any previous one.
    pub fn set_url_generator(&self, generator: Arc<dyn UrlGenerator>) {
        *self.url_generator.write() = Some(generator);
    }

    /// Registers an application utility keyed by its type.
    pub fn register<T: Send + Sync + 'static>(&self, utility: Arc<T>) {
        self.utilities.write().insert(TypeId::of::<T>(), utility);
    }

    /// Resolves an application utility by type.
    ///
    /// Returns `None` if nothing of that type was registered.
    #[must_use]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.utilities
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|utility| Arc::clone(utility).downcast::<T>().ok())
    }

    /// Returns `true` if a utility of type `T` is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.utilities.read().contains_key(&TypeId::of::<T>())
    }
}

impl Registry for ServiceRegistry {
    fn session_factory(&self) -> Option<Arc<dyn SessionFactory>> {
        self.session_factory.read().clone()
    }

    fn url_generator(&self) -> Option<Arc<dyn UrlGenerator>> {
        self.url_generator.read().clone()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("has_session_factory", &self.session_factory.read().is_some())
            .field("has_url_generator", &self.url_generator.read().is_some())
            .field("utility_count", &self.utilities.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestContext;
    use crate::session::Session;

    struct NullSessionFactory;

    impl SessionFactory for NullSessionFactory {
        fn make_session(&self, _request: &RequestContext) -> Session {
            Arc::new(())
        }
    }

    #[test]
    fn test_empty_registry_has_no_capabilities() {
        let registry = ServiceRegistry::new();
        assert!(registry.session_factory().is_none());
        assert!(registry.url_generator().is_none());
    }

    #[test]
    fn test_set_session_factory() {
        let registry = ServiceRegistry::new();
        registry.set_session_factory(Arc::new(NullSessionFactory));
        assert!(registry.session_factory().is_some());
    }

    #[test]
    fn test_register_and_resolve_utility() {
        struct Clock {
            epoch: u64,
        }

        let registry = ServiceRegistry::new();
        assert!(!registry.contains::<Clock>());

        registry.register(Arc::new(Clock { epoch: 1000 }));
        assert!(registry.contains::<Clock>());

        let clock = registry.resolve::<Clock>().expect("registered");
        assert_eq!(clock.epoch, 1000);
    }

    #[test]
    fn test_resolve_missing_utility() {
        struct Absent;

        let registry = ServiceRegistry::new();
        assert!(registry.resolve::<Absent>().is_none());
    }

    #[test]
    fn test_debug_output() {
        let registry = ServiceRegistry::new();
        let debug = format!("{registry:?}");
        assert!(debug.contains("ServiceRegistry"));
        assert!(debug.contains("utility_count"));
    }
}
