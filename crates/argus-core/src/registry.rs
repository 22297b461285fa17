//! Process-wide descriptor registry.
//!
//! Descriptor construction is pure but not free, and a consumer may build
//! the same entity type once per page. Descriptors are therefore built on
//! first use and cached for the process lifetime, keyed by type identity.
//! Lookups are concurrency-safe and a miss constructs the descriptor
//! exactly once even under concurrent first use.

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};

use moka::sync::Cache;

use crate::descriptor::TypeDescriptor;
use crate::error::{DefinitionError, ScrapeError};
use crate::traits::Entity;

static DESCRIPTORS: OnceLock<Cache<TypeId, Arc<dyn Any + Send + Sync>>> = OnceLock::new();

fn cache() -> &'static Cache<TypeId, Arc<dyn Any + Send + Sync>> {
    DESCRIPTORS.get_or_init(|| Cache::new(1024))
}

/// The cached descriptor for `E`, building it if this is the first use.
///
/// A failed construction is not cached: the definition error is re-raised
/// to every caller that requests the broken type.
pub fn descriptor_of<E: Entity>() -> Result<Arc<TypeDescriptor<E>>, ScrapeError> {
    let erased = cache()
        .try_get_with(TypeId::of::<E>(), || {
            E::descriptor().map(|d| Arc::new(d) as Arc<dyn Any + Send + Sync>)
        })
        .map_err(|e: Arc<DefinitionError>| ScrapeError::Definition((*e).clone()))?;
    erased
        .downcast::<TypeDescriptor<E>>()
        .map_err(|_| ScrapeError::Internal("descriptor cache returned a foreign type".into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::extract::value;

    #[test]
    fn test_descriptor_built_once_and_reused() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);

        #[derive(Default)]
        struct Counted {
            name: String,
        }
        impl Entity for Counted {
            fn descriptor() -> Result<TypeDescriptor<Self>, DefinitionError> {
                BUILDS.fetch_add(1, Ordering::SeqCst);
                TypeDescriptor::builder("Counted")
                    .field("name", |e: &mut Counted| &mut e.name)
                    .extract(value(".name"))
                    .parsed()
                    .build()
            }
        }

        let first = descriptor_of::<Counted>().unwrap();
        let second = descriptor_of::<Counted>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_use_constructs_once() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);

        #[derive(Default)]
        struct Raced {
            name: String,
        }
        impl Entity for Raced {
            fn descriptor() -> Result<TypeDescriptor<Self>, DefinitionError> {
                BUILDS.fetch_add(1, Ordering::SeqCst);
                TypeDescriptor::builder("Raced")
                    .field("name", |e: &mut Raced| &mut e.name)
                    .extract(value(".name"))
                    .parsed()
                    .build()
            }
        }

        let barrier = Barrier::new(8);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    barrier.wait();
                    descriptor_of::<Raced>().unwrap();
                });
            }
        });
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_definition_error_is_reraised_not_cached() {
        #[derive(Default)]
        struct Broken {
            name: String,
        }
        impl Entity for Broken {
            fn descriptor() -> Result<TypeDescriptor<Self>, DefinitionError> {
                TypeDescriptor::builder("Broken")
                    .field("name", |e: &mut Broken| &mut e.name)
                    .extract(value(".name"))
                    .capture("[oops")
                    .parsed()
                    .build()
            }
        }

        let first = descriptor_of::<Broken>().unwrap_err();
        assert!(first.is_definition());
        let second = descriptor_of::<Broken>().unwrap_err();
        assert!(second.is_definition());
        assert_eq!(first.to_string(), second.to_string());
    }
}
