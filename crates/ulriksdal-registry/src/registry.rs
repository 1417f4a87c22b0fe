#![forbid(unsafe_code)]

//! URI-keyed registry with atomic snapshot publication.
//!
//! Readers load the current snapshot without locking. Writers copy the
//! snapshot, apply their change and publish the copy with a compare-and-swap
//! loop, so concurrent registrations are linearizable and never lost.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use ulriksdal_core::Error;

use crate::category::Category;
use crate::descriptor::Descriptor;
use crate::error::{RegistrationError, Unresolved};

type Entries<T> = IndexMap<String, Arc<Descriptor<T>>>;

/// Mapping from identifier to implementation descriptor for one category.
///
/// Iteration follows first-registration order. Re-registering an identifier
/// replaces its descriptor in place, keeping its position.
pub struct Registry<T: ?Sized> {
    category: Category,
    entries: ArcSwap<Entries<T>>,
}

impl<T: ?Sized> Registry<T> {
    /// Create an empty registry for `category`.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: ArcSwap::from_pointee(IndexMap::new()),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Register `descriptor` under `id`, replacing any previous entry.
    ///
    /// The descriptor is constructed once before publication; a factory that
    /// fails leaves the registry untouched.
    pub fn register(
        &self,
        id: impl Into<String>,
        descriptor: Descriptor<T>,
    ) -> Result<(), RegistrationError> {
        let id = id.into();
        if let Err(e) = descriptor.instantiate() {
            return Err(RegistrationError::UnresolvableImplementation {
                category: self.category,
                id,
                implementation: descriptor.implementation().to_owned(),
                reason: Unresolved::Construction(e),
            });
        }

        let descriptor = Arc::new(descriptor);
        let previous = self.entries.rcu(|current| {
            let mut next: Entries<T> = (**current).clone();
            next.insert(id.clone(), Arc::clone(&descriptor));
            next
        });

        tracing::debug!(
            category = %self.category,
            id = %id,
            implementation = %descriptor.implementation(),
            replaced = previous.contains_key(&id),
            "registered"
        );
        Ok(())
    }

    /// Look up the descriptor registered under `id`.
    pub fn lookup(&self, id: &str) -> Option<Arc<Descriptor<T>>> {
        self.entries.load().get(id).cloned()
    }

    /// Look up `id` and construct a fresh instance.
    pub fn create(&self, id: &str) -> Result<Box<T>, Error> {
        match self.lookup(id) {
            Some(descriptor) => descriptor.instantiate(),
            None => Err(Error::UnsupportedAlgorithm(format!("{}: {id}", self.category))),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.load().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Registered identifiers in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.entries.load().keys().cloned().collect()
    }

    /// A consistent point-in-time view of every entry, in registration order.
    pub fn entries(&self) -> Vec<(String, Arc<Descriptor<T>>)> {
        self.entries
            .load()
            .iter()
            .map(|(id, d)| (id.clone(), Arc::clone(d)))
            .collect()
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("category", &self.category)
            .field("ids", &self.ids())
            .finish()
    }
}
