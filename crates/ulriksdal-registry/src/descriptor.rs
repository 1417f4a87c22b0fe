#![forbid(unsafe_code)]

//! Implementation descriptors.

use std::fmt;
use std::sync::Arc;

use ulriksdal_core::Error;

/// Constructor closure producing a fresh implementation instance.
pub type Factory<T> = Arc<dyn Fn() -> Result<Box<T>, Error> + Send + Sync>;

/// An immutable, constructible handle to one implementation.
pub struct Descriptor<T: ?Sized> {
    implementation: String,
    description: Option<String>,
    factory: Factory<T>,
}

impl<T: ?Sized> Descriptor<T> {
    /// Create a descriptor from an implementation identifier and a constructor.
    pub fn new<F>(implementation: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<T>, Error> + Send + Sync + 'static,
    {
        Self::from_factory(implementation, Arc::new(factory))
    }

    /// Create a descriptor sharing an existing factory.
    pub fn from_factory(implementation: impl Into<String>, factory: Factory<T>) -> Self {
        Self {
            implementation: implementation.into(),
            description: None,
            factory,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// The implementation identifier this descriptor was built from.
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn factory(&self) -> &Factory<T> {
        &self.factory
    }

    /// Construct a new instance of the implementation.
    pub fn instantiate(&self) -> Result<Box<T>, Error> {
        (self.factory)()
    }
}

impl<T: ?Sized> Clone for Descriptor<T> {
    fn clone(&self) -> Self {
        Self {
            implementation: self.implementation.clone(),
            description: self.description.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("implementation", &self.implementation)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
