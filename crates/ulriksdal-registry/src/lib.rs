#![forbid(unsafe_code)]

//! Algorithm registries for the Ulriksdal XML Security toolkit.
//!
//! A [`Registry`] binds an identifier (an algorithm URI, or an implementation
//! identifier for resolver chains) to a [`Descriptor`] that can construct the
//! implementation on demand. Reads are wait-free snapshot loads; writes
//! publish a new snapshot atomically so a lookup sees either the old or the
//! new descriptor, never a partial one.

pub mod category;
pub mod descriptor;
pub mod error;
pub mod prefix;
pub mod registry;

pub use category::Category;
pub use descriptor::{Descriptor, Factory};
pub use error::{PrefixConflict, RegistrationError, Unresolved};
pub use prefix::NamespacePrefixTable;
pub use registry::Registry;
