#![forbid(unsafe_code)]

//! Resolver chains for the Ulriksdal XML Security toolkit.
//!
//! Resource resolvers turn reference URIs into octets; key resolvers turn
//! `KeyInfo` material into usable keys. Both are tried in registration order
//! and the first resolver that claims the input handles it. Which resolvers
//! may run is narrowed per operation with a [`ResolverScope`].

pub mod chain;
pub mod key;
pub mod resource;

pub use chain::{resolve_key, resolve_resource, ResolverScope};
pub use key::{KeyInfo, KeyNameResolver, KeyResolver, KeyStore, KeyValueResolver};
pub use resource::{LocalFileResolver, ResourceReference, ResourceResolver};
