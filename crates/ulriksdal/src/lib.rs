#![forbid(unsafe_code)]

//! Ulriksdal: algorithm registries, bootstrap and the transform pipeline
//! for XML Signature.
//!
//! Call [`init`] once before looking anything up. It populates the
//! process-wide [`AlgorithmRegistry`] from the bundled configuration, or
//! from the file named by `ULRIKSDAL_RESOURCE_CONFIG`.

pub use ulriksdal_core as core;
pub use ulriksdal_registry as registry;
pub use ulriksdal_transforms as transforms;
pub use ulriksdal_crypto as crypto;
pub use ulriksdal_resolver as resolver;
pub use ulriksdal_init as init;

pub use ulriksdal_core::{Error, Result};
pub use ulriksdal_init::{global, AlgorithmRegistry, DefaultResources, InitOptions, InitReport};

/// Initialize the process-wide registry from the bundled configuration, or
/// from the path in `ULRIKSDAL_RESOURCE_CONFIG` when set.
pub fn init() -> Result<&'static InitReport> {
    global().init(&DefaultResources::new(), &InitOptions::from_env())
}
