#![forbid(unsafe_code)]

//! Bootstrap of the Ulriksdal algorithm registries.
//!
//! [`AlgorithmRegistry`] owns the five category registries and the namespace
//! prefix table. It is populated exactly once, either from a configuration
//! document fetched through a [`ResourceProvider`] or from compiled-in
//! default tables, and then shared by reference with every signing and
//! verification call site.

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod defaults;
pub mod options;
pub mod provider;
pub mod report;

pub use bootstrap::{global, AlgorithmRegistry, State};
pub use catalog::{Catalog, Implementation, Pluggable};
pub use config::{
    Configuration, ConfigurationLoader, Locale, PrefixMapping, RegistrationRequest, SkippedEntry,
};
pub use options::{DocumentFailurePolicy, InitOptions, CONFIG_ENV, DEFAULT_CONFIG_PATH};
pub use provider::{
    BundledResources, DefaultResources, FileSystemResources, InMemoryResources, ResourceProvider,
};
pub use report::{EntryFailure, InitMode, InitReport, Registration, Severity};
