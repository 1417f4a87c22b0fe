#![forbid(unsafe_code)]

//! The registry service and its one-shot bootstrap.

use std::convert::Infallible;
use std::fmt;
use std::sync::OnceLock;

use parking_lot::{Mutex, RwLock};
use ulriksdal_core::Error;
use ulriksdal_crypto::{signature_for, AlgorithmPolicy, KeyMaterial, SignatureAlgorithm};
use ulriksdal_registry::{Category, Descriptor, NamespacePrefixTable, RegistrationError, Registry};
use ulriksdal_resolver::{
    resolve_key, resolve_resource, KeyInfo, KeyResolver, KeyStore, ResolverScope, ResourceReference,
    ResourceResolver,
};
use ulriksdal_transforms::{Canonicalizer, Transform, TransformPipeline};

use crate::catalog::{Catalog, Pluggable};
use crate::config::{Configuration, ConfigurationLoader, Locale, RegistrationRequest};
use crate::defaults;
use crate::options::{DocumentFailurePolicy, InitOptions};
use crate::provider::ResourceProvider;
use crate::report::{EntryFailure, InitMode, InitReport, Registration, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Ready,
}

/// Serializes the Uninitialized -> Ready transition.
struct Lifecycle {
    gate: Mutex<()>,
    report: OnceLock<InitReport>,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            gate: Mutex::new(()),
            report: OnceLock::new(),
        }
    }

    /// Run `load` unless a previous call already completed one. Concurrent
    /// callers wait on the gate and then observe the winner's report.
    fn run<E>(&self, load: impl FnOnce() -> Result<InitReport, E>) -> Result<&InitReport, E> {
        if let Some(report) = self.report.get() {
            return Ok(report);
        }
        let _gate = self.gate.lock();
        if let Some(report) = self.report.get() {
            return Ok(report);
        }
        let report = load()?;
        Ok(self.report.get_or_init(|| report))
    }
}

/// The five category registries, the namespace prefix table and the
/// bootstrap state that populates them.
pub struct AlgorithmRegistry {
    canonicalizers: Registry<dyn Canonicalizer>,
    transforms: Registry<dyn Transform>,
    signatures: Registry<dyn SignatureAlgorithm>,
    resource_resolvers: Registry<dyn ResourceResolver>,
    key_resolvers: Registry<dyn KeyResolver>,
    prefixes: NamespacePrefixTable,
    catalog: Catalog,
    locale: RwLock<Option<Locale>>,
    provider_mappings: RwLock<Option<String>>,
    lifecycle: Lifecycle,
}

impl AlgorithmRegistry {
    /// An uninitialized registry backed by the built-in catalog.
    pub fn new() -> Self {
        Self::with_catalog(Catalog::builtin())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            canonicalizers: Registry::new(Category::Canonicalizer),
            transforms: Registry::new(Category::Transform),
            signatures: Registry::new(Category::SignatureAlgorithm),
            resource_resolvers: Registry::new(Category::ResourceResolver),
            key_resolvers: Registry::new(Category::KeyResolver),
            prefixes: NamespacePrefixTable::new(),
            catalog,
            locale: RwLock::new(None),
            provider_mappings: RwLock::new(None),
            lifecycle: Lifecycle::new(),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    pub fn state(&self) -> State {
        if self.lifecycle.report.get().is_some() {
            State::Ready
        } else {
            State::Uninitialized
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state() == State::Ready
    }

    /// The report of the bootstrap that made this registry ready.
    pub fn report(&self) -> Option<&InitReport> {
        self.lifecycle.report.get()
    }

    /// Populate the registries from the configuration document.
    ///
    /// Runs at most once; later and concurrent calls return the first
    /// completed report whatever their arguments. Entry failures are
    /// recorded in the report and never fail the call. A document that
    /// cannot be fetched or parsed fails the call under
    /// [`DocumentFailurePolicy::Strict`], leaving the registry uninitialized.
    pub fn init(
        &self,
        provider: &dyn ResourceProvider,
        options: &InitOptions,
    ) -> Result<&InitReport, Error> {
        self.lifecycle.run(|| {
            let path = options.config_path();
            let mut report = InitReport::new(InitMode::Configuration {
                path: path.to_owned(),
            });

            match provider.load(path).and_then(|text| ConfigurationLoader::parse(&text)) {
                Ok(config) => self.apply(config, &mut report),
                Err(e) => match options.failure_policy {
                    DocumentFailurePolicy::Strict => {
                        tracing::error!(path, error = %e, "cannot load configuration document");
                        return Err(e);
                    }
                    DocumentFailurePolicy::Lenient => {
                        tracing::error!(
                            path,
                            error = %e,
                            "cannot load configuration document, continuing with empty registries"
                        );
                        report.document_error = Some(e);
                    }
                },
            }

            log_completion(&report);
            Ok(report)
        })
    }

    /// Populate the registries from the compiled-in tables: namespace
    /// prefixes, transforms and signature algorithms. Runs at most once, and
    /// not at all if [`init`](Self::init) already completed.
    pub fn init_defaults(&self) -> &InitReport {
        let outcome = self.lifecycle.run(|| -> Result<InitReport, Infallible> {
            let mut report = InitReport::new(InitMode::Defaults);
            let (language, country) = defaults::LOCALE;
            *self.locale.write() = Some(Locale::new(language, country));

            for (namespace, prefix) in defaults::NAMESPACE_PREFIXES {
                self.bind_prefix(namespace, prefix, &mut report);
            }
            for (uri, implementation) in defaults::TRANSFORMS {
                let outcome = self.register_implementation::<dyn Transform>(uri, implementation);
                record(&mut report, Category::Transform, uri, implementation, outcome);
            }
            for (uri, implementation) in defaults::SIGNATURES {
                let outcome =
                    self.register_implementation::<dyn SignatureAlgorithm>(uri, implementation);
                record(&mut report, Category::SignatureAlgorithm, uri, implementation, outcome);
            }

            log_completion(&report);
            Ok(report)
        });
        match outcome {
            Ok(report) => report,
            Err(never) => match never {},
        }
    }

    fn apply(&self, config: Configuration, report: &mut InitReport) {
        if let Some(locale) = config.locale {
            *self.locale.write() = Some(locale);
        }
        if let Some(mappings) = config.provider_mappings {
            *self.provider_mappings.write() = Some(mappings);
        }
        for request in &config.requests {
            let outcome = self.register_request(request);
            record(report, request.category, &request.id, &request.implementation, outcome);
        }
        for mapping in &config.prefix_mappings {
            self.bind_prefix(&mapping.namespace, &mapping.prefix, report);
        }
        report.skipped = config.skipped;
    }

    fn register_request(&self, request: &RegistrationRequest) -> Result<(), RegistrationError> {
        let RegistrationRequest {
            category,
            id,
            implementation,
            description,
        } = request;
        let description = description.as_deref();
        match category {
            Category::Canonicalizer => {
                self.register_described::<dyn Canonicalizer>(id, implementation, description)
            }
            Category::Transform => {
                self.register_described::<dyn Transform>(id, implementation, description)
            }
            Category::SignatureAlgorithm => {
                self.register_described::<dyn SignatureAlgorithm>(id, implementation, description)
            }
            Category::ResourceResolver => {
                self.register_described::<dyn ResourceResolver>(id, implementation, description)
            }
            Category::KeyResolver => {
                self.register_described::<dyn KeyResolver>(id, implementation, description)
            }
        }
    }

    fn bind_prefix(&self, namespace: &str, prefix: &str, report: &mut InitReport) {
        if let Err(conflict) = self.prefixes.set_default_prefix(namespace, prefix) {
            tracing::warn!(error = %conflict, namespace, "prefix mapping ignored");
            report.prefix_conflicts.push(conflict);
        }
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Register the catalog implementation `implementation` under `id` in
    /// the registry of category `T`. Allowed at any time; a registration
    /// after bootstrap is visible to every later lookup.
    pub fn register_implementation<T: Pluggable + ?Sized>(
        &self,
        id: &str,
        implementation: &str,
    ) -> Result<(), RegistrationError> {
        self.register_described::<T>(id, implementation, None)
    }

    fn register_described<T: Pluggable + ?Sized>(
        &self,
        id: &str,
        implementation: &str,
        description: Option<&str>,
    ) -> Result<(), RegistrationError> {
        let factory = self.catalog.resolve::<T>(id, implementation)?;
        let mut descriptor = Descriptor::from_factory(implementation, factory);
        if let Some(description) = description {
            descriptor = descriptor.with_description(description);
        }
        T::registry(self).register(id, descriptor)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn canonicalizers(&self) -> &Registry<dyn Canonicalizer> {
        &self.canonicalizers
    }

    pub fn transforms(&self) -> &Registry<dyn Transform> {
        &self.transforms
    }

    pub fn signatures(&self) -> &Registry<dyn SignatureAlgorithm> {
        &self.signatures
    }

    pub fn resource_resolvers(&self) -> &Registry<dyn ResourceResolver> {
        &self.resource_resolvers
    }

    pub fn key_resolvers(&self) -> &Registry<dyn KeyResolver> {
        &self.key_resolvers
    }

    pub fn prefixes(&self) -> &NamespacePrefixTable {
        &self.prefixes
    }

    /// The implementation catalog. Hosts provide engine-backed
    /// implementations here before bootstrap.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn locale(&self) -> Option<Locale> {
        self.locale.read().clone()
    }

    /// The verbatim `JCEAlgorithmMappings` element of the loaded document.
    pub fn provider_mappings(&self) -> Option<String> {
        self.provider_mappings.read().clone()
    }

    // ── Call-site helpers ────────────────────────────────────────────

    pub fn pipeline(&self) -> TransformPipeline<'_> {
        TransformPipeline::new(&self.transforms, &self.canonicalizers)
    }

    pub fn signature(
        &self,
        uri: &str,
        policy: &dyn AlgorithmPolicy,
    ) -> Result<Box<dyn SignatureAlgorithm>, Error> {
        signature_for(&self.signatures, uri, policy)
    }

    pub fn resolve_resource(
        &self,
        reference: &ResourceReference,
        scope: &ResolverScope,
    ) -> Result<Vec<u8>, Error> {
        resolve_resource(&self.resource_resolvers, reference, scope)
    }

    pub fn resolve_key(
        &self,
        info: &KeyInfo,
        keys: &KeyStore,
        scope: &ResolverScope,
    ) -> Result<KeyMaterial, Error> {
        resolve_key(&self.key_resolvers, info, keys, scope)
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("state", &self.state())
            .field("canonicalizers", &self.canonicalizers.len())
            .field("transforms", &self.transforms.len())
            .field("signatures", &self.signatures.len())
            .field("resource_resolvers", &self.resource_resolvers.len())
            .field("key_resolvers", &self.key_resolvers.len())
            .field("prefixes", &self.prefixes.len())
            .finish()
    }
}

fn record(
    report: &mut InitReport,
    category: Category,
    id: &str,
    implementation: &str,
    outcome: Result<(), RegistrationError>,
) {
    match outcome {
        Ok(()) => report.registered.push(Registration {
            category,
            id: id.to_owned(),
            implementation: implementation.to_owned(),
        }),
        Err(error) => {
            let failure = EntryFailure::new(category, error);
            match failure.severity {
                Severity::Error => tracing::error!(
                    category = %category,
                    uri = id,
                    implementation,
                    error = %failure.error,
                    "registration failed"
                ),
                Severity::Warning => tracing::warn!(
                    category = %category,
                    uri = id,
                    implementation,
                    error = %failure.error,
                    "registration skipped"
                ),
            }
            report.failures.push(failure);
        }
    }
}

fn log_completion(report: &InitReport) {
    tracing::info!(
        mode = ?report.mode,
        registered = report.registered.len(),
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "algorithm registries ready"
    );
}

/// The process-wide registry. Uninitialized until someone calls
/// [`AlgorithmRegistry::init`] or [`AlgorithmRegistry::init_defaults`] on it.
pub fn global() -> &'static AlgorithmRegistry {
    static GLOBAL: OnceLock<AlgorithmRegistry> = OnceLock::new();
    GLOBAL.get_or_init(AlgorithmRegistry::new)
}
