#![forbid(unsafe_code)]

//! Bootstrap scenarios: file-driven and default-table population, entry
//! isolation, and concurrent initialization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::time::Duration;

use ulriksdal_core::{algorithm, Error};
use ulriksdal_init::catalog::ids;
use ulriksdal_init::{
    AlgorithmRegistry, BundledResources, DefaultResources, DocumentFailurePolicy,
    FileSystemResources, Implementation, InMemoryResources, InitMode, InitOptions,
    ResourceProvider, Severity, State,
};
use ulriksdal_registry::{Category, RegistrationError, Unresolved};
use ulriksdal_resolver::{ResolverScope, ResourceReference};
use ulriksdal_transforms::{
    Canonicalizer, IdentityTransform, Transform, TransformChain, TransformData,
};

const CONFIG_PATH: &str = "resource/config.xml";

fn document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<Configuration xmlns="http://www.xmlsecurity.org/NS/#configuration">
{body}
</Configuration>"#
    )
}

fn provider(body: &str) -> InMemoryResources {
    InMemoryResources::new().with(CONFIG_PATH, document(body))
}

/// Counts loads and holds each one long enough for racing callers to pile up.
struct CountingProvider {
    inner: InMemoryResources,
    loads: AtomicUsize,
}

impl CountingProvider {
    fn new(body: &str) -> Self {
        Self {
            inner: provider(body),
            loads: AtomicUsize::new(0),
        }
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ResourceProvider for CountingProvider {
    fn load(&self, path: &str) -> Result<String, Error> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        self.inner.load(path)
    }
}

struct StubCanonicalizer;

impl Canonicalizer for StubCanonicalizer {
    fn canonicalize(&self, xml: &str, _inclusive_prefixes: &[String]) -> Result<Vec<u8>, Error> {
        Ok(xml.trim().as_bytes().to_vec())
    }
}

const HMAC_SIGNATURES: &str = r#"
  <SignatureAlgorithms>
    <SignatureAlgorithm URI="http://www.w3.org/2000/09/xmldsig#hmac-sha1"
                        JAVACLASS="ulriksdal::crypto::HmacSha1"/>
    <SignatureAlgorithm URI="http://www.w3.org/2001/04/xmldsig-more#hmac-sha256"
                        JAVACLASS="ulriksdal::crypto::HmacSha256"/>
  </SignatureAlgorithms>"#;

#[test]
fn test_configured_canonicalizer_is_looked_up() {
    let registry = AlgorithmRegistry::new();
    registry
        .catalog()
        .provide("test::StubCanonicalizer", Implementation::canonicalizer(|| StubCanonicalizer));

    let provider = provider(
        r#"<CanonicalizationMethods>
             <CanonicalizationMethod URI="urn:test:c14n" JAVACLASS="test::StubCanonicalizer"/>
           </CanonicalizationMethods>"#,
    );
    let report = registry.init(&provider, &InitOptions::new()).unwrap();
    assert!(report.is_clean());

    let descriptor = registry.canonicalizers().lookup("urn:test:c14n").unwrap();
    assert_eq!(descriptor.implementation(), "test::StubCanonicalizer");
    let c14n = descriptor.instantiate().unwrap();
    assert_eq!(c14n.canonicalize("  <a/>\n", &[]).unwrap(), b"<a/>");
}

#[test]
fn test_concurrent_init_loads_once() {
    let registry = AlgorithmRegistry::new();
    let provider = CountingProvider::new(HMAC_SIGNATURES);
    let barrier = Barrier::new(4);
    let (registry_ref, provider_ref, barrier_ref) = (&registry, &provider, &barrier);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(move || {
                    let (registry, provider, barrier) = (registry_ref, provider_ref, barrier_ref);
                    barrier.wait();
                    let report = registry.init(provider, &InitOptions::new()).unwrap();
                    assert_eq!(registry.state(), State::Ready);
                    report.registered.len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
    });

    assert_eq!(provider.loads(), 1);
    assert!(registry.signatures().contains(algorithm::HMAC_SHA1));
    assert!(registry.signatures().contains(algorithm::HMAC_SHA256));
}

#[test]
fn test_bad_entry_does_not_stop_siblings() {
    let registry = AlgorithmRegistry::new();
    let provider = provider(&format!(
        r#"<TransformAlgorithms>
             <TransformAlgorithm URI="urn:broken" JAVACLASS="no::such::Implementation"/>
             <TransformAlgorithm URI="http://www.w3.org/2000/09/xmldsig#base64"
                                 JAVACLASS="ulriksdal::transforms::Base64Decode"/>
           </TransformAlgorithms>
           {HMAC_SIGNATURES}"#
    ));
    let report = registry.init(&provider, &InitOptions::new()).unwrap();

    assert!(!registry.transforms().contains("urn:broken"));
    assert!(registry.transforms().contains(algorithm::BASE64));
    assert!(registry.signatures().contains(algorithm::HMAC_SHA1));
    assert!(registry.signatures().contains(algorithm::HMAC_SHA256));

    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].category, Category::Transform);
    assert_eq!(errors[0].error.id(), "urn:broken");
    assert_eq!(errors[0].error.implementation(), "no::such::Implementation");
    assert!(matches!(
        errors[0].error,
        RegistrationError::UnresolvableImplementation {
            reason: Unresolved::NotFound,
            ..
        }
    ));
    assert_eq!(report.registered.len(), 3);
}

#[test]
fn test_base64_then_identity() {
    let registry = AlgorithmRegistry::new();
    registry.init_defaults();
    registry
        .register_implementation::<dyn Transform>("urn:test:identity", ids::IDENTITY)
        .unwrap();

    let chain = TransformChain::new().then(algorithm::BASE64).then("urn:test:identity");
    let out = registry
        .pipeline()
        .execute(chain, TransformData::Binary(b"aGVsbG8=".to_vec()))
        .unwrap();
    assert_eq!(out, TransformData::Binary(b"hello".to_vec()));
}

#[test]
fn test_second_init_is_noop() {
    let registry = AlgorithmRegistry::new();
    let provider = CountingProvider::new(HMAC_SIGNATURES);

    let first = registry.init(&provider, &InitOptions::new()).unwrap();
    let first_ids = registry.signatures().ids();
    let second = registry.init(&provider, &InitOptions::new()).unwrap();

    assert!(std::ptr::eq(first, second));
    assert_eq!(provider.loads(), 1);
    assert_eq!(registry.signatures().ids(), first_ids);
}

#[test]
fn test_defaults_are_deterministic() {
    let a = AlgorithmRegistry::new();
    let b = AlgorithmRegistry::new();
    a.init_defaults();
    b.init_defaults();

    assert_eq!(a.transforms().ids(), b.transforms().ids());
    assert_eq!(a.signatures().ids(), b.signatures().ids());
    assert_eq!(a.prefixes().bindings(), b.prefixes().bindings());
    assert_eq!(a.locale(), b.locale());

    let report = a.report().unwrap();
    assert_eq!(report.mode, InitMode::Defaults);
    assert_eq!(
        report.registered_in(Category::Transform).collect::<Vec<_>>(),
        a.transforms().ids()
    );
}

#[test]
fn test_strict_document_failure_is_retryable() {
    let registry = AlgorithmRegistry::new();

    let err = registry
        .init(&InMemoryResources::new(), &InitOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::ConfigDocument(_)));
    assert_eq!(registry.state(), State::Uninitialized);

    let malformed = InMemoryResources::new().with(CONFIG_PATH, "<Configuration>");
    assert!(registry.init(&malformed, &InitOptions::new()).is_err());
    assert_eq!(registry.state(), State::Uninitialized);

    registry.init(&provider(HMAC_SIGNATURES), &InitOptions::new()).unwrap();
    assert_eq!(registry.state(), State::Ready);
    assert_eq!(registry.signatures().len(), 2);
}

#[test]
fn test_lenient_document_failure_marks_ready() {
    let registry = AlgorithmRegistry::new();
    let options = InitOptions::new().with_failure_policy(DocumentFailurePolicy::Lenient);

    let report = registry.init(&InMemoryResources::new(), &options).unwrap();
    assert!(matches!(report.document_error, Some(Error::ConfigDocument(_))));
    assert!(!report.is_clean());
    assert_eq!(registry.state(), State::Ready);
    assert!(registry.signatures().is_empty());

    // Ready is final, even for a good document.
    let report = registry.init(&provider(HMAC_SIGNATURES), &InitOptions::new()).unwrap();
    assert!(report.document_error.is_some());
    assert!(registry.signatures().is_empty());
}

#[test]
fn test_resolver_failures_are_warnings() {
    let registry = AlgorithmRegistry::new();
    let provider = provider(
        r#"<ResourceResolvers>
             <Resolver JAVACLASS="no::such::Resolver" DESCRIPTION="gone"/>
             <Resolver JAVACLASS="ulriksdal::resolver::Http" DESCRIPTION="network"/>
             <Resolver JAVACLASS="ulriksdal::resolver::LocalFile" DESCRIPTION="files"/>
           </ResourceResolvers>
           <KeyResolver>
             <Resolver JAVACLASS="ulriksdal::keys::KeyName"/>
           </KeyResolver>"#,
    );
    let report = registry.init(&provider, &InitOptions::new()).unwrap();

    assert_eq!(report.errors().count(), 0);
    assert_eq!(report.warnings().count(), 2);
    assert!(report.warnings().all(|w| w.severity == Severity::Warning));
    assert!(report.failure_for("ulriksdal::resolver::Http").unwrap().error.is_missing_dependency());

    assert_eq!(registry.resource_resolvers().ids(), [ids::LOCAL_FILE]);
    let descriptor = registry.resource_resolvers().lookup(ids::LOCAL_FILE).unwrap();
    assert_eq!(descriptor.description(), Some("files"));
    assert_eq!(registry.key_resolvers().ids(), [ids::KEY_NAME]);
}

#[test]
fn test_prefix_conflicts_reported() {
    let registry = AlgorithmRegistry::new();
    let provider = provider(
        r#"<PrefixMappings>
             <PrefixMapping namespace="http://www.w3.org/2000/09/xmldsig#" prefix="ds"/>
             <PrefixMapping namespace="urn:other" prefix="ds"/>
           </PrefixMappings>"#,
    );
    let report = registry.init(&provider, &InitOptions::new()).unwrap();

    assert_eq!(report.prefix_conflicts.len(), 1);
    assert_eq!(report.prefix_conflicts[0].requested, "urn:other");
    assert_eq!(
        registry.prefixes().namespace_for("ds").as_deref(),
        Some("http://www.w3.org/2000/09/xmldsig#")
    );
}

#[test]
fn test_override_path_read_from_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site-config.xml");
    let body = r#"<TransformAlgorithms>
    <TransformAlgorithm URI="http://www.w3.org/2000/09/xmldsig#base64"
                        JAVACLASS="ulriksdal::transforms::Base64Decode"/>
  </TransformAlgorithms>"#;
    std::fs::write(&path, document(body)).unwrap();
    let path = path.to_str().unwrap();

    let registry = AlgorithmRegistry::new();
    let options = InitOptions::new().with_config_path(path);
    let report = registry.init(&DefaultResources::new(), &options).unwrap();

    assert_eq!(report.mode, InitMode::Configuration { path: path.into() });
    assert!(report.is_clean());
    assert_eq!(registry.transforms().ids(), [algorithm::BASE64]);
    assert!(registry.signatures().is_empty());
}

#[test]
fn test_bundled_configuration() {
    let registry = AlgorithmRegistry::new();
    let report = registry.init(&BundledResources, &InitOptions::new()).unwrap();

    assert_eq!(
        report.mode,
        InitMode::Configuration {
            path: CONFIG_PATH.into()
        }
    );
    assert_eq!(report.errors().count(), 0);
    assert!(report.skipped.is_empty());
    assert!(report.prefix_conflicts.is_empty());

    assert!(registry.transforms().contains(algorithm::BASE64));
    assert!(registry.transforms().contains(algorithm::C14N));
    assert!(registry.signatures().contains(algorithm::HMAC_SHA224));
    assert_eq!(registry.resource_resolvers().ids(), [ids::LOCAL_FILE]);
    assert_eq!(registry.key_resolvers().ids(), [ids::KEY_VALUE, ids::KEY_NAME]);
    let dsig11 = registry.prefixes().prefix_for(ulriksdal_core::ns::DSIG11);
    assert_eq!(dsig11.as_deref(), Some("dsig11"));
    assert_eq!(
        registry.locale(),
        Some(ulriksdal_init::Locale::new("en", "US"))
    );
    assert!(registry
        .provider_mappings()
        .is_some_and(|m| m.contains("HmacSHA256")));
}

#[test]
fn test_filesystem_configuration_and_local_resolution() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("custom.xml"),
        document(
            r#"<ResourceResolvers>
                 <Resolver JAVACLASS="ulriksdal::resolver::LocalFile"/>
               </ResourceResolvers>"#,
        ),
    )
    .unwrap();
    std::fs::write(dir.path().join("payload.txt"), b"signed bytes").unwrap();

    let registry = AlgorithmRegistry::new();
    registry
        .init(
            &FileSystemResources::new(dir.path()),
            &InitOptions::new().with_config_path("custom.xml"),
        )
        .unwrap();

    let base = format!("file://{}", dir.path().join("signature.xml").display());
    let reference = ResourceReference::new("payload.txt").with_base(base);
    assert_eq!(
        registry
            .resolve_resource(&reference, &ResolverScope::Unrestricted)
            .unwrap(),
        b"signed bytes"
    );
    assert!(matches!(
        registry.resolve_resource(&reference, &ResolverScope::none()),
        Err(Error::Unresolvable(_))
    ));
}

#[test]
fn test_signature_lookup_with_policy() {
    use ulriksdal_crypto::{KeyMaterial, PermitAll, RejectList};

    let registry = AlgorithmRegistry::new();
    registry.init_defaults();

    let hmac = registry.signature(algorithm::HMAC_SHA256, &RejectList::legacy()).unwrap();
    let key = KeyMaterial::Secret(b"secret".to_vec());
    let mac = hmac.sign(&key, b"data").unwrap();
    assert!(hmac.verify(&key, b"data", &mac).unwrap());

    assert!(matches!(
        registry.signature(algorithm::RSA_SHA256, &PermitAll),
        Err(Error::UnsupportedAlgorithm(_))
    ));
    assert!(matches!(
        registry.signature(algorithm::HMAC_MD5, &RejectList::legacy()),
        Err(Error::AlgorithmRejected(_))
    ));
}

#[test]
fn test_late_registration_replaces() {
    let registry = AlgorithmRegistry::new();
    registry.init_defaults();
    let before = registry.transforms().lookup(algorithm::BASE64).unwrap();

    registry
        .catalog()
        .provide("test::Identity", Implementation::transform(|| IdentityTransform));
    registry
        .register_implementation::<dyn Transform>(algorithm::BASE64, "test::Identity")
        .unwrap();

    let after = registry.transforms().lookup(algorithm::BASE64).unwrap();
    assert_eq!(before.implementation(), ids::BASE64_DECODE);
    assert_eq!(after.implementation(), "test::Identity");
    assert_eq!(registry.transforms().ids()[0], algorithm::BASE64);
}

#[test]
fn test_global_is_shared() {
    let a = ulriksdal_init::global();
    let b = ulriksdal_init::global();
    assert!(std::ptr::eq(a, b));
}
