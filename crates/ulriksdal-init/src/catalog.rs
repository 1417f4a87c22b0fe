#![forbid(unsafe_code)]

//! Implementation catalog: implementation identifier -> typed constructor.
//!
//! Configuration entries name implementations by identifier. The catalog is
//! where those identifiers are bound to code, at compile time for the
//! built-ins and by [`Catalog::provide`] for host-supplied engines (C14N
//! serializers, XPath, XSLT, public-key signatures).

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use ulriksdal_core::Error;
use ulriksdal_crypto::{HashType, HmacSignature, SignatureAlgorithm};
use ulriksdal_registry::{Category, Factory, RegistrationError, Registry, Unresolved};
use ulriksdal_resolver::{
    KeyNameResolver, KeyResolver, KeyValueResolver, LocalFileResolver, ResourceResolver,
};
use ulriksdal_transforms::{
    Base64DecodeTransform, C14nMode, C14nTransform, Canonicalizer, IdentityTransform, Transform,
};

use crate::bootstrap::AlgorithmRegistry;

/// Identifiers of the implementations known to [`Catalog::builtin`].
pub mod ids {
    // Canonicalizers (host-supplied)
    pub const C14N: &str = "ulriksdal::c14n::Canonical10";
    pub const C14N_WITH_COMMENTS: &str = "ulriksdal::c14n::Canonical10WithComments";
    pub const C14N11: &str = "ulriksdal::c14n::Canonical11";
    pub const C14N11_WITH_COMMENTS: &str = "ulriksdal::c14n::Canonical11WithComments";
    pub const EXC_C14N: &str = "ulriksdal::c14n::Exclusive";
    pub const EXC_C14N_WITH_COMMENTS: &str = "ulriksdal::c14n::ExclusiveWithComments";

    // Transforms
    pub const BASE64_DECODE: &str = "ulriksdal::transforms::Base64Decode";
    pub const IDENTITY: &str = "ulriksdal::transforms::Identity";
    pub const C14N_TRANSFORM: &str = "ulriksdal::transforms::C14n";
    pub const C14N_WITH_COMMENTS_TRANSFORM: &str = "ulriksdal::transforms::C14nWithComments";
    pub const C14N11_TRANSFORM: &str = "ulriksdal::transforms::C14n11";
    pub const C14N11_WITH_COMMENTS_TRANSFORM: &str = "ulriksdal::transforms::C14n11WithComments";
    pub const EXC_C14N_TRANSFORM: &str = "ulriksdal::transforms::ExclusiveC14n";
    pub const EXC_C14N_WITH_COMMENTS_TRANSFORM: &str =
        "ulriksdal::transforms::ExclusiveC14nWithComments";
    pub const ENVELOPED_SIGNATURE: &str = "ulriksdal::transforms::EnvelopedSignature";
    pub const XPATH: &str = "ulriksdal::transforms::XPath";
    pub const XPATH2_FILTER: &str = "ulriksdal::transforms::XPath2Filter";
    pub const XSLT: &str = "ulriksdal::transforms::Xslt";

    // Signature algorithms
    pub const HMAC_SHA1: &str = "ulriksdal::crypto::HmacSha1";
    pub const HMAC_SHA224: &str = "ulriksdal::crypto::HmacSha224";
    pub const HMAC_SHA256: &str = "ulriksdal::crypto::HmacSha256";
    pub const HMAC_SHA384: &str = "ulriksdal::crypto::HmacSha384";
    pub const HMAC_SHA512: &str = "ulriksdal::crypto::HmacSha512";
    pub const HMAC_MD5: &str = "ulriksdal::crypto::HmacMd5";
    pub const HMAC_RIPEMD160: &str = "ulriksdal::crypto::HmacRipemd160";
    pub const RSA_SHA1: &str = "ulriksdal::crypto::RsaSha1";
    pub const RSA_SHA256: &str = "ulriksdal::crypto::RsaSha256";
    pub const RSA_SHA384: &str = "ulriksdal::crypto::RsaSha384";
    pub const RSA_SHA512: &str = "ulriksdal::crypto::RsaSha512";
    pub const RSA_MD5: &str = "ulriksdal::crypto::RsaMd5";
    pub const RSA_RIPEMD160: &str = "ulriksdal::crypto::RsaRipemd160";
    pub const DSA_SHA1: &str = "ulriksdal::crypto::DsaSha1";
    pub const ECDSA_SHA1: &str = "ulriksdal::crypto::EcdsaSha1";
    pub const ECDSA_SHA256: &str = "ulriksdal::crypto::EcdsaSha256";
    pub const ECDSA_SHA384: &str = "ulriksdal::crypto::EcdsaSha384";
    pub const ECDSA_SHA512: &str = "ulriksdal::crypto::EcdsaSha512";

    // Resource resolvers
    pub const LOCAL_FILE: &str = "ulriksdal::resolver::LocalFile";
    pub const HTTP: &str = "ulriksdal::resolver::Http";
    pub const FRAGMENT: &str = "ulriksdal::resolver::Fragment";
    pub const XPOINTER: &str = "ulriksdal::resolver::XPointer";

    // Key resolvers
    pub const KEY_NAME: &str = "ulriksdal::keys::KeyName";
    pub const KEY_VALUE: &str = "ulriksdal::keys::KeyValue";
    pub const X509_CERTIFICATE: &str = "ulriksdal::keys::X509Certificate";
}

/// A typed constructor for one category.
#[derive(Clone)]
pub enum Implementation {
    Canonicalizer(Factory<dyn Canonicalizer>),
    Transform(Factory<dyn Transform>),
    SignatureAlgorithm(Factory<dyn SignatureAlgorithm>),
    ResourceResolver(Factory<dyn ResourceResolver>),
    KeyResolver(Factory<dyn KeyResolver>),
}

impl Implementation {
    pub fn category(&self) -> Category {
        match self {
            Self::Canonicalizer(_) => Category::Canonicalizer,
            Self::Transform(_) => Category::Transform,
            Self::SignatureAlgorithm(_) => Category::SignatureAlgorithm,
            Self::ResourceResolver(_) => Category::ResourceResolver,
            Self::KeyResolver(_) => Category::KeyResolver,
        }
    }

    pub fn canonicalizer<C, F>(make: F) -> Self
    where
        C: Canonicalizer + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        Self::Canonicalizer(Arc::new(move || {
            Ok::<_, Error>(Box::new(make()) as Box<dyn Canonicalizer>)
        }))
    }

    pub fn transform<T, F>(make: F) -> Self
    where
        T: Transform + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::Transform(Arc::new(move || Ok::<_, Error>(Box::new(make()) as Box<dyn Transform>)))
    }

    pub fn signature<S, F>(make: F) -> Self
    where
        S: SignatureAlgorithm + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        Self::SignatureAlgorithm(Arc::new(move || {
            Ok::<_, Error>(Box::new(make()) as Box<dyn SignatureAlgorithm>)
        }))
    }

    pub fn resource_resolver<R, F>(make: F) -> Self
    where
        R: ResourceResolver + 'static,
        F: Fn() -> R + Send + Sync + 'static,
    {
        Self::ResourceResolver(Arc::new(move || {
            Ok::<_, Error>(Box::new(make()) as Box<dyn ResourceResolver>)
        }))
    }

    pub fn key_resolver<K, F>(make: F) -> Self
    where
        K: KeyResolver + 'static,
        F: Fn() -> K + Send + Sync + 'static,
    {
        Self::KeyResolver(Arc::new(move || {
            Ok::<_, Error>(Box::new(make()) as Box<dyn KeyResolver>)
        }))
    }
}

#[derive(Clone)]
enum Entry {
    Available(Implementation),
    /// Known identifier whose code is not part of this build or has not been
    /// provided by the host.
    Unavailable { category: Category, dependency: String },
}

impl Entry {
    fn category(&self) -> Category {
        match self {
            Entry::Available(imp) => imp.category(),
            Entry::Unavailable { category, .. } => *category,
        }
    }
}

/// A category whose implementations the catalog can construct and whose
/// registry lives in [`AlgorithmRegistry`].
pub trait Pluggable {
    const CATEGORY: Category;

    fn factory(implementation: &Implementation) -> Option<Factory<Self>>;

    fn registry(registry: &AlgorithmRegistry) -> &Registry<Self>;
}

macro_rules! pluggable {
    ($trait:ident, $variant:ident, $accessor:ident) => {
        impl Pluggable for dyn $trait {
            const CATEGORY: Category = Category::$variant;

            fn factory(implementation: &Implementation) -> Option<Factory<Self>> {
                match implementation {
                    Implementation::$variant(f) => Some(Arc::clone(f)),
                    _ => None,
                }
            }

            fn registry(registry: &AlgorithmRegistry) -> &Registry<Self> {
                registry.$accessor()
            }
        }
    };
}

pluggable!(Canonicalizer, Canonicalizer, canonicalizers);
pluggable!(Transform, Transform, transforms);
pluggable!(SignatureAlgorithm, SignatureAlgorithm, signatures);
pluggable!(ResourceResolver, ResourceResolver, resource_resolvers);
pluggable!(KeyResolver, KeyResolver, key_resolvers);

/// Implementation identifier -> constructor.
pub struct Catalog {
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl Catalog {
    /// A catalog with no implementations.
    pub fn empty() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// The implementations compiled into this build, plus declarations of
    /// the identifiers a host is expected to provide.
    pub fn builtin() -> Self {
        let catalog = Self::empty();

        let canonicalizers = [
            ids::C14N,
            ids::C14N_WITH_COMMENTS,
            ids::C14N11,
            ids::C14N11_WITH_COMMENTS,
            ids::EXC_C14N,
            ids::EXC_C14N_WITH_COMMENTS,
        ];
        for id in canonicalizers {
            catalog.declare_unavailable(id, Category::Canonicalizer, "canonical XML serializer");
        }

        catalog.provide(ids::BASE64_DECODE, Implementation::transform(|| Base64DecodeTransform));
        catalog.provide(ids::IDENTITY, Implementation::transform(|| IdentityTransform));
        let c14n_transforms = [
            (ids::C14N_TRANSFORM, C14nMode::Inclusive),
            (ids::C14N_WITH_COMMENTS_TRANSFORM, C14nMode::InclusiveWithComments),
            (ids::C14N11_TRANSFORM, C14nMode::Inclusive11),
            (ids::C14N11_WITH_COMMENTS_TRANSFORM, C14nMode::Inclusive11WithComments),
            (ids::EXC_C14N_TRANSFORM, C14nMode::Exclusive),
            (ids::EXC_C14N_WITH_COMMENTS_TRANSFORM, C14nMode::ExclusiveWithComments),
        ];
        for (id, mode) in c14n_transforms {
            catalog.provide(id, Implementation::transform(move || C14nTransform::new(mode)));
        }
        catalog.declare_unavailable(
            ids::ENVELOPED_SIGNATURE,
            Category::Transform,
            "XML node-set engine",
        );
        catalog.declare_unavailable(ids::XPATH, Category::Transform, "XPath engine");
        catalog.declare_unavailable(ids::XPATH2_FILTER, Category::Transform, "XPath engine");
        catalog.declare_unavailable(ids::XSLT, Category::Transform, "XSLT engine");

        let hmacs = [
            (ids::HMAC_SHA1, HashType::Sha1),
            (ids::HMAC_SHA224, HashType::Sha224),
            (ids::HMAC_SHA256, HashType::Sha256),
            (ids::HMAC_SHA384, HashType::Sha384),
            (ids::HMAC_SHA512, HashType::Sha512),
        ];
        for (id, hash) in hmacs {
            catalog.provide(id, Implementation::signature(move || HmacSignature::new(hash)));
        }

        #[cfg(feature = "legacy-algorithms")]
        {
            catalog.provide(
                ids::HMAC_MD5,
                Implementation::signature(|| HmacSignature::new(HashType::Md5)),
            );
            catalog.provide(
                ids::HMAC_RIPEMD160,
                Implementation::signature(|| HmacSignature::new(HashType::Ripemd160)),
            );
        }
        #[cfg(not(feature = "legacy-algorithms"))]
        for id in [ids::HMAC_MD5, ids::HMAC_RIPEMD160] {
            catalog.declare_unavailable(
                id,
                Category::SignatureAlgorithm,
                "legacy-algorithms feature",
            );
        }

        let public_key = [
            ids::RSA_SHA1,
            ids::RSA_SHA256,
            ids::RSA_SHA384,
            ids::RSA_SHA512,
            ids::RSA_MD5,
            ids::RSA_RIPEMD160,
            ids::DSA_SHA1,
            ids::ECDSA_SHA1,
            ids::ECDSA_SHA256,
            ids::ECDSA_SHA384,
            ids::ECDSA_SHA512,
        ];
        for id in public_key {
            catalog.declare_unavailable(
                id,
                Category::SignatureAlgorithm,
                "public-key signature provider",
            );
        }

        catalog.provide(ids::LOCAL_FILE, Implementation::resource_resolver(|| LocalFileResolver));
        catalog.declare_unavailable(ids::HTTP, Category::ResourceResolver, "network transport");
        catalog.declare_unavailable(
            ids::FRAGMENT,
            Category::ResourceResolver,
            "XML node-set engine",
        );
        catalog.declare_unavailable(
            ids::XPOINTER,
            Category::ResourceResolver,
            "XML node-set engine",
        );

        catalog.provide(ids::KEY_NAME, Implementation::key_resolver(|| KeyNameResolver));
        catalog.provide(ids::KEY_VALUE, Implementation::key_resolver(|| KeyValueResolver));
        catalog.declare_unavailable(
            ids::X509_CERTIFICATE,
            Category::KeyResolver,
            "X.509 certificate parser",
        );

        catalog
    }

    /// Bind `id` to `implementation`, replacing any earlier binding or
    /// unavailable declaration.
    pub fn provide(&self, id: impl Into<String>, implementation: Implementation) {
        self.entries.write().insert(id.into(), Entry::Available(implementation));
    }

    /// Record that `id` names a `category` implementation which needs
    /// `dependency` to be present.
    pub fn declare_unavailable(
        &self,
        id: impl Into<String>,
        category: Category,
        dependency: impl Into<String>,
    ) {
        self.entries.write().insert(
            id.into(),
            Entry::Unavailable {
                category,
                dependency: dependency.into(),
            },
        );
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    /// Whether `id` is bound to code in this catalog.
    pub fn is_available(&self, id: &str) -> bool {
        matches!(self.entries.read().get(id), Some(Entry::Available(_)))
    }

    /// The category `id` belongs to, if known.
    pub fn category_of(&self, id: &str) -> Option<Category> {
        self.entries.read().get(id).map(Entry::category)
    }

    /// All identifiers, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// The constructor for `implementation`, checked against category `T`.
    /// `id` is the URI (or resolver identifier) being registered, used in
    /// error reports.
    pub fn resolve<T: Pluggable + ?Sized>(
        &self,
        id: &str,
        implementation: &str,
    ) -> Result<Factory<T>, RegistrationError> {
        let unresolvable = |reason| RegistrationError::UnresolvableImplementation {
            category: T::CATEGORY,
            id: id.to_owned(),
            implementation: implementation.to_owned(),
            reason,
        };
        let mismatch = |found| RegistrationError::CapabilityMismatch {
            id: id.to_owned(),
            implementation: implementation.to_owned(),
            expected: T::CATEGORY,
            found,
        };

        let entries = self.entries.read();
        match entries.get(implementation) {
            None => Err(unresolvable(Unresolved::NotFound)),
            Some(Entry::Unavailable { category, .. }) if *category != T::CATEGORY => {
                Err(mismatch(*category))
            }
            Some(Entry::Unavailable { dependency, .. }) => {
                Err(unresolvable(Unresolved::MissingDependency(dependency.clone())))
            }
            Some(Entry::Available(imp)) => T::factory(imp).ok_or_else(|| mismatch(imp.category())),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulriksdal_transforms::{TransformData, TransformParams};

    struct Upper;
    impl Canonicalizer for Upper {
        fn canonicalize(&self, xml: &str, _: &[String]) -> Result<Vec<u8>, Error> {
            Ok(xml.to_uppercase().into_bytes())
        }
    }

    #[test]
    fn test_resolve_available() {
        let catalog = Catalog::builtin();
        let factory = catalog
            .resolve::<dyn Transform>("urn:x", ids::BASE64_DECODE)
            .unwrap();
        let transform = factory().unwrap();
        let canonicalizers = Registry::new(Category::Canonicalizer);
        let params = TransformParams::new();
        let ctx = ulriksdal_transforms::TransformContext {
            params: &params,
            canonicalizers: &canonicalizers,
        };
        let out = transform
            .execute(TransformData::Binary(b"aGk=".to_vec()), &ctx)
            .unwrap();
        assert_eq!(out, TransformData::Binary(b"hi".to_vec()));
    }

    #[test]
    fn test_resolve_unknown() {
        let err = Catalog::builtin()
            .resolve::<dyn Transform>("urn:broken", "no::such::Thing")
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RegistrationError::UnresolvableImplementation {
                reason: Unresolved::NotFound,
                ..
            }
        ));
        assert_eq!(err.id(), "urn:broken");
        assert_eq!(err.implementation(), "no::such::Thing");
    }

    #[test]
    fn test_resolve_wrong_category() {
        let err = Catalog::builtin()
            .resolve::<dyn Transform>("urn:x", ids::HMAC_SHA256)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RegistrationError::CapabilityMismatch {
                expected: Category::Transform,
                found: Category::SignatureAlgorithm,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_missing_dependency() {
        let err = Catalog::builtin()
            .resolve::<dyn Transform>("urn:x", ids::XSLT)
            .err()
            .unwrap();
        assert!(err.is_missing_dependency());

        let err = Catalog::builtin()
            .resolve::<dyn SignatureAlgorithm>("urn:x", ids::XSLT)
            .err()
            .unwrap();
        assert!(matches!(err, RegistrationError::CapabilityMismatch { .. }));
    }

    #[test]
    fn test_provide_replaces_declaration() {
        let catalog = Catalog::builtin();
        assert!(!catalog.is_available(ids::C14N));
        catalog.provide(ids::C14N, Implementation::canonicalizer(|| Upper));
        assert!(catalog.is_available(ids::C14N));

        let c = catalog.resolve::<dyn Canonicalizer>("urn:c", ids::C14N).unwrap()().unwrap();
        assert_eq!(c.canonicalize("<a/>", &[]).unwrap(), b"<A/>".to_vec());
    }

    #[test]
    fn test_categories() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.category_of(ids::LOCAL_FILE), Some(Category::ResourceResolver));
        assert_eq!(catalog.category_of(ids::X509_CERTIFICATE), Some(Category::KeyResolver));
        assert_eq!(catalog.category_of("nope"), None);
        assert!(Catalog::empty().ids().is_empty());
    }
}
