#![forbid(unsafe_code)]

//! Chain-of-responsibility resolution over a resolver registry.

use std::collections::BTreeSet;

use ulriksdal_core::Error;
use ulriksdal_crypto::KeyMaterial;
use ulriksdal_registry::Registry;

use crate::key::{KeyInfo, KeyResolver, KeyStore};
use crate::resource::{ResourceReference, ResourceResolver};

/// Which registered resolvers may run for one operation.
///
/// Restricting the scope is how a verifier keeps untrusted input from
/// reaching arbitrary external resources, independent of what is registered
/// globally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResolverScope {
    /// Every registered resolver.
    #[default]
    Unrestricted,
    /// Only resolvers whose implementation identifier is listed.
    Only(BTreeSet<String>),
}

impl ResolverScope {
    pub fn only<I, S>(implementations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(implementations.into_iter().map(Into::into).collect())
    }

    /// A scope that admits nothing.
    pub fn none() -> Self {
        Self::Only(BTreeSet::new())
    }

    pub fn allows(&self, implementation: &str) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Only(allowed) => allowed.contains(implementation),
        }
    }
}

/// Dereference `reference` with the first resolver in registration order
/// that is in scope and claims it.
pub fn resolve_resource(
    registry: &Registry<dyn ResourceResolver>,
    reference: &ResourceReference,
    scope: &ResolverScope,
) -> Result<Vec<u8>, Error> {
    for (id, descriptor) in registry.entries() {
        if !scope.allows(&id) {
            continue;
        }
        let resolver = match descriptor.instantiate() {
            Ok(resolver) => resolver,
            Err(e) => {
                tracing::warn!(resolver = %id, error = %e, "skipping resource resolver");
                continue;
            }
        };
        if resolver.can_resolve(reference) {
            tracing::debug!(
                resolver = %id,
                uri = %reference.uri,
                "resource resolver claimed reference"
            );
            return resolver.resolve(reference);
        }
    }
    Err(Error::Unresolvable(reference.uri.clone()))
}

/// Produce the key described by `info` with the first key resolver in
/// registration order that is in scope and claims it.
pub fn resolve_key(
    registry: &Registry<dyn KeyResolver>,
    info: &KeyInfo,
    keys: &KeyStore,
    scope: &ResolverScope,
) -> Result<KeyMaterial, Error> {
    for (id, descriptor) in registry.entries() {
        if !scope.allows(&id) {
            continue;
        }
        let resolver = match descriptor.instantiate() {
            Ok(resolver) => resolver,
            Err(e) => {
                tracing::warn!(resolver = %id, error = %e, "skipping key resolver");
                continue;
            }
        };
        if resolver.can_resolve(info) {
            tracing::debug!(resolver = %id, "key resolver claimed key info");
            return resolver.resolve(info, keys);
        }
    }
    Err(Error::Unresolvable(format!("{info:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyNameResolver;
    use ulriksdal_registry::{Category, Descriptor};

    struct Declines;
    impl ResourceResolver for Declines {
        fn can_resolve(&self, _: &ResourceReference) -> bool {
            false
        }
        fn resolve(&self, _: &ResourceReference) -> Result<Vec<u8>, Error> {
            Err(Error::Other("must not be called".into()))
        }
    }

    struct Accepts(&'static [u8]);
    impl ResourceResolver for Accepts {
        fn can_resolve(&self, _: &ResourceReference) -> bool {
            true
        }
        fn resolve(&self, _: &ResourceReference) -> Result<Vec<u8>, Error> {
            Ok(self.0.to_vec())
        }
    }

    fn declines() -> Descriptor<dyn ResourceResolver> {
        Descriptor::new("test.Declines", || Ok(Box::new(Declines) as Box<dyn ResourceResolver>))
    }

    fn accepts(payload: &'static [u8]) -> Descriptor<dyn ResourceResolver> {
        Descriptor::new("test.Accepts", move || {
            Ok(Box::new(Accepts(payload)) as Box<dyn ResourceResolver>)
        })
    }

    fn chain(
        entries: Vec<(&str, Descriptor<dyn ResourceResolver>)>,
    ) -> Registry<dyn ResourceResolver> {
        let reg: Registry<dyn ResourceResolver> = Registry::new(Category::ResourceResolver);
        for (id, d) in entries {
            reg.register(id, d).unwrap();
        }
        reg
    }

    #[test]
    fn test_falls_through_to_claimant() {
        let reg = chain(vec![("A", declines()), ("B", accepts(b"from B"))]);
        let data = resolve_resource(
            &reg,
            &ResourceReference::new("http://example.com/x"),
            &ResolverScope::Unrestricted,
        )
        .unwrap();
        assert_eq!(data, b"from B");
    }

    #[test]
    fn test_nobody_claims() {
        let reg = chain(vec![("A", declines()), ("A2", declines())]);
        let err = resolve_resource(&reg, &ResourceReference::new("x"), &ResolverScope::Unrestricted)
            .unwrap_err();
        assert!(matches!(err, Error::Unresolvable(uri) if uri == "x"));
    }

    #[test]
    fn test_first_claimant_wins() {
        let reg = chain(vec![("B", accepts(b"first")), ("C", accepts(b"second"))]);
        let reference = ResourceReference::new("x");
        let data = resolve_resource(&reg, &reference, &ResolverScope::Unrestricted).unwrap();
        assert_eq!(data, b"first");
    }

    #[test]
    fn test_scope_restricts_active_set() {
        let reg = chain(vec![("net", accepts(b"remote")), ("local", accepts(b"local"))]);
        let reference = ResourceReference::new("x");
        let data = resolve_resource(&reg, &reference, &ResolverScope::only(["local"])).unwrap();
        assert_eq!(data, b"local");

        assert!(matches!(
            resolve_resource(&reg, &reference, &ResolverScope::none()),
            Err(Error::Unresolvable(_))
        ));
        // The global registration is untouched.
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_key_chain() {
        let reg: Registry<dyn KeyResolver> = Registry::new(Category::KeyResolver);
        reg.register(
            "KeyName",
            Descriptor::new("test.KeyName", || {
                Ok(Box::new(KeyNameResolver) as Box<dyn KeyResolver>)
            }),
        )
        .unwrap();

        let mut keys = KeyStore::new();
        keys.add_key("k", KeyMaterial::Secret(b"s".to_vec()));

        let info = KeyInfo::KeyName("k".into());
        let key = resolve_key(&reg, &info, &keys, &ResolverScope::Unrestricted).unwrap();
        assert_eq!(key, KeyMaterial::Secret(b"s".to_vec()));

        assert!(matches!(
            resolve_key(
                &reg,
                &KeyInfo::X509Certificate(vec![1]),
                &keys,
                &ResolverScope::Unrestricted
            ),
            Err(Error::Unresolvable(_))
        ));
    }
}
