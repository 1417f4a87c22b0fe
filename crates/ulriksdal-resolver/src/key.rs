#![forbid(unsafe_code)]

//! Key resolvers and the named key store they draw from.

use ulriksdal_core::Error;
use ulriksdal_crypto::KeyMaterial;

/// Key-descriptor material taken from a `KeyInfo` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInfo {
    /// `<KeyName>`
    KeyName(String),
    /// `<KeyValue>` already reduced to DER, tagged with its type URI.
    KeyValue { key_type: String, der: Vec<u8> },
    /// `<X509Data><X509Certificate>` DER.
    X509Certificate(Vec<u8>),
    /// `<RetrievalMethod URI=...>`
    RetrievalMethod(String),
}

/// Keys available to one verification or signing operation.
#[derive(Debug, Default)]
pub struct KeyStore {
    keys: Vec<(String, KeyMaterial)>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named key. Later keys with the same name shadow earlier ones.
    pub fn add_key(&mut self, name: impl Into<String>, key: KeyMaterial) {
        self.keys.insert(0, (name.into(), key));
    }

    /// Find a key by name.
    pub fn find_by_name(&self, name: &str) -> Option<&KeyMaterial> {
        self.keys.iter().find(|(n, _)| n == name).map(|(_, k)| k)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Trait for key resolvers.
pub trait KeyResolver: Send + Sync {
    /// Whether this resolver handles `info`.
    fn can_resolve(&self, info: &KeyInfo) -> bool;

    /// Produce the key described by `info`.
    fn resolve(&self, info: &KeyInfo, keys: &KeyStore) -> Result<KeyMaterial, Error>;
}

/// Looks `<KeyName>` up in the key store.
pub struct KeyNameResolver;

impl KeyResolver for KeyNameResolver {
    fn can_resolve(&self, info: &KeyInfo) -> bool {
        matches!(info, KeyInfo::KeyName(_))
    }

    fn resolve(&self, info: &KeyInfo, keys: &KeyStore) -> Result<KeyMaterial, Error> {
        let KeyInfo::KeyName(name) = info else {
            return Err(Error::Key("KeyName required".into()));
        };
        keys.find_by_name(name)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(name.clone()))
    }
}

/// Takes the public key carried inline in `<KeyValue>`.
pub struct KeyValueResolver;

impl KeyResolver for KeyValueResolver {
    fn can_resolve(&self, info: &KeyInfo) -> bool {
        matches!(info, KeyInfo::KeyValue { .. })
    }

    fn resolve(&self, info: &KeyInfo, _keys: &KeyStore) -> Result<KeyMaterial, Error> {
        match info {
            KeyInfo::KeyValue { key_type, der } if !der.is_empty() => Ok(KeyMaterial::Public {
                key_type: key_type.clone(),
                der: der.clone(),
            }),
            KeyInfo::KeyValue { .. } => Err(Error::Key("empty KeyValue".into())),
            _ => Err(Error::Key("KeyValue required".into())),
        }
    }
}
