#![forbid(unsafe_code)]

//! Signature algorithm trait and the built-in HMAC family.

use ulriksdal_core::{algorithm, Error};

use crate::key::KeyMaterial;

/// Trait for signature and MAC algorithms.
///
/// One instance is bound to one algorithm URI, i.e. one key family plus one
/// digest.
pub trait SignatureAlgorithm: Send + Sync {
    fn uri(&self) -> &str;
    fn sign(&self, key: &KeyMaterial, data: &[u8]) -> Result<Vec<u8>, Error>;
    fn verify(&self, key: &KeyMaterial, data: &[u8], signature: &[u8]) -> Result<bool, Error>;
}

/// Digest underlying an HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    #[cfg(feature = "legacy-algorithms")]
    Md5,
    #[cfg(feature = "legacy-algorithms")]
    Ripemd160,
}

impl HashType {
    /// Digest output length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
            #[cfg(feature = "legacy-algorithms")]
            Self::Md5 => 16,
            #[cfg(feature = "legacy-algorithms")]
            Self::Ripemd160 => 20,
        }
    }

    /// HMAC algorithm URI for this digest.
    pub fn hmac_uri(&self) -> &'static str {
        match self {
            Self::Sha1 => algorithm::HMAC_SHA1,
            Self::Sha224 => algorithm::HMAC_SHA224,
            Self::Sha256 => algorithm::HMAC_SHA256,
            Self::Sha384 => algorithm::HMAC_SHA384,
            Self::Sha512 => algorithm::HMAC_SHA512,
            #[cfg(feature = "legacy-algorithms")]
            Self::Md5 => algorithm::HMAC_MD5,
            #[cfg(feature = "legacy-algorithms")]
            Self::Ripemd160 => algorithm::HMAC_RIPEMD160,
        }
    }
}

// ── HMAC ─────────────────────────────────────────────────────────────

/// HMAC over the given digest.
///
/// Verification accepts a truncated MAC (`HMACOutputLength`) but never one
/// shorter than half the digest output or 80 bits, whichever is larger.
pub struct HmacSignature {
    hash: HashType,
}

impl HmacSignature {
    pub fn new(hash: HashType) -> Self {
        Self { hash }
    }

    fn min_truncated_len(&self) -> usize {
        (self.hash.output_len() / 2).max(10)
    }
}

impl SignatureAlgorithm for HmacSignature {
    fn uri(&self) -> &str {
        self.hash.hmac_uri()
    }

    fn sign(&self, key: &KeyMaterial, data: &[u8]) -> Result<Vec<u8>, Error> {
        let Some(secret) = key.secret() else {
            return Err(Error::Key("HMAC key required".into()));
        };
        compute_hmac(self.hash, secret, data)
    }

    fn verify(&self, key: &KeyMaterial, data: &[u8], signature: &[u8]) -> Result<bool, Error> {
        let Some(secret) = key.secret() else {
            return Err(Error::Key("HMAC key required".into()));
        };
        if signature.len() < self.min_truncated_len() {
            return Err(Error::Crypto(format!(
                "HMAC output length {} bits is below the minimum of {} bits",
                signature.len() * 8,
                self.min_truncated_len() * 8
            )));
        }
        let expected = compute_hmac(self.hash, secret, data)?;
        Ok(constant_time_eq(&expected, signature))
    }
}

fn compute_hmac(hash: HashType, key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    use hmac::{Hmac, Mac};
    macro_rules! hmac_compute {
        ($hasher:ty) => {{
            let mut mac = <Hmac<$hasher>>::new_from_slice(key)
                .map_err(|e| Error::Key(format!("invalid HMAC key: {e}")))?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }};
    }
    match hash {
        HashType::Sha1 => hmac_compute!(sha1::Sha1),
        HashType::Sha224 => hmac_compute!(sha2::Sha224),
        HashType::Sha256 => hmac_compute!(sha2::Sha256),
        HashType::Sha384 => hmac_compute!(sha2::Sha384),
        HashType::Sha512 => hmac_compute!(sha2::Sha512),
        #[cfg(feature = "legacy-algorithms")]
        HashType::Md5 => hmac_compute!(md5::Md5),
        #[cfg(feature = "legacy-algorithms")]
        HashType::Ripemd160 => hmac_compute!(ripemd::Ripemd160),
    }
}

/// Compares `signature` against the leading bytes of `expected`.
fn constant_time_eq(expected: &[u8], signature: &[u8]) -> bool {
    if signature.len() > expected.len() {
        return false;
    }
    expected[..signature.len()]
        .iter()
        .zip(signature)
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
