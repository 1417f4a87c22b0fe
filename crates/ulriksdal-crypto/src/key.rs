#![forbid(unsafe_code)]

//! Key material handed to signature algorithms.

use std::fmt;

/// Key material produced by a key resolver.
///
/// Public-key material stays in its DER encoding; decoding it is the job of
/// the signature implementation that consumes it.
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// Shared secret for MAC algorithms.
    Secret(Vec<u8>),
    /// SubjectPublicKeyInfo DER, tagged with its KeyValue type URI.
    Public { key_type: String, der: Vec<u8> },
    /// PKCS#8 DER, tagged with its KeyValue type URI.
    Private { key_type: String, der: Vec<u8> },
}

impl KeyMaterial {
    pub fn secret(&self) -> Option<&[u8]> {
        match self {
            Self::Secret(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn key_type(&self) -> Option<&str> {
        match self {
            Self::Secret(_) => None,
            Self::Public { key_type, .. } | Self::Private { key_type, .. } => Some(key_type),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret(bytes) => write!(f, "Secret({} bytes)", bytes.len()),
            Self::Public { key_type, der } => f
                .debug_struct("Public")
                .field("key_type", key_type)
                .field("len", &der.len())
                .finish(),
            Self::Private { key_type, .. } => f
                .debug_struct("Private")
                .field("key_type", key_type)
                .finish_non_exhaustive(),
        }
    }
}
