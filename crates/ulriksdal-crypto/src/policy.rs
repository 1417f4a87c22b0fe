#![forbid(unsafe_code)]

//! Policy hook consulted before dispatching to a signature algorithm.
//!
//! The registry itself dispatches any registered URI. Callers that must not
//! accept legacy algorithms pass a policy to [`signature_for`].

use std::collections::BTreeSet;

use ulriksdal_core::{algorithm, Error};
use ulriksdal_registry::Registry;

use crate::sign::SignatureAlgorithm;

/// Decides whether an algorithm URI may be used.
pub trait AlgorithmPolicy: Send + Sync {
    fn permits(&self, uri: &str) -> bool;
}

/// Accepts every algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermitAll;

impl AlgorithmPolicy for PermitAll {
    fn permits(&self, _uri: &str) -> bool {
        true
    }
}

/// Rejects a fixed set of algorithm URIs.
#[derive(Debug, Clone, Default)]
pub struct RejectList {
    rejected: BTreeSet<String>,
}

impl RejectList {
    pub fn new() -> Self {
        Self::default()
    }

    /// MD5 and RIPEMD-160 based signature and MAC algorithms.
    pub fn legacy() -> Self {
        [
            algorithm::RSA_MD5,
            algorithm::HMAC_MD5,
            algorithm::RSA_RIPEMD160,
            algorithm::HMAC_RIPEMD160,
        ]
        .into_iter()
        .fold(Self::new(), |list, uri| list.reject(uri))
    }

    pub fn reject(mut self, uri: impl Into<String>) -> Self {
        self.rejected.insert(uri.into());
        self
    }

    pub fn rejected(&self) -> impl Iterator<Item = &str> {
        self.rejected.iter().map(String::as_str)
    }
}

impl AlgorithmPolicy for RejectList {
    fn permits(&self, uri: &str) -> bool {
        !self.rejected.contains(uri)
    }
}

/// Construct the signature algorithm registered for `uri`, provided the
/// policy permits it.
pub fn signature_for(
    registry: &Registry<dyn SignatureAlgorithm>,
    uri: &str,
    policy: &dyn AlgorithmPolicy,
) -> Result<Box<dyn SignatureAlgorithm>, Error> {
    if !policy.permits(uri) {
        tracing::warn!(uri, "signature algorithm rejected by policy");
        return Err(Error::AlgorithmRejected(uri.to_owned()));
    }
    registry.create(uri)
}
