#![forbid(unsafe_code)]

//! Signature algorithm category for the Ulriksdal XML Security toolkit.
//!
//! Public-key signature families are supplied by the host through the
//! implementation catalog; the HMAC family is built in.

pub mod key;
pub mod policy;
pub mod sign;

pub use key::KeyMaterial;
pub use policy::{signature_for, AlgorithmPolicy, PermitAll, RejectList};
pub use sign::{HashType, HmacSignature, SignatureAlgorithm};
