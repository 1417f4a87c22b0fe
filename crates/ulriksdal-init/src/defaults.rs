#![forbid(unsafe_code)]

//! Compiled-in tables used when the registries are populated without a
//! configuration document.
//!
//! No canonicalizers and no resolvers are registered from these tables.

use ulriksdal_core::{algorithm, ns};

use crate::catalog::ids;

/// Namespace URI -> preferred prefix.
pub const NAMESPACE_PREFIXES: &[(&str, &str)] = &[
    (ns::DSIG, "ds"),
    (ns::ENC, "xenc"),
    (ns::EXPERIMENTAL, "experimental"),
    (ns::XPATH2_DRAFT, "dsig-xpath-old"),
    (ns::XPATH2, "dsig-xpath"),
    (ns::EXC_C14N, "ec"),
    (ns::XPATH_FILTER_LEGACY, "xx"),
];

/// Transform URI -> implementation identifier.
pub const TRANSFORMS: &[(&str, &str)] = &[
    (algorithm::BASE64, ids::BASE64_DECODE),
    (algorithm::C14N, ids::C14N_TRANSFORM),
    (algorithm::C14N_WITH_COMMENTS, ids::C14N_WITH_COMMENTS_TRANSFORM),
    (algorithm::C14N11, ids::C14N11_TRANSFORM),
    (algorithm::C14N11_WITH_COMMENTS, ids::C14N11_WITH_COMMENTS_TRANSFORM),
    (algorithm::EXC_C14N, ids::EXC_C14N_TRANSFORM),
    (algorithm::EXC_C14N_WITH_COMMENTS, ids::EXC_C14N_WITH_COMMENTS_TRANSFORM),
    (algorithm::XPATH, ids::XPATH),
    (algorithm::ENVELOPED_SIGNATURE, ids::ENVELOPED_SIGNATURE),
    (algorithm::XSLT, ids::XSLT),
    (algorithm::XPATH2, ids::XPATH2_FILTER),
    (algorithm::XPATH2_DRAFT, ids::XPATH2_FILTER),
];

/// Signature algorithm URI -> implementation identifier.
pub const SIGNATURES: &[(&str, &str)] = &[
    (algorithm::DSA_SHA1, ids::DSA_SHA1),
    (algorithm::RSA_SHA1, ids::RSA_SHA1),
    (algorithm::HMAC_SHA1, ids::HMAC_SHA1),
    (algorithm::RSA_MD5, ids::RSA_MD5),
    (algorithm::RSA_RIPEMD160, ids::RSA_RIPEMD160),
    (algorithm::RSA_SHA256, ids::RSA_SHA256),
    (algorithm::RSA_SHA384, ids::RSA_SHA384),
    (algorithm::RSA_SHA512, ids::RSA_SHA512),
    (algorithm::ECDSA_SHA1, ids::ECDSA_SHA1),
    (algorithm::ECDSA_SHA256, ids::ECDSA_SHA256),
    (algorithm::ECDSA_SHA384, ids::ECDSA_SHA384),
    (algorithm::ECDSA_SHA512, ids::ECDSA_SHA512),
    (algorithm::HMAC_MD5, ids::HMAC_MD5),
    (algorithm::HMAC_RIPEMD160, ids::HMAC_RIPEMD160),
    (algorithm::HMAC_SHA256, ids::HMAC_SHA256),
    (algorithm::HMAC_SHA384, ids::HMAC_SHA384),
    (algorithm::HMAC_SHA512, ids::HMAC_SHA512),
];

/// Locale installed by default-table initialization.
pub const LOCALE: (&str, &str) = ("en", "US");
