#![forbid(unsafe_code)]

//! Registry categories.

use std::fmt;

/// The five kinds of pluggable implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Canonicalizer,
    Transform,
    SignatureAlgorithm,
    ResourceResolver,
    KeyResolver,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Canonicalizer,
        Category::Transform,
        Category::SignatureAlgorithm,
        Category::ResourceResolver,
        Category::KeyResolver,
    ];

    /// Short label used in log fields and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Canonicalizer => "canonicalizer",
            Self::Transform => "transform",
            Self::SignatureAlgorithm => "signature algorithm",
            Self::ResourceResolver => "resource resolver",
            Self::KeyResolver => "key resolver",
        }
    }

    /// Resolver categories are ordered chains keyed by implementation
    /// identifier rather than URI maps.
    pub fn is_resolver(&self) -> bool {
        matches!(self, Self::ResourceResolver | Self::KeyResolver)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
