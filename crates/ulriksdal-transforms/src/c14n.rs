#![forbid(unsafe_code)]

//! Canonicalizer category and the canonicalization transforms.
//!
//! The byte-level serialization is supplied by whichever [`Canonicalizer`]
//! is registered under the algorithm URI; the transforms here only dispatch.

use ulriksdal_core::{algorithm, Error};

use crate::pipeline::{Transform, TransformContext, TransformData};

/// Serializes XML to its canonical octet form.
///
/// Implementations must be idempotent: canonicalizing canonical output
/// reproduces it unchanged.
pub trait Canonicalizer: Send + Sync {
    /// `inclusive_prefixes` is the `InclusiveNamespaces` prefix list; only
    /// exclusive variants consult it.
    fn canonicalize(&self, xml: &str, inclusive_prefixes: &[String]) -> Result<Vec<u8>, Error>;
}

/// The canonicalization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum C14nMode {
    /// Canonical XML 1.0
    Inclusive,
    /// Canonical XML 1.0 with comments
    InclusiveWithComments,
    /// Canonical XML 1.1
    Inclusive11,
    /// Canonical XML 1.1 with comments
    Inclusive11WithComments,
    /// Exclusive Canonical XML 1.0
    Exclusive,
    /// Exclusive Canonical XML 1.0 with comments
    ExclusiveWithComments,
}

impl C14nMode {
    pub const ALL: [C14nMode; 6] = [
        Self::Inclusive,
        Self::InclusiveWithComments,
        Self::Inclusive11,
        Self::Inclusive11WithComments,
        Self::Exclusive,
        Self::ExclusiveWithComments,
    ];

    /// Get the algorithm URI for this mode.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Inclusive => algorithm::C14N,
            Self::InclusiveWithComments => algorithm::C14N_WITH_COMMENTS,
            Self::Inclusive11 => algorithm::C14N11,
            Self::Inclusive11WithComments => algorithm::C14N11_WITH_COMMENTS,
            Self::Exclusive => algorithm::EXC_C14N,
            Self::ExclusiveWithComments => algorithm::EXC_C14N_WITH_COMMENTS,
        }
    }

    /// Parse a C14N mode from an algorithm URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.uri() == uri)
    }

    pub fn with_comments(&self) -> bool {
        matches!(
            self,
            Self::InclusiveWithComments
                | Self::Inclusive11WithComments
                | Self::ExclusiveWithComments
        )
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(self, Self::Exclusive | Self::ExclusiveWithComments)
    }
}

/// A canonicalization transform. Delegates to the canonicalizer registered
/// under the same URI.
pub struct C14nTransform {
    mode: C14nMode,
}

impl C14nTransform {
    pub fn new(mode: C14nMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> C14nMode {
        self.mode
    }
}

impl Transform for C14nTransform {
    fn execute(
        &self,
        input: TransformData,
        ctx: &TransformContext<'_>,
    ) -> Result<TransformData, Error> {
        let canonicalizer = ctx.canonicalizers.create(self.mode.uri()).map_err(|_| {
            Error::Canonicalization(format!("no canonicalizer registered for {}", self.mode.uri()))
        })?;

        let prefixes = if self.mode.is_exclusive() {
            ctx.params.inclusive_prefixes()
        } else {
            Vec::new()
        };

        let bytes = canonicalizer.canonicalize(input.as_text()?, &prefixes)?;
        Ok(TransformData::Binary(bytes))
    }
}
