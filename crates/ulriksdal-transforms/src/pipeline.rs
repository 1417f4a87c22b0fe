#![forbid(unsafe_code)]

//! Transform pipeline and trait definitions.

use std::collections::BTreeMap;

use ulriksdal_core::{algorithm, Error};
use ulriksdal_registry::Registry;

use crate::c14n::Canonicalizer;

/// Data flowing through the transform pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformData {
    /// XML text (for XML-aware transforms like C14N).
    Xml(String),
    /// Raw octets.
    Binary(Vec<u8>),
}

impl TransformData {
    /// Convert to octets. XML is serialized with Canonical XML 1.0 (omitting
    /// comments) through the canonicalizer registered for that URI.
    pub fn to_octets(
        &self,
        canonicalizers: &Registry<dyn Canonicalizer>,
    ) -> Result<Vec<u8>, Error> {
        match self {
            TransformData::Binary(data) => Ok(data.clone()),
            TransformData::Xml(xml) => canonicalizers
                .create(algorithm::C14N)?
                .canonicalize(xml, &[]),
        }
    }

    /// View the data as text. Octets must be UTF-8.
    pub fn as_text(&self) -> Result<&str, Error> {
        match self {
            TransformData::Xml(xml) => Ok(xml),
            TransformData::Binary(data) => std::str::from_utf8(data)
                .map_err(|e| Error::Transform(format!("invalid UTF-8: {e}"))),
        }
    }
}

/// Named parameters of one transform step, e.g. the `PrefixList` of
/// exclusive canonicalization or the expression of an XPath filter.
///
/// Ordered so that iteration is identical on every platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformParams {
    values: BTreeMap<String, String>,
}

impl TransformParams {
    pub const PREFIX_LIST: &'static str = "PrefixList";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whitespace-separated `PrefixList` entries; `#default` stays as is.
    pub fn inclusive_prefixes(&self) -> Vec<String> {
        self.get(Self::PREFIX_LIST)
            .map(|list| list.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }
}

/// What a transform sees besides its input.
pub struct TransformContext<'a> {
    pub params: &'a TransformParams,
    pub canonicalizers: &'a Registry<dyn Canonicalizer>,
}

/// Trait for individual transforms.
pub trait Transform: Send + Sync {
    /// Execute the transform on the given data.
    fn execute(
        &self,
        input: TransformData,
        ctx: &TransformContext<'_>,
    ) -> Result<TransformData, Error>;
}

/// One step of a chain: algorithm URI plus parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformStep {
    pub uri: String,
    pub params: TransformParams,
}

impl TransformStep {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            params: TransformParams::default(),
        }
    }

    pub fn with_params(uri: impl Into<String>, params: TransformParams) -> Self {
        Self {
            uri: uri.into(),
            params,
        }
    }
}

/// Ordered transform steps of one reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformChain {
    steps: Vec<TransformStep>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameterless step.
    pub fn then(mut self, uri: impl Into<String>) -> Self {
        self.steps.push(TransformStep::new(uri));
        self
    }

    pub fn push(&mut self, step: TransformStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromIterator<TransformStep> for TransformChain {
    fn from_iter<I: IntoIterator<Item = TransformStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// A transform step failed. The whole chain is abandoned.
#[derive(Debug, thiserror::Error)]
#[error("transform step {step_index} ({uri}) failed: {cause}")]
pub struct PipelineError {
    /// Zero-based position of the failing step. Equal to the chain length
    /// when the final conversion to octets failed.
    pub step_index: usize,
    pub uri: String,
    #[source]
    pub cause: Error,
}

/// Executes transform chains against a transform registry.
pub struct TransformPipeline<'a> {
    transforms: &'a Registry<dyn Transform>,
    canonicalizers: &'a Registry<dyn Canonicalizer>,
}

impl<'a> TransformPipeline<'a> {
    pub fn new(
        transforms: &'a Registry<dyn Transform>,
        canonicalizers: &'a Registry<dyn Canonicalizer>,
    ) -> Self {
        Self {
            transforms,
            canonicalizers,
        }
    }

    /// Run every step of `chain` in order over `input`.
    ///
    /// All steps are resolved before any runs, so an unknown URI fails the
    /// chain without doing work.
    pub fn execute(
        &self,
        chain: TransformChain,
        input: TransformData,
    ) -> Result<TransformData, PipelineError> {
        let mut resolved = Vec::with_capacity(chain.len());
        for (index, step) in chain.steps.iter().enumerate() {
            let transform = self.transforms.create(&step.uri).map_err(|cause| PipelineError {
                step_index: index,
                uri: step.uri.clone(),
                cause,
            })?;
            resolved.push(transform);
        }

        let mut data = input;
        for (index, (step, transform)) in chain.steps.iter().zip(&resolved).enumerate() {
            let ctx = TransformContext {
                params: &step.params,
                canonicalizers: self.canonicalizers,
            };
            data = transform.execute(data, &ctx).map_err(|cause| {
                tracing::debug!(step = index, uri = %step.uri, error = %cause, "transform failed");
                PipelineError {
                    step_index: index,
                    uri: step.uri.clone(),
                    cause,
                }
            })?;
        }
        Ok(data)
    }

    /// Run `chain` and serialize the result to octets, ready for digesting.
    pub fn execute_to_octets(
        &self,
        chain: TransformChain,
        input: TransformData,
    ) -> Result<Vec<u8>, PipelineError> {
        let len = chain.len();
        let data = self.execute(chain, input)?;
        data.to_octets(self.canonicalizers).map_err(|cause| PipelineError {
            step_index: len,
            uri: algorithm::C14N.to_owned(),
            cause,
        })
    }
}
