#![forbid(unsafe_code)]

//! Transform pipeline engine for the Ulriksdal XML Security toolkit.
//!
//! A reference carries a chain of transforms identified by algorithm URI.
//! The pipeline looks each one up in the transform registry and applies them
//! strictly in order.

pub mod base64_transform;
pub mod c14n;
pub mod identity;
pub mod pipeline;

pub use base64_transform::Base64DecodeTransform;
pub use c14n::{C14nMode, C14nTransform, Canonicalizer};
pub use identity::IdentityTransform;
pub use pipeline::{
    PipelineError, Transform, TransformChain, TransformContext, TransformData, TransformParams,
    TransformPipeline, TransformStep,
};
