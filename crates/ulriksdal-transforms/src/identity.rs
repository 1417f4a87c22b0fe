#![forbid(unsafe_code)]

//! Pass-through transform.

use crate::pipeline::{Transform, TransformContext, TransformData};
use ulriksdal_core::Error;

/// Returns its input unchanged.
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    fn execute(
        &self,
        input: TransformData,
        _ctx: &TransformContext<'_>,
    ) -> Result<TransformData, Error> {
        Ok(input)
    }
}
