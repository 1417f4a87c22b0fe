#![forbid(unsafe_code)]

//! Base64 decode transform.

use crate::pipeline::{Transform, TransformContext, TransformData};
use ulriksdal_core::Error;

/// Decodes Base64-encoded data.
///
/// XML input contributes the concatenated text of the document; octet input
/// must be UTF-8. Whitespace is ignored.
pub struct Base64DecodeTransform;

impl Transform for Base64DecodeTransform {
    fn execute(
        &self,
        input: TransformData,
        _ctx: &TransformContext<'_>,
    ) -> Result<TransformData, Error> {
        use base64::Engine;
        let engine = base64::engine::general_purpose::STANDARD;

        let text = match &input {
            TransformData::Binary(data) => std::str::from_utf8(data)
                .map_err(|e| Error::Transform(format!("base64 input not UTF-8: {e}")))?
                .to_owned(),
            TransformData::Xml(xml) => text_content(xml)?,
        };

        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        let decoded = engine
            .decode(&cleaned)
            .map_err(|e| Error::Base64(format!("decode error: {e}")))?;

        Ok(TransformData::Binary(decoded))
    }
}

fn text_content(xml: &str) -> Result<String, Error> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| Error::Transform(format!("base64 input is not well-formed XML: {e}")))?;
    Ok(doc
        .root()
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect())
}
