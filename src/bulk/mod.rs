//! Bulk JSON task input.

use serde_json::Value;

use crate::error::AnalyzeError;

/// Parses pasted bulk text into task records.
///
/// Blank input yields no records. Elements of the array are returned as-is;
/// rejecting malformed individual records is left to the service.
///
/// # Errors
///
/// Returns [`AnalyzeError::MalformedInput`] if the text is not JSON, and
/// [`AnalyzeError::Shape`] if the top-level value is not an array.
pub fn parse_bulk(text: &str) -> Result<Vec<Value>, AnalyzeError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(text)
        .map_err(|e| AnalyzeError::MalformedInput { message: e.to_string() })?;
    match value {
        Value::Array(items) => {
            tracing::debug!(count = items.len(), "parsed bulk tasks");
            Ok(items)
        }
        _ => Err(AnalyzeError::Shape),
    }
}
