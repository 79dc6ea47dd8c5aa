//! JSON output formatter

use crate::models::OutlineTree;
use crate::output::FormatError;

/// Format an outline tree as pretty-printed JSON
pub fn format_json(data: &OutlineTree) -> Result<String, FormatError> {
    serde_json::to_string_pretty(data).map_err(FormatError::from)
}
