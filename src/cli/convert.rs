//! JSON conversion utilities

use std::{fs, path::Path};

use super::CliError;
use crate::{FieldMap, RenderedSql};

/// Load a field map from a file path or from inline JSON text.
pub fn load_field_map(source: &str) -> Result<FieldMap, CliError> {
    let text = if source.trim_start().starts_with('{') {
        source.to_string()
    } else {
        fs::read_to_string(Path::new(source))?
    };
    Ok(FieldMap::from_json_str(&text)?)
}

/// `{"sql": "...", "params": [...]}`
pub fn rendered_to_json(rendered: &RenderedSql) -> serde_json::Value {
    serde_json::json!({
        "sql": rendered.sql,
        "params": rendered.params.iter().map(|p| p.to_json()).collect::<Vec<_>>(),
    })
}
