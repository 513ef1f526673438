//! Logical field paths and the physical columns they are allowed to reach.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A physical column reference such as `entities.deletedAt`.
///
/// Each dot-separated part is quoted separately when rendered, so a column can
/// only ever become an identifier, never free SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    parts: Vec<String>,
}

impl Column {
    pub fn parse(text: &str) -> Result<Column, ConfigError> {
        let parts: Vec<String> = text.split('.').map(str::to_string).collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(ConfigError::InvalidColumn(text.to_string()));
        }
        Ok(Column { parts })
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl FromStr for Column {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::parse(s)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

/// The allowlist of fields a query may reference.
///
/// Keys are matched exactly and case-sensitively. Anything not in the map is
/// rejected by the compilers, whether or not the underlying table has it.
///
/// # Examples
///
/// ```
/// use odata_sql::FieldMap;
///
/// let map = FieldMap::new()
///     .with("age", "entity_defs.age")
///     .unwrap()
///     .with("__system/deletedAt", "entities.deletedAt")
///     .unwrap();
///
/// assert!(map.contains("age"));
/// assert!(!map.contains("Age"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: HashMap<String, Column>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert from a dotted column string.
    pub fn with(mut self, field: &str, column: &str) -> Result<Self, ConfigError> {
        self.insert(field, Column::parse(column)?);
        Ok(self)
    }

    pub fn insert(&mut self, field: impl Into<String>, column: Column) -> Option<Column> {
        self.fields.insert(field.into(), column)
    }

    pub fn get(&self, field: &str) -> Option<&Column> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.fields.iter().map(|(field, column)| (field.as_str(), column))
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .try_fold(FieldMap::new(), |map, (field, column)| map.with(field, column))
    }

    /// Load a map from a JSON object of `"field": "table.column"` entries.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let object = value.as_object().ok_or_else(|| {
            ConfigError::InvalidFieldMap("expected a JSON object".to_string())
        })?;

        let mut map = FieldMap::new();
        for (field, column) in object {
            let column = column.as_str().ok_or_else(|| {
                ConfigError::InvalidFieldMap(format!(
                    "column for field '{field}' must be a string"
                ))
            })?;
            map.insert(field.clone(), Column::parse(column)?);
        }
        Ok(map)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }
}

impl FromIterator<(String, Column)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (String, Column)>>(iter: T) -> Self {
        FieldMap {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_rejects_empty_parts() {
        assert!(Column::parse("entities.").is_err());
        assert!(Column::parse(".id").is_err());
        assert!(Column::parse("").is_err());
        assert_eq!(Column::parse("a.b.c").unwrap().parts().len(), 3);
    }

    #[test]
    fn test_from_json_rejects_non_string_columns() {
        let value = serde_json::json!({ "age": 5 });
        assert!(matches!(
            FieldMap::from_json(&value),
            Err(ConfigError::InvalidFieldMap(_))
        ));
    }
}
