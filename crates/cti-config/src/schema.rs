//! Column type schema loaded from a side file.
//!
//! The file is a flat JSON object mapping column names to type names:
//!
//! ```json
//! { "amount": "Float", "count": "Integer", "score": "Number" }
//! ```
//!
//! Type names are free-form here; the transformer decides what they mean.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error};

/// Errors from loading a schema file.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<SchemaError> for cti_common::Error {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Io(e) => cti_common::Error::Io(e),
            SchemaError::Parse(e) => cti_common::Error::InvalidSchema(e.to_string()),
        }
    }
}

/// Column name to declared type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaMapping(BTreeMap<String, String>);

impl SchemaMapping {
    /// Decode a schema from any reader.
    ///
    /// Failures are logged with the underlying decode error before being
    /// returned.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SchemaError> {
        match serde_json::from_reader::<_, BTreeMap<String, String>>(reader) {
            Ok(columns) => {
                debug!(columns = columns.len(), "schema loaded");
                Ok(Self(columns))
            }
            Err(e) => {
                error!(error = %e, "schema decode failed");
                error!("unable to parse schema file");
                Err(SchemaError::Parse(e))
            }
        }
    }

    /// Open and decode a schema file.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let file = File::open(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "unable to open schema file");
            SchemaError::Io(e)
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Declared type name for a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Decode `reader` into `mapping`, returning whether it succeeded.
///
/// `mapping` is only replaced on success.
pub fn load_schema<R: Read>(mapping: &mut SchemaMapping, reader: R) -> bool {
    match SchemaMapping::from_reader(reader) {
        Ok(loaded) => {
            *mapping = loaded;
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_flat_object() {
        let schema =
            SchemaMapping::from_reader(r#"{"colA":"Integer","colB":"Float"}"#.as_bytes()).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("colA"), Some("Integer"));
        assert_eq!(schema.get("colB"), Some("Float"));
        assert_eq!(schema.get("colC"), None);
    }

    #[test]
    fn type_names_are_not_checked() {
        let schema = SchemaMapping::from_reader(r#"{"x":"Whatever"}"#.as_bytes()).unwrap();
        assert_eq!(schema.get("x"), Some("Whatever"));
    }

    #[test]
    fn empty_object_is_valid() {
        let schema = SchemaMapping::from_reader("{}".as_bytes()).unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn rejects_malformed_and_non_object_input() {
        for bad in [
            "{",
            "not json",
            "[\"a\"]",
            "\"Integer\"",
            "null",
            r#"{"a": 1}"#,
            r#"{"a": {"nested": "Integer"}}"#,
        ] {
            assert!(
                matches!(
                    SchemaMapping::from_reader(bad.as_bytes()),
                    Err(SchemaError::Parse(_))
                ),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn load_schema_populates_on_success() {
        let mut mapping = SchemaMapping::default();
        assert!(load_schema(&mut mapping, r#"{"colA":"Integer"}"#.as_bytes()));
        assert_eq!(mapping.get("colA"), Some("Integer"));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn load_schema_leaves_mapping_untouched_on_failure() {
        let mut mapping = SchemaMapping::default();
        assert!(!load_schema(&mut mapping, "{\"colA\":".as_bytes()));
        assert!(mapping.is_empty());

        assert!(load_schema(&mut mapping, r#"{"keep":"Number"}"#.as_bytes()));
        assert!(!load_schema(&mut mapping, "[]".as_bytes()));
        assert_eq!(mapping.get("keep"), Some("Number"));
    }

    #[test]
    fn iter_is_name_ordered() {
        let schema =
            SchemaMapping::from_reader(r#"{"b":"Float","a":"Integer"}"#.as_bytes()).unwrap();
        let cols: Vec<_> = schema.iter().collect();
        assert_eq!(cols, vec![("a", "Integer"), ("b", "Float")]);
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"key 1": "Integer", "key": "Float"}}"#).unwrap();
        let schema = SchemaMapping::from_path(file.path()).unwrap();
        assert_eq!(schema.get("key 1"), Some("Integer"));
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let err = SchemaMapping::from_path(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(matches!(err, SchemaError::Io(_)));
        assert_eq!(cti_common::Error::from(err).code(), 60);
    }
}
