//! Loading and saving schema files
//!
//! Schema files are JSON. Files written by this crate wrap the schema in a
//! `SchemaFile` with a version number; bare schemas (the shape produced by
//! the interpretation collaborator) are accepted as well.

use crate::SCHEMA_VERSION;
use crate::schema::SchemaDefinition;
use schemaforge_core::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Schema File Wrapper
// ============================================================================

/// Wrapper for schema files that includes version information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFile {
    /// Version of the file layout
    pub schema_version: u32,

    /// The schema itself
    pub schema: SchemaDefinition,
}

impl SchemaFile {
    pub fn new(schema: SchemaDefinition) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            schema,
        }
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a schema to a file, creating parent directories as needed
pub fn save_schema(schema: &SchemaDefinition, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();
    let json = save_schema_to_string(schema).map_err(|e| EngineError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, json).map_err(|e| EngineError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), "Saved schema");
    Ok(())
}

/// Save a schema to a pretty-printed JSON string
pub fn save_schema_to_string(schema: &SchemaDefinition) -> EngineResult<String> {
    Ok(serde_json::to_string_pretty(&SchemaFile::new(schema.clone()))?)
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a schema from a file
///
/// ```rust,ignore
/// use schemaforge_ir::load_schema;
///
/// let schema = load_schema("book.json")?;
/// println!("Loaded entity: {}", schema.entity_name);
/// ```
pub fn load_schema(path: impl AsRef<Path>) -> EngineResult<SchemaDefinition> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::SchemaNotFound(path.to_path_buf()));
    }

    let json = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_schema_from_string(&json).map_err(|e| match e {
        EngineError::JsonSerialization(je) => EngineError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid schema file format: {}", je),
        },
        other => other,
    })
}

/// Load a schema from a JSON string (wrapped or bare)
pub fn load_schema_from_string(json: &str) -> EngineResult<SchemaDefinition> {
    if let Ok(file) = serde_json::from_str::<SchemaFile>(json) {
        if file.schema_version > SCHEMA_VERSION {
            return Err(EngineError::InvalidSchemaFormat(format!(
                "schema version {} is newer than supported version {}",
                file.schema_version, SCHEMA_VERSION
            )));
        }
        return Ok(file.schema);
    }

    let schema: SchemaDefinition = serde_json::from_str(json)?;
    Ok(schema)
}

/// Load a schema from bytes
pub fn load_schema_from_bytes(bytes: &[u8]) -> EngineResult<SchemaDefinition> {
    let json = std::str::from_utf8(bytes)
        .map_err(|e| EngineError::InvalidSchemaFormat(format!("Invalid UTF-8: {}", e)))?;
    load_schema_from_string(json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDefinition;
    use schemaforge_core::FieldType;
    use tempfile::TempDir;

    fn book() -> SchemaDefinition {
        SchemaDefinition::new("Book")
            .with_field(FieldDefinition::new("title", FieldType::String).required())
            .with_field(FieldDefinition::new("stock", FieldType::Number).with_default("0"))
    }

    #[test]
    fn test_save_and_load_schema() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("book.json");

        let schema = book();
        save_schema(&schema, &path).unwrap();
        assert!(path.exists());

        let loaded = load_schema(&path).unwrap();
        assert_eq!(loaded, schema);
    }

    #[test]
    fn test_load_bare_schema() {
        let json = r#"{
            "entityName": "Book",
            "fields": [{"name": "title", "label": "Title", "type": "string", "required": true}],
            "operations": {"create": true, "read": true, "update": true, "delete": false}
        }"#;
        let schema = load_schema_from_string(json).unwrap();
        assert_eq!(schema.entity_name, "Book");
        assert!(!schema.operations.delete);
    }

    #[test]
    fn test_load_newer_version_fails() {
        let json = format!(
            r#"{{"schemaVersion": {}, "schema": {{"entityName": "Book"}}}}"#,
            SCHEMA_VERSION + 1
        );
        let err = load_schema_from_string(&json).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSchemaFormat(_)));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_schema("/nonexistent/path/book.json");
        match result {
            Err(EngineError::SchemaNotFound(path)) => {
                assert!(path.to_string_lossy().contains("nonexistent"));
            }
            other => panic!("Expected SchemaNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_schema(&path).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_load_from_bytes() {
        let json = save_schema_to_string(&book()).unwrap();
        let schema = load_schema_from_bytes(json.as_bytes()).unwrap();
        assert_eq!(schema.field_count(), 2);

        assert!(load_schema_from_bytes(&[0xff, 0xfe]).is_err());
    }
}
