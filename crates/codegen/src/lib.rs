//! # SchemaForge Codegen
//!
//! Artifact compiler for SchemaForge.
//!
//! This crate turns a validated [`SchemaDefinition`] into four source
//! artifacts that share one type-mapping table:
//!
//! - **SQL**: a `CREATE TABLE` statement (plus indexes) for the chosen dialect
//! - **ORM**: a SeaORM entity module
//! - **API**: Axum handlers, payload DTOs and a router for the enabled operations
//! - **Frontend**: a Dioxus listing page
//!
//! The [`Pipeline`] combines validation and compilation and produces the
//! [`ValidationResult`] output contract.
//!

// ============================================================================
// Modules
// ============================================================================

pub mod context;
pub mod frontend;
pub mod generator;
pub mod mapping;
pub mod migrations;
pub mod rust;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::GenerationContext;
pub use generator::{Generator, Pipeline};
pub use mapping::{BindingType, FieldCheck, StorageType, TypeMapping, WidgetKind, mapping_for};

use schemaforge_core::{DatabaseType, EngineError, EngineResult};
use schemaforge_ir::{Diagnostics, SchemaDefinition, ValidationError, ValidationWarning};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix used for API routes unless configured otherwise
pub const DEFAULT_API_PREFIX: &str = "/api";

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the artifact compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// SQL dialect for the data-definition artifact
    pub database: DatabaseType,

    /// Path prefix for generated routes (e.g. "/api")
    pub api_prefix: String,

    /// Whether to emit documentation comments in generated code
    pub doc_comments: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            database: DatabaseType::PostgreSQL,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            doc_comments: true,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SQL dialect
    pub fn with_database(mut self, database: DatabaseType) -> Self {
        self.database = database;
        self
    }

    /// Set the route prefix; a trailing slash is dropped
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    /// Disable documentation comments
    pub fn without_docs(mut self) -> Self {
        self.doc_comments = false;
        self
    }
}

// ============================================================================
// GeneratedFile
// ============================================================================

/// Represents a single generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from output directory
    pub path: PathBuf,

    /// File content
    pub content: String,

    /// File type for categorization
    pub file_type: FileType,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, file_type: FileType) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            file_type,
        }
    }

    /// Create a Rust source file
    pub fn rust(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileType::Rust)
    }

    /// Create a SQL file
    pub fn sql(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileType::Sql)
    }

    /// Get the file extension
    pub fn extension(&self) -> &str {
        self.file_type.extension()
    }
}

/// Type of generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Rust,
    Sql,
}

impl FileType {
    /// Get the file extension for this type
    pub fn extension(&self) -> &str {
        match self {
            FileType::Rust => "rs",
            FileType::Sql => "sql",
        }
    }
}

// ============================================================================
// ArtifactTarget
// ============================================================================

/// One of the four artifacts in a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactTarget {
    Sql,
    Orm,
    Api,
    Frontend,
}

impl ArtifactTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactTarget::Sql => "sql",
            ArtifactTarget::Orm => "orm",
            ArtifactTarget::Api => "api",
            ArtifactTarget::Frontend => "frontend",
        }
    }

    /// All targets in bundle order
    pub fn all() -> &'static [ArtifactTarget] {
        &[
            ArtifactTarget::Sql,
            ArtifactTarget::Orm,
            ArtifactTarget::Api,
            ArtifactTarget::Frontend,
        ]
    }

    /// Conventional output path for this artifact
    pub fn file_path(&self, entity_name: &str) -> PathBuf {
        let module = GenerationContext::module_name(entity_name);
        match self {
            ArtifactTarget::Sql => PathBuf::from(format!(
                "migrations/create_{}.sql",
                GenerationContext::table_name(entity_name)
            )),
            ArtifactTarget::Orm => PathBuf::from(format!("src/models/{}.rs", module)),
            ArtifactTarget::Api => PathBuf::from(format!("src/handlers/{}.rs", module)),
            ArtifactTarget::Frontend => {
                PathBuf::from(format!("frontend/src/pages/{}_list.rs", module))
            }
        }
    }

    fn file_type(&self) -> FileType {
        match self {
            ArtifactTarget::Sql => FileType::Sql,
            _ => FileType::Rust,
        }
    }
}

impl std::fmt::Display for ArtifactTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ArtifactTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactTarget::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown artifact '{}' (expected sql, orm, api or frontend)", s))
    }
}

// ============================================================================
// ArtifactBundle
// ============================================================================

/// The four generated artifacts; they always appear together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub sql: String,
    pub orm: String,
    pub api: String,
    pub frontend: String,
}

impl ArtifactBundle {
    /// Get one artifact by target
    pub fn artifact(&self, target: ArtifactTarget) -> &str {
        match target {
            ArtifactTarget::Sql => &self.sql,
            ArtifactTarget::Orm => &self.orm,
            ArtifactTarget::Api => &self.api,
            ArtifactTarget::Frontend => &self.frontend,
        }
    }

    /// Map the bundle onto files with conventional relative paths
    pub fn files(&self, entity_name: &str) -> Vec<GeneratedFile> {
        ArtifactTarget::all()
            .iter()
            .map(|target| {
                GeneratedFile::new(
                    target.file_path(entity_name),
                    self.artifact(*target),
                    target.file_type(),
                )
            })
            .collect()
    }

    /// Write all files under `base_dir`, returning the written paths
    pub fn write_to_disk(
        &self,
        entity_name: &str,
        base_dir: impl AsRef<Path>,
    ) -> EngineResult<Vec<PathBuf>> {
        let base_dir = base_dir.as_ref();
        let mut written = Vec::new();

        for file in self.files(entity_name) {
            let full_path = base_dir.join(&file.path);

            // Create parent directories
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }

            std::fs::write(&full_path, &file.content).map_err(|e| EngineError::FileWrite {
                path: full_path.clone(),
                message: e.to_string(),
            })?;
            written.push(full_path);
        }

        Ok(written)
    }
}

// ============================================================================
// ValidationResult
// ============================================================================

/// Outcome of one validate-then-compile run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True iff `errors` is empty
    pub success: bool,

    pub errors: Vec<ValidationError>,

    pub warnings: Vec<ValidationWarning>,

    /// Present iff `success`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_files: Option<ArtifactBundle>,
}

impl ValidationResult {
    /// A failed result: diagnostics only, no artifacts
    pub fn rejected(diagnostics: Diagnostics) -> Self {
        Self {
            success: false,
            errors: diagnostics.errors,
            warnings: diagnostics.warnings,
            generated_files: None,
        }
    }

    /// A successful result carrying the bundle and any warnings
    pub fn compiled(warnings: Vec<ValidationWarning>, bundle: ArtifactBundle) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            generated_files: Some(bundle),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The generated bundle, if compilation ran
    pub fn bundle(&self) -> Option<&ArtifactBundle> {
        self.generated_files.as_ref()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Convenience
// ============================================================================

/// Validate and compile a schema with default configuration
pub fn compile_schema(schema: &SchemaDefinition) -> EngineResult<ValidationResult> {
    Pipeline::default().run(schema)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_core::FieldType;
    use schemaforge_ir::FieldDefinition;
    use tempfile::TempDir;

    fn book() -> SchemaDefinition {
        SchemaDefinition::new("Book")
            .with_field(FieldDefinition::new("title", FieldType::String).required())
    }

    #[test]
    fn test_generator_config_default() {
        let config = GeneratorConfig::default();
        assert_eq!(config.database, DatabaseType::PostgreSQL);
        assert_eq!(config.api_prefix, "/api");
        assert!(config.doc_comments);
    }

    #[test]
    fn test_generator_config_builder() {
        let config = GeneratorConfig::new()
            .with_database(DatabaseType::SQLite)
            .with_api_prefix("/v1/")
            .without_docs();

        assert_eq!(config.database, DatabaseType::SQLite);
        assert_eq!(config.api_prefix, "/v1");
        assert!(!config.doc_comments);
    }

    #[test]
    fn test_generated_file() {
        let file = GeneratedFile::sql("migrations/create_books.sql", "CREATE TABLE books ();");
        assert_eq!(file.extension(), "sql");
        assert_eq!(file.file_type, FileType::Sql);
    }

    #[test]
    fn test_artifact_target_parse() {
        assert_eq!("ORM".parse::<ArtifactTarget>(), Ok(ArtifactTarget::Orm));
        assert!("docs".parse::<ArtifactTarget>().is_err());
    }

    #[test]
    fn test_bundle_files_paths() {
        let bundle = compile_schema(&book()).unwrap().generated_files.unwrap();
        let paths: Vec<String> = bundle
            .files("BookCopy")
            .iter()
            .map(|f| f.path.to_string_lossy().to_string())
            .collect();

        assert_eq!(
            paths,
            vec![
                "migrations/create_book_copies.sql",
                "src/models/book_copy.rs",
                "src/handlers/book_copy.rs",
                "frontend/src/pages/book_copy_list.rs",
            ]
        );
    }

    #[test]
    fn test_bundle_write_to_disk() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = compile_schema(&book()).unwrap().generated_files.unwrap();

        let written = bundle.write_to_disk("Book", temp_dir.path()).unwrap();
        assert_eq!(written.len(), 4);

        let sql = std::fs::read_to_string(temp_dir.path().join("migrations/create_books.sql"))
            .unwrap();
        assert_eq!(sql, bundle.sql);
    }

    #[test]
    fn test_result_json_contract() {
        let result = compile_schema(&book()).unwrap();
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["success"], true);
        assert!(value["errors"].as_array().unwrap().is_empty());
        for key in ["sql", "orm", "api", "frontend"] {
            assert!(value["generatedFiles"][key].is_string(), "missing {}", key);
        }
    }

    #[test]
    fn test_failed_result_omits_files() {
        let result = compile_schema(&SchemaDefinition::new("Book")).unwrap();
        assert!(!result.success);
        assert!(result.bundle().is_none());

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("generatedFiles").is_none());
    }
}
