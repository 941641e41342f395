//! TOML settings file
//!
//! ```toml
//! [validation]
//! pagination_threshold = 10
//! relation_suffixes = ["_id", "_ref"]
//!
//! [generator]
//! database = "sqlite"
//! api_prefix = "/v1"
//! doc_comments = false
//! ```
//!
//! Every key is optional.

use std::path::Path;

use schemaforge_codegen::GeneratorConfig;
use schemaforge_core::{EngineError, EngineResult, ResultExt};
use schemaforge_ir::ValidationConfig;
use serde::{Deserialize, Serialize};

/// Validation and generator settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub validation: ValidationConfig,
    pub generator: GeneratorConfig,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let settings = Self::from_toml_str(&text)
            .with_context(format!("settings file '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> EngineResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let mut settings: Settings = toml::from_str(text)?;

        if settings.validation.pagination_threshold == 0 {
            return Err(EngineError::InvalidConfig(
                "validation.pagination_threshold must be at least 1".to_string(),
            ));
        }
        if settings
            .validation
            .relation_suffixes
            .iter()
            .any(|suffix| suffix.trim().is_empty())
        {
            return Err(EngineError::InvalidConfig(
                "validation.relation_suffixes must not contain empty suffixes".to_string(),
            ));
        }

        let prefix = std::mem::take(&mut settings.generator.api_prefix);
        settings.generator = settings.generator.with_api_prefix(prefix);
        Ok(settings)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_core::DatabaseType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_sections() {
        let settings = Settings::from_toml_str(
            r#"
[validation]
pagination_threshold = 12

[generator]
database = "mysql"
api_prefix = "/v1/"
"#,
        )
        .unwrap();

        assert_eq!(settings.validation.pagination_threshold, 12);
        assert_eq!(
            settings.validation.relation_suffixes,
            ValidationConfig::default().relation_suffixes
        );
        assert_eq!(settings.generator.database, DatabaseType::MySQL);
        assert_eq!(settings.generator.api_prefix, "/v1");
        assert!(settings.generator.doc_comments);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let err = Settings::from_toml_str("[validation]\npagination_threshold = 0\n").unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Settings::from_toml_str("[generator\n").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[generator]\ndoc_comments = false").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert!(!settings.generator.doc_comments);

        let missing = Settings::load("/definitely/not/here.toml").unwrap_err();
        assert!(missing.is_io());
    }

    #[test]
    fn test_load_invalid_file_names_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[validation]\npagination_threshold = 0").unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        match err {
            EngineError::WithContext { context, message } => {
                assert!(context.contains(&file.path().display().to_string()));
                assert!(message.contains("pagination_threshold"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
