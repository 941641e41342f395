//! Command implementations

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use schemaforge_codegen::{ArtifactTarget, Pipeline, ValidationResult};
use schemaforge_core::{FieldType, Operation};
use schemaforge_ir::{
    Diagnostics, FieldDefinition, SchemaDefinition, Validator, load_schema, save_schema_to_string,
};
use schemaforge_workflow::{InterpretationParams, Session, StaticInterpreter, WorkflowState};

use crate::settings::Settings;

// ============================================================================
// check
// ============================================================================

pub fn check(schema_path: &Path, json: bool, settings: &Settings) -> anyhow::Result<ExitCode> {
    let schema = load_schema(schema_path)
        .with_context(|| format!("failed to load {}", schema_path.display()))?;

    let diagnostics = Validator::with_default_rules(&settings.validation).validate(&schema);

    if json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        print_diagnostics(&diagnostics.errors, &diagnostics.warnings);
        print_summary(&schema, &diagnostics);
    }

    Ok(exit_code(!diagnostics.has_errors()))
}

fn print_summary(schema: &SchemaDefinition, diagnostics: &Diagnostics) {
    let status = if diagnostics.is_valid() {
        "valid".green().bold()
    } else {
        "invalid".red().bold()
    };
    println!(
        "{} {} ({} fields): {}, {} error(s), {} warning(s)",
        "Schema".bold(),
        schema.entity_name,
        schema.field_count(),
        status,
        diagnostics.errors.len(),
        diagnostics.warnings.len()
    );
}

// ============================================================================
// compile
// ============================================================================

pub fn compile(
    schema_path: &Path,
    target: Option<ArtifactTarget>,
    out: Option<&Path>,
    json: bool,
    settings: &Settings,
) -> anyhow::Result<ExitCode> {
    let schema = load_schema(schema_path)
        .with_context(|| format!("failed to load {}", schema_path.display()))?;

    let pipeline = Pipeline::new(settings.validation.clone(), settings.generator.clone());
    let result = pipeline.run(&schema).context("compilation failed")?;

    if json {
        println!("{}", result.to_json()?);
        return Ok(exit_code(result.success));
    }

    print_diagnostics(&result.errors, &result.warnings);

    let Some(bundle) = result.bundle() else {
        eprintln!(
            "{} {} was not compiled",
            "error:".red().bold(),
            schema.entity_name
        );
        return Ok(ExitCode::FAILURE);
    };

    let targets: Vec<ArtifactTarget> = match target {
        Some(target) => vec![target],
        None => ArtifactTarget::all().to_vec(),
    };

    match out {
        Some(dir) => {
            let written = write_targets(&result, &schema.entity_name, &targets, dir)?;
            for path in &written {
                println!("{} {}", "wrote".green(), path.display());
            }
        }
        None => {
            for target in &targets {
                if targets.len() > 1 {
                    println!(
                        "{}",
                        format!("==> {} <==", target.file_path(&schema.entity_name).display())
                            .cyan()
                    );
                }
                print!("{}", bundle.artifact(*target));
                if targets.len() > 1 {
                    println!();
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn write_targets(
    result: &ValidationResult,
    entity_name: &str,
    targets: &[ArtifactTarget],
    dir: &Path,
) -> anyhow::Result<Vec<std::path::PathBuf>> {
    let bundle = result.bundle().context("no artifacts to write")?;

    if targets.len() == ArtifactTarget::all().len() {
        return Ok(bundle.write_to_disk(entity_name, dir)?);
    }

    let mut written = Vec::new();
    for file in bundle.files(entity_name) {
        if !targets.iter().any(|t| t.file_path(entity_name) == file.path) {
            continue;
        }
        let full_path = dir.join(&file.path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&full_path, &file.content)
            .with_context(|| format!("failed to write {}", full_path.display()))?;
        written.push(full_path);
    }
    Ok(written)
}

// ============================================================================
// example
// ============================================================================

/// The bookstore inventory schema
pub fn example_schema(entity: Option<&str>) -> SchemaDefinition {
    SchemaDefinition::new(entity.unwrap_or("Book"))
        .with_field(
            FieldDefinition::new("id", FieldType::Number)
                .required()
                .with_label("ID"),
        )
        .with_field(FieldDefinition::new("title", FieldType::String).required())
        .with_field(FieldDefinition::new("author", FieldType::String).required())
        .with_field(FieldDefinition::new("publication_year", FieldType::Number))
        .with_field(FieldDefinition::new("stock", FieldType::Number).with_default("0"))
}

pub fn example(entity: Option<&str>) -> anyhow::Result<ExitCode> {
    println!("{}", save_schema_to_string(&example_schema(entity))?);
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// demo
// ============================================================================

pub fn demo(
    prompt: &str,
    entity: Option<&str>,
    operations: Vec<Operation>,
    settings: &Settings,
) -> anyhow::Result<ExitCode> {
    let mut params = InterpretationParams::new();
    if let Some(entity) = entity {
        params = params.with_entity_name(entity);
    }
    if !operations.is_empty() {
        params = params.with_operations(operations);
    }

    let pipeline = Pipeline::new(settings.validation.clone(), settings.generator.clone());
    let session = Session::with_parts(std::sync::Arc::new(StaticInterpreter::book()), pipeline);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(run_demo(&session, prompt, params))
}

async fn run_demo(
    session: &Session,
    prompt: &str,
    params: InterpretationParams,
) -> anyhow::Result<ExitCode> {
    session.submit(prompt, params).await?;
    if let Some(message) = session.last_error().await {
        anyhow::bail!("interpretation failed: {}", message);
    }

    if let Some(schema) = session.schema().await {
        println!("{} {}", "Proposed schema:".bold(), schema.entity_name);
        for field in &schema.fields {
            println!(
                "  {:<20} {:<8} {}",
                field.name,
                field.field_type.as_str(),
                if field.required { "required" } else { "" }
            );
        }
        let ops: Vec<&str> = schema
            .enabled_operations()
            .iter()
            .map(|op| op.as_str())
            .collect();
        println!("  operations: {}", ops.join(", "));
    }

    session.confirm().await?;
    if session.state().await != WorkflowState::Report {
        let message = session.last_error().await.unwrap_or_default();
        anyhow::bail!("confirmation failed: {}", message);
    }

    let result = session.result().await.context("no validation result")?;
    print_diagnostics(&result.errors, &result.warnings);
    if result.success {
        println!(
            "{} generated sql, orm, api and frontend artifacts",
            "✓".green().bold()
        );
    }
    Ok(exit_code(result.success))
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_diagnostics(
    errors: &[schemaforge_ir::ValidationError],
    warnings: &[schemaforge_ir::ValidationWarning],
) {
    for error in errors {
        eprintln!("{} {}", "error:".red().bold(), error);
        if let Some(suggestion) = &error.suggestion {
            eprintln!("  {} {}", "hint:".cyan(), suggestion);
        }
    }
    for warning in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_ir::save_schema;
    use tempfile::TempDir;

    #[test]
    fn test_example_schema_compiles() {
        let result = Pipeline::default().run(&example_schema(None)).unwrap();
        assert!(result.success);
    }

    #[test]
    fn test_example_schema_entity_override() {
        assert_eq!(example_schema(Some("Novel")).entity_name, "Novel");
    }

    #[test]
    fn test_compile_writes_single_target() {
        let dir = TempDir::new().unwrap();
        let schema_path = dir.path().join("book.json");
        save_schema(&example_schema(None), &schema_path).unwrap();
        let out = dir.path().join("gen");

        let code = compile(
            &schema_path,
            Some(ArtifactTarget::Sql),
            Some(&out),
            false,
            &Settings::default(),
        )
        .unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(out.join("migrations/create_books.sql").exists());
        assert!(!out.join("src/models/book.rs").exists());
    }

    #[test]
    fn test_check_invalid_schema_fails() {
        let dir = TempDir::new().unwrap();
        let schema_path = dir.path().join("empty.json");
        save_schema(&SchemaDefinition::new("Book"), &schema_path).unwrap();

        let code = check(&schema_path, false, &Settings::default()).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_missing_schema_is_error() {
        let result = check(Path::new("/no/such/schema.json"), false, &Settings::default());
        assert!(result.is_err());
    }
}
