//! # Artifact Compiler
//!
//! The [`Generator`] turns a schema into an [`ArtifactBundle`]; the
//! [`Pipeline`] puts validation in front of it and produces the
//! [`ValidationResult`] contract.
//!
//! ## Pipeline
//!
//! ```text
//! SchemaDefinition
//!         │
//!         ▼
//!   Validator::validate()  ── errors ──► ValidationResult { success: false }
//!         │
//!         ▼
//!   GenerationContext::from_schema()
//!         │
//!         ├──► migrations::generate_migration()  → sql
//!         ├──► rust::generate_model()            → orm
//!         ├──► rust::generate_handlers()         → api
//!         ├──► frontend::generate_list_page()    → frontend
//!         │
//!         ▼
//!   ValidationResult { success: true, warnings, generatedFiles }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemaforge_codegen::Pipeline;
//!
//! let result = Pipeline::default().run(&schema)?;
//! if let Some(bundle) = result.bundle() {
//!     println!("{}", bundle.sql);
//! }
//! ```

use schemaforge_core::{EngineError, EngineResult};
use schemaforge_ir::{SchemaDefinition, ValidationConfig, Validator};

use crate::context::GenerationContext;
use crate::frontend;
use crate::migrations;
use crate::migrations::sql::quote_ident;
use crate::rust;
use crate::{ArtifactBundle, GeneratorConfig, ValidationResult};

// ============================================================================
// Generator
// ============================================================================

/// Compiles a schema into the four artifacts.
///
/// The generator is stateless aside from its configuration, and the same
/// schema always yields byte-identical output.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Compile all four artifacts.
    ///
    /// Callers are expected to have validated the schema; compiling an
    /// invalid schema produces output but it is not meaningful.
    pub fn compile(&self, schema: &SchemaDefinition) -> ArtifactBundle {
        let ctx = GenerationContext::from_schema(schema, self.config.clone());

        ArtifactBundle {
            sql: migrations::generate_migration(&ctx),
            orm: rust::generate_model(&ctx),
            api: rust::generate_handlers(&ctx),
            frontend: frontend::generate_list_page(&ctx),
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Validation followed by compilation
pub struct Pipeline {
    validator: Validator,
    generator: Generator,
}

impl Pipeline {
    pub fn new(validation: ValidationConfig, generation: GeneratorConfig) -> Self {
        Self {
            validator: Validator::with_default_rules(&validation),
            generator: Generator::new(generation),
        }
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Validate the schema and, when it has no errors, compile it.
    ///
    /// A schema with errors yields `Ok` with `success == false` and no
    /// artifacts. `Err` is reserved for faults inside the compiler itself.
    pub fn run(&self, schema: &SchemaDefinition) -> EngineResult<ValidationResult> {
        let diagnostics = self.validator.validate(schema);

        if diagnostics.has_errors() {
            tracing::info!(
                entity = %schema.entity_name,
                errors = diagnostics.errors.len(),
                warnings = diagnostics.warnings.len(),
                "schema rejected",
            );
            return Ok(ValidationResult::rejected(diagnostics));
        }

        let bundle = self.generator.compile(schema);
        let ctx = GenerationContext::from_schema(schema, self.generator.config().clone());
        if let Err(e) = verify_bundle(&ctx, &bundle) {
            tracing::error!(entity = %schema.entity_name, error = %e, "compiled bundle is inconsistent");
            return Err(e);
        }

        tracing::info!(
            entity = %schema.entity_name,
            warnings = diagnostics.warnings.len(),
            "schema compiled",
        );

        Ok(ValidationResult::compiled(diagnostics.warnings, bundle))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ValidationConfig::default(), GeneratorConfig::default())
    }
}

/// Sanity checks on a freshly compiled bundle
fn verify_bundle(ctx: &GenerationContext, bundle: &ArtifactBundle) -> EngineResult<()> {
    let module = ctx.module();
    if !module.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(EngineError::internal(format!(
            "entity '{}' has no usable module name",
            ctx.entity_name()
        )));
    }

    let table = quote_ident(&ctx.table(), ctx.database());
    if !bundle.sql.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)) {
        return Err(EngineError::internal(format!(
            "SQL artifact does not define table '{}'",
            table
        )));
    }
    if !bundle.orm.contains("pub struct Model {") {
        return Err(EngineError::internal("ORM artifact has no Model struct"));
    }
    if !bundle.api.contains("pub fn router()") {
        return Err(EngineError::internal("API artifact has no router"));
    }

    let component = GenerationContext::list_component_name(ctx.entity_name());
    if !bundle.frontend.contains(&format!("pub fn {}()", component)) {
        return Err(EngineError::internal(format!(
            "frontend artifact has no '{}' component",
            component
        )));
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
