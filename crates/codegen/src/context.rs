//! # Generation Context
//!
//! The `GenerationContext` holds everything the generators need to render
//! one schema:
//!
//! - The schema snapshot and generator configuration
//! - Naming (module, table, DTO and component names, route paths)
//! - The identity column and the ordered data columns
//! - Per-field type mappings
//!

use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use schemaforge_core::{DatabaseType, Operation};
use schemaforge_ir::{FieldDefinition, IDENTITY_FIELD_NAME, SchemaDefinition, to_title_case};

use crate::GeneratorConfig;
use crate::mapping::{TypeMapping, mapping_for};

/// Label used for the identity column when the schema does not declare one
pub const DEFAULT_IDENTITY_LABEL: &str = "ID";

/// Words that need a raw-identifier prefix when used as Rust field names
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "do", "dyn", "else",
    "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "static",
    "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual",
    "where", "while", "yield",
];

// ============================================================================
// GenerationContext
// ============================================================================

/// Context carrying all information needed to render one schema.
///
/// Built once per compile and shared by reference with every generator.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// The schema being compiled
    pub schema: SchemaDefinition,

    /// Generator configuration (dialect, route prefix, doc comments)
    pub config: GeneratorConfig,
}

impl GenerationContext {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Build a context from a schema snapshot and generator config.
    pub fn from_schema(schema: &SchemaDefinition, config: GeneratorConfig) -> Self {
        Self {
            schema: schema.clone(),
            config,
        }
    }

    /// Build with default generator config (convenience for tests).
    pub fn from_schema_default(schema: &SchemaDefinition) -> Self {
        Self::from_schema(schema, GeneratorConfig::default())
    }

    // ====================================================================
    // Columns
    // ====================================================================

    /// Declared fields other than the identity field, in declaration order.
    pub fn data_fields(&self) -> Vec<&FieldDefinition> {
        self.schema.data_fields().collect()
    }

    /// Label for the identity column (reuses a declared `id` field's label).
    pub fn identity_label(&self) -> String {
        self.schema
            .identity_field()
            .map(|f| f.display_label())
            .unwrap_or_else(|| DEFAULT_IDENTITY_LABEL.to_string())
    }

    /// Name of the identity column.
    pub fn identity_column(&self) -> &'static str {
        IDENTITY_FIELD_NAME
    }

    /// Type mapping for a field.
    pub fn mapping(field: &FieldDefinition) -> TypeMapping {
        mapping_for(field.field_type)
    }

    /// Fields flagged with the index hint (identity excluded).
    pub fn indexed_fields(&self) -> Vec<&FieldDefinition> {
        self.schema.data_fields().filter(|f| f.indexed).collect()
    }

    // ====================================================================
    // Operations & config
    // ====================================================================

    /// Whether an operation is enabled.
    pub fn is_enabled(&self, op: Operation) -> bool {
        self.schema.operations.is_enabled(op)
    }

    /// Whether the list endpoint and view are paginated.
    pub fn paginated(&self) -> bool {
        self.schema.paginated
    }

    /// Target SQL dialect.
    pub fn database(&self) -> DatabaseType {
        self.config.database
    }

    /// Whether to emit doc comments.
    pub fn generate_docs(&self) -> bool {
        self.config.doc_comments
    }

    // ====================================================================
    // Entity naming
    // ====================================================================

    /// Entity name as declared.
    pub fn entity_name(&self) -> &str {
        &self.schema.entity_name
    }

    /// PascalCase entity name (e.g. "book_copy" → "BookCopy").
    pub fn pascal_name(&self) -> String {
        Self::pascal(&self.schema.entity_name)
    }

    /// snake_case entity name (e.g. "BookCopy" → "book_copy").
    pub fn snake_name(&self) -> String {
        Self::snake(&self.schema.entity_name)
    }

    /// Module name for the entity's source files.
    pub fn module(&self) -> String {
        Self::module_name(&self.schema.entity_name)
    }

    /// Table name (snake_case plural).
    pub fn table(&self) -> String {
        Self::table_name(&self.schema.entity_name)
    }

    /// Human-readable plural (e.g. "Book Copies").
    pub fn plural_title(&self) -> String {
        to_title_case(&self.table())
    }

    /// Collection route (e.g. "/api/books").
    pub fn collection_path(&self) -> String {
        format!("{}/{}", self.config.api_prefix, self.table())
    }

    /// Item route (e.g. "/api/books/{id}").
    pub fn item_path(&self) -> String {
        format!("{}/{{id}}", self.collection_path())
    }

    // ====================================================================
    // Naming helpers
    // ====================================================================

    /// Convert a name to `snake_case` (e.g. "BlogPost" → "blog_post").
    pub fn snake(name: &str) -> String {
        name.to_snake_case()
    }

    /// Convert a name to `PascalCase` (e.g. "blog_post" → "BlogPost").
    pub fn pascal(name: &str) -> String {
        name.to_pascal_case()
    }

    /// Convert a name to `camelCase` (e.g. "blog_post" → "blogPost").
    pub fn camel(name: &str) -> String {
        name.to_lower_camel_case()
    }

    /// Pluralise a snake_case word with simple English heuristics.
    pub fn pluralize(word: &str) -> String {
        let s = word.to_snake_case();
        if s.ends_with('s')
            || s.ends_with('x')
            || s.ends_with('z')
            || s.ends_with("ch")
            || s.ends_with("sh")
        {
            format!("{}es", s)
        } else if s.ends_with('y')
            && !s.ends_with("ey")
            && !s.ends_with("ay")
            && !s.ends_with("oy")
            && !s.ends_with("uy")
        {
            format!("{}ies", &s[..s.len() - 1])
        } else {
            format!("{}s", s)
        }
    }

    /// Entity name → module file name (snake_case, e.g. "Book" → "book").
    pub fn module_name(entity_name: &str) -> String {
        Self::snake(entity_name)
    }

    /// Entity name → table name (snake_case plural, e.g. "BookCopy" → "book_copies").
    pub fn table_name(entity_name: &str) -> String {
        Self::pluralize(&Self::snake(entity_name))
    }

    /// Field name → Rust identifier (keywords get an `r#` prefix).
    pub fn rust_ident(field_name: &str) -> String {
        if RUST_KEYWORDS.contains(&field_name) {
            format!("r#{}", field_name)
        } else {
            field_name.to_string()
        }
    }

    /// Entity name → DTO struct names.
    pub fn create_dto_name(entity_name: &str) -> String {
        format!("Create{}Dto", Self::pascal(entity_name))
    }

    pub fn update_dto_name(entity_name: &str) -> String {
        format!("Update{}Dto", Self::pascal(entity_name))
    }

    /// Entity name → listing component name.
    pub fn list_component_name(entity_name: &str) -> String {
        format!("{}ListPage", Self::pascal(entity_name))
    }
}

// ============================================================================
// Tests
// ============================================================================
