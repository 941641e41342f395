//! # Model Generator (SeaORM)
//!
//! Generates the SeaORM entity module for the schema's entity:
//!
//! - `Model` struct (`DeriveEntityModel`) with the identity column first
//! - An empty `Relation` enum
//! - `ActiveModelBehavior` implementation
//!
//! Optional fields bind to `Option<T>`; defaults are carried as
//! `default_value` metadata and long text gets a `column_type` override.

use schemaforge_core::FieldType;
use schemaforge_ir::FieldDefinition;

use crate::context::GenerationContext;
use crate::rust::{doc_comment, doc_comment_indented, file_header, rust_string_literal};

// ============================================================================
// Public API
// ============================================================================

/// Render the ORM artifact for the context's schema.
pub fn generate_model(ctx: &GenerationContext) -> String {
    let mut content = String::with_capacity(2048);

    content.push_str(&file_header(&format!(
        "{} model (SeaORM entity).",
        ctx.pascal_name()
    )));

    content.push_str("use sea_orm::entity::prelude::*;\n");
    content.push_str("use serde::{Deserialize, Serialize};\n\n");

    content.push_str(&generate_model_struct(ctx));
    content.push('\n');

    content.push_str("#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]\n");
    content.push_str("pub enum Relation {}\n\n");

    content.push_str("impl ActiveModelBehavior for ActiveModel {}\n");

    content
}

// ============================================================================
// SeaORM Model struct
// ============================================================================

fn generate_model_struct(ctx: &GenerationContext) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str(&doc_comment(
        Some(&format!(
            "A {} record stored in the `{}` table.",
            ctx.pascal_name(),
            ctx.table()
        )),
        ctx,
    ));

    out.push_str("#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]\n");
    out.push_str(&format!("#[sea_orm(table_name = \"{}\")]\n", ctx.table()));
    out.push_str("pub struct Model {\n");

    // Identity column
    out.push_str(&doc_comment_indented(Some(&ctx.identity_label()), ctx, 4));
    out.push_str("    #[sea_orm(primary_key)]\n");
    out.push_str(&format!("    pub {}: i32,\n", ctx.identity_column()));

    for field in ctx.data_fields() {
        out.push_str(&generate_model_field(field, ctx));
    }

    out.push_str("}\n");
    out
}

fn generate_model_field(field: &FieldDefinition, ctx: &GenerationContext) -> String {
    let mapping = GenerationContext::mapping(field);
    let mut out = String::new();
    let mut attrs = Vec::new();

    if let Some(column_type) = mapping.storage.sea_orm_column_type() {
        attrs.push(format!("column_type = \"{}\"", column_type));
    }

    if let Some(value) = field.default_value() {
        attrs.push(format!("default_value = {}", attribute_literal(field.field_type, value)));
    }

    out.push_str(&doc_comment_indented(Some(&field.display_label()), ctx, 4));
    if !attrs.is_empty() {
        out.push_str(&format!("    #[sea_orm({})]\n", attrs.join(", ")));
    }
    out.push_str(&format!(
        "    pub {}: {},\n",
        GenerationContext::rust_ident(&field.name),
        mapping.binding.rust_type_for(field.required)
    ));

    out
}

/// Render a default value as a Rust attribute literal
fn attribute_literal(field_type: FieldType, value: &str) -> String {
    match field_type {
        FieldType::Number => value.to_string(),
        FieldType::Boolean => value.to_ascii_lowercase(),
        FieldType::String | FieldType::Email | FieldType::Text | FieldType::Date => {
            rust_string_literal(value)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use schemaforge_ir::SchemaDefinition;

    fn book() -> SchemaDefinition {
        SchemaDefinition::new("Book")
            .with_field(FieldDefinition::new("id", FieldType::Number).with_label("Book ID"))
            .with_field(FieldDefinition::new("title", FieldType::String).required())
            .with_field(FieldDefinition::new("publication_year", FieldType::Number))
            .with_field(FieldDefinition::new("stock", FieldType::Number).with_default("0"))
            .with_field(FieldDefinition::new("summary", FieldType::Text))
            .with_field(FieldDefinition::new("published_on", FieldType::Date).required())
    }

    #[test]
    fn test_model_struct() {
        let orm = generate_model(&GenerationContext::from_schema_default(&book()));

        assert!(orm.contains("#[sea_orm(table_name = \"books\")]"));
        assert!(orm.contains("    /// Book ID\n    #[sea_orm(primary_key)]\n    pub id: i32,\n"));
        assert!(orm.contains("    pub title: String,\n"));
        assert!(orm.contains("    pub publication_year: Option<i32>,\n"));
        assert!(orm.contains("    #[sea_orm(default_value = 0)]\n    pub stock: Option<i32>,\n"));
        assert!(orm.contains("    #[sea_orm(column_type = \"Text\")]\n    pub summary: Option<String>,\n"));
        assert!(orm.contains("    pub published_on: chrono::NaiveDate,\n"));
        assert!(orm.contains("impl ActiveModelBehavior for ActiveModel {}"));
    }

    #[test]
    fn test_field_order_follows_declaration() {
        let orm = generate_model(&GenerationContext::from_schema_default(&book()));
        let positions: Vec<usize> = ["pub id:", "pub title:", "pub publication_year:", "pub stock:"]
            .iter()
            .map(|needle| orm.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_single_identity_attribute() {
        let orm = generate_model(&GenerationContext::from_schema_default(&book()));
        assert_eq!(orm.matches("primary_key").count(), 1);
        assert_eq!(orm.matches("pub id:").count(), 1);
    }

    #[test]
    fn test_without_docs() {
        let ctx = GenerationContext::from_schema(&book(), GeneratorConfig::default().without_docs());
        let orm = generate_model(&ctx);
        assert!(!orm.contains("    ///"));
    }

    #[test]
    fn test_keyword_field_names() {
        let schema = SchemaDefinition::new("Item")
            .with_field(FieldDefinition::new("type", FieldType::String).required());
        let orm = generate_model(&GenerationContext::from_schema_default(&schema));
        assert!(orm.contains("    pub r#type: String,\n"));
    }

    #[test]
    fn test_string_default_literal() {
        assert_eq!(attribute_literal(FieldType::String, "draft"), "\"draft\"");
        assert_eq!(attribute_literal(FieldType::Boolean, "TRUE"), "true");
    }
}
