//! SQL `CREATE TABLE` generation

use schemaforge_core::{DatabaseType, FieldType};
use schemaforge_ir::FieldDefinition;

use crate::context::GenerationContext;
use crate::mapping::identity_sql_type;

/// Keywords reserved in at least one supported dialect
const SQL_RESERVED: &[&str] = &[
    "add", "all", "alter", "and", "any", "as", "asc", "between", "by", "case", "check", "column",
    "constraint", "create", "cross", "current_date", "current_time", "current_timestamp",
    "current_user", "default", "delete", "desc", "distinct", "drop", "else", "end", "except",
    "exists", "false", "fetch", "for", "foreign", "from", "full", "grant", "group", "having", "in",
    "index", "inner", "insert", "intersect", "into", "is", "join", "key", "left", "like", "limit",
    "natural", "not", "null", "offset", "on", "or", "order", "outer", "primary", "references",
    "right", "select", "session_user", "set", "table", "then", "to", "true", "union", "unique",
    "update", "user", "using", "values", "when", "where", "with",
];

/// Render the data-definition artifact for the context's schema.
pub fn generate_migration(ctx: &GenerationContext) -> String {
    let db = ctx.database();
    let table = ctx.table();
    let mut out = String::with_capacity(1024);

    if ctx.generate_docs() {
        out.push_str(&format!(
            "-- {} table ({})\n",
            ctx.pascal_name(),
            db.display_name()
        ));
        out.push_str("-- Generated by SchemaForge. Do not edit by hand.\n\n");
    }

    out.push_str(&format!(
        "CREATE TABLE IF NOT EXISTS {} (\n",
        quote_ident(&table, db)
    ));
    out.push_str(&format!(
        "    {} {},\n",
        ctx.identity_column(),
        identity_sql_type(db)
    ));

    for field in ctx.data_fields() {
        out.push_str(&format!("    {},\n", column_definition(field, db)));
    }

    out.push_str(&format!("    PRIMARY KEY ({})\n", ctx.identity_column()));
    out.push_str(");\n");

    let indexed = ctx.indexed_fields();
    if !indexed.is_empty() {
        out.push('\n');
        for field in indexed {
            out.push_str(&index_statement(&table, &field.name, db));
        }
    }

    out
}

/// One column line (without the trailing comma)
fn column_definition(field: &FieldDefinition, db: DatabaseType) -> String {
    let mapping = GenerationContext::mapping(field);
    let mut parts = vec![quote_ident(&field.name, db), mapping.storage.sql(db)];

    if field.required {
        parts.push("NOT NULL".to_string());
    }

    if let Some(value) = field.default_value() {
        parts.push(format!("DEFAULT {}", sql_literal(field.field_type, value)));
    }

    parts.join(" ")
}

fn index_statement(table: &str, column: &str, db: DatabaseType) -> String {
    let name = format!("idx_{}_{}", table, column);
    let table = quote_ident(table, db);
    let column = quote_ident(column, db);
    match db {
        // MySQL has no IF NOT EXISTS for indexes
        DatabaseType::MySQL => format!("CREATE INDEX {} ON {} ({});\n", name, table, column),
        _ => format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({});\n",
            name, table, column
        ),
    }
}

/// Quote an identifier that collides with a reserved word.
pub fn quote_ident(name: &str, db: DatabaseType) -> String {
    if !SQL_RESERVED.iter().any(|w| w.eq_ignore_ascii_case(name)) {
        return name.to_string();
    }
    match db {
        DatabaseType::MySQL => format!("`{}`", name),
        _ => format!("\"{}\"", name),
    }
}

/// Render a checked default value as a SQL literal.
pub fn sql_literal(field_type: FieldType, value: &str) -> String {
    match field_type {
        FieldType::Number => value.to_string(),
        FieldType::Boolean => value.to_ascii_uppercase(),
        FieldType::String | FieldType::Email | FieldType::Text | FieldType::Date => {
            format!("'{}'", value.replace('\'', "''"))
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
    use pretty_assertions::assert_eq;
    use schemaforge_ir::SchemaDefinition;

    fn book() -> SchemaDefinition {
        SchemaDefinition::new("Book")
            .with_field(FieldDefinition::new("id", FieldType::Number).required())
            .with_field(FieldDefinition::new("title", FieldType::String).required())
            .with_field(FieldDefinition::new("author", FieldType::String).required())
            .with_field(FieldDefinition::new("publication_year", FieldType::Number))
            .with_field(FieldDefinition::new("stock", FieldType::Number).with_default("0"))
    }

    fn render(schema: &SchemaDefinition, config: GeneratorConfig) -> String {
        generate_migration(&GenerationContext::from_schema(schema, config))
    }

    #[test]
    fn test_book_table() {
        let sql = render(&book(), GeneratorConfig::default().without_docs());
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS books (\n    id SERIAL,\n    title VARCHAR(255) NOT NULL,\n    author VARCHAR(255) NOT NULL,\n    publication_year INTEGER,\n    stock INTEGER DEFAULT 0,\n    PRIMARY KEY (id)\n);\n"
        );
    }

    #[test]
    fn test_header_when_docs_enabled() {
        let sql = render(&book(), GeneratorConfig::default());
        assert!(sql.starts_with("-- Book table (PostgreSQL)\n"));
    }

    #[test]
    fn test_identity_injected_without_declared_id() {
        let schema = SchemaDefinition::new("BookCopy")
            .with_field(FieldDefinition::new("barcode", FieldType::String).required());
        let sql = render(&schema, GeneratorConfig::default().without_docs());

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS book_copies (\n    id SERIAL,\n"));
        assert_eq!(sql.matches("    id ").count(), 1);
    }

    #[test]
    fn test_dialects() {
        let mysql = render(&book(), GeneratorConfig::default().with_database(DatabaseType::MySQL));
        assert!(mysql.contains("    id INT AUTO_INCREMENT,\n"));
        assert!(mysql.contains("    stock INT DEFAULT 0,\n"));

        let sqlite =
            render(&book(), GeneratorConfig::default().with_database(DatabaseType::SQLite));
        assert!(sqlite.contains("    id INTEGER,\n"));
        assert!(sqlite.contains("    title TEXT NOT NULL,\n"));
        assert!(sqlite.contains("    PRIMARY KEY (id)\n"));
    }

    #[test]
    fn test_index_statements() {
        let schema = book().with_field(FieldDefinition::new("publisher_id", FieldType::Number).indexed());
        let sql = render(&schema, GeneratorConfig::default());
        assert!(sql.ends_with(
            ");\n\nCREATE INDEX IF NOT EXISTS idx_books_publisher_id ON books (publisher_id);\n"
        ));

        let mysql = render(&schema, GeneratorConfig::default().with_database(DatabaseType::MySQL));
        assert!(mysql.contains("CREATE INDEX idx_books_publisher_id ON books (publisher_id);\n"));
    }

    #[test]
    fn test_reserved_columns_are_quoted() {
        let schema = SchemaDefinition::new("Purchase")
            .with_field(FieldDefinition::new("order", FieldType::Number).indexed())
            .with_field(FieldDefinition::new("user", FieldType::String).required())
            .with_field(FieldDefinition::new("note", FieldType::Text));

        let pg = render(&schema, GeneratorConfig::default().without_docs());
        assert!(pg.contains("    \"order\" INTEGER,\n"));
        assert!(pg.contains("    \"user\" VARCHAR(255) NOT NULL,\n"));
        assert!(pg.contains("    note TEXT,\n"));
        assert!(pg.contains(
            "CREATE INDEX IF NOT EXISTS idx_purchases_order ON purchases (\"order\");\n"
        ));

        let mysql = render(
            &schema,
            GeneratorConfig::default().with_database(DatabaseType::MySQL),
        );
        assert!(mysql.contains("    `order` INT,\n"));
        assert!(mysql.contains("CREATE INDEX idx_purchases_order ON purchases (`order`);\n"));
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("Group", DatabaseType::SQLite), "\"Group\"");
        assert_eq!(quote_ident("group_name", DatabaseType::SQLite), "group_name");
    }

    #[test]
    fn test_literals() {
        assert_eq!(sql_literal(FieldType::Number, "-3"), "-3");
        assert_eq!(sql_literal(FieldType::Boolean, "true"), "TRUE");
        assert_eq!(sql_literal(FieldType::String, "O'Reilly"), "'O''Reilly'");
        assert_eq!(sql_literal(FieldType::Date, "2024-01-31"), "'2024-01-31'");
    }

    #[test]
    fn test_blank_default_is_omitted() {
        let schema = SchemaDefinition::new("Book")
            .with_field(FieldDefinition::new("note", FieldType::Text).with_default("  "));
        let sql = render(&schema, GeneratorConfig::default());
        assert!(sql.contains("    note TEXT,\n"));
    }
}
