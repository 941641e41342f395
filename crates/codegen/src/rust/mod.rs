//! # Rust Source Generators
//!
//! - [`models`]: SeaORM entity module
//! - [`handlers`]: Axum handlers, payload DTOs and router
//!
//! Also holds the small text helpers shared by every Rust-emitting
//! generator (including the frontend page).

pub mod handlers;
pub mod models;

pub use handlers::generate_handlers;
pub use models::generate_model;

use crate::context::GenerationContext;

/// Module-level header placed at the top of every generated Rust file.
pub fn file_header(description: &str) -> String {
    format!(
        "//! {}\n//!\n//! Generated by SchemaForge. Do not edit by hand.\n\n",
        description
    )
}

/// `///` doc comment at column zero, or nothing when docs are disabled.
pub fn doc_comment(text: Option<&str>, ctx: &GenerationContext) -> String {
    doc_comment_indented(text, ctx, 0)
}

/// `///` doc comment indented by `indent` spaces.
pub fn doc_comment_indented(text: Option<&str>, ctx: &GenerationContext, indent: usize) -> String {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return String::new();
    };
    if !ctx.generate_docs() {
        return String::new();
    }

    let pad = " ".repeat(indent);
    let mut out = String::new();
    for line in text.lines() {
        if line.is_empty() {
            out.push_str(&format!("{}///\n", pad));
        } else {
            out.push_str(&format!("{}/// {}\n", pad, line));
        }
    }
    out
}

/// Escape a string for use inside a generated Rust string literal.
pub fn rust_string_literal(value: &str) -> String {
    format!("{:?}", value)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use schemaforge_ir::SchemaDefinition;

    #[test]
    fn test_file_header() {
        let header = file_header("Book model.");
        assert!(header.starts_with("//! Book model.\n"));
        assert!(header.ends_with("\n\n"));
    }

    #[test]
    fn test_doc_comment_multiline() {
        let ctx = GenerationContext::from_schema_default(&SchemaDefinition::new("Book"));
        assert_eq!(
            doc_comment(Some("List books.\n\nGET /api/books"), &ctx),
            "/// List books.\n///\n/// GET /api/books\n"
        );
        assert_eq!(doc_comment_indented(Some("Title"), &ctx, 4), "    /// Title\n");
        assert_eq!(doc_comment(None, &ctx), "");
    }

    #[test]
    fn test_doc_comment_disabled() {
        let ctx = GenerationContext::from_schema(
            &SchemaDefinition::new("Book"),
            GeneratorConfig::default().without_docs(),
        );
        assert_eq!(doc_comment(Some("List books."), &ctx), "");
    }

    #[test]
    fn test_rust_string_literal() {
        assert_eq!(rust_string_literal("a \"b\""), "\"a \\\"b\\\"\"");
    }
}
