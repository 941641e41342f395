//! # Page Generator
//!
//! Generates the `<Entity>ListPage` Dioxus component.
//!
//! - Columns mirror the schema's declaration order, identity first
//! - "New", "Edit" and "Delete" controls appear only for the enabled
//!   create, update and delete operations
//! - Rows are fetched only when read is enabled
//! - A pager is rendered when the schema carries the pagination hint

use schemaforge_core::Operation;

use crate::context::GenerationContext;
use crate::mapping::WidgetKind;
use crate::rust::{doc_comment, file_header, rust_string_literal};

/// Rows per page requested by the generated pager
const PAGE_SIZE: u64 = 20;

// ============================================================================
// Public API
// ============================================================================

/// Render the frontend artifact for the context's schema.
pub fn generate_list_page(ctx: &GenerationContext) -> String {
    let pascal = ctx.pascal_name();
    let mut content = String::with_capacity(4096);

    content.push_str(&file_header(&format!("{} listing page (Dioxus).", pascal)));

    content.push_str(&generate_imports(ctx));
    content.push_str(&generate_columns(ctx));
    content.push('\n');
    content.push_str(&generate_component(ctx));
    content.push('\n');
    content.push_str(&generate_helpers(ctx));

    content
}

// ============================================================================
// Imports & column table
// ============================================================================

fn has_row_actions(ctx: &GenerationContext) -> bool {
    ctx.is_enabled(Operation::Update) || ctx.is_enabled(Operation::Delete)
}

fn uses_client(ctx: &GenerationContext) -> bool {
    ctx.is_enabled(Operation::Read) || ctx.is_enabled(Operation::Delete)
}

fn uses_router(ctx: &GenerationContext) -> bool {
    ctx.is_enabled(Operation::Create) || ctx.is_enabled(Operation::Update)
}

fn generate_imports(ctx: &GenerationContext) -> String {
    let mut out = String::new();
    out.push_str("use dioxus::prelude::*;\n");
    out.push_str("use serde_json::Value;\n");

    if uses_client(ctx) || uses_router(ctx) {
        out.push('\n');
    }
    if uses_client(ctx) {
        out.push_str("use crate::api::client::ApiClient;\n");
    }
    if uses_router(ctx) {
        out.push_str("use crate::router::Route;\n");
    }
    out.push('\n');

    if ctx.paginated() {
        out.push_str(&format!("const PAGE_SIZE: u64 = {};\n\n", PAGE_SIZE));
    }
    out
}

fn generate_columns(ctx: &GenerationContext) -> String {
    let mut out = String::new();

    out.push_str(&doc_comment(
        Some("Column keys, headers and cell classes, in declaration order."),
        ctx,
    ));
    out.push_str("const COLUMNS: &[(&str, &str, &str)] = &[\n");
    out.push_str(&format!(
        "    ({}, {}, {}),\n",
        rust_string_literal(ctx.identity_column()),
        rust_string_literal(&ctx.identity_label()),
        rust_string_literal(WidgetKind::NumberInput.cell_class())
    ));
    for field in ctx.data_fields() {
        let widget = GenerationContext::mapping(field).widget;
        out.push_str(&format!(
            "    ({}, {}, {}),\n",
            rust_string_literal(&field.name),
            rust_string_literal(&field.display_label()),
            rust_string_literal(widget.cell_class())
        ));
    }
    out.push_str("];\n");
    out
}

// ============================================================================
// Component
// ============================================================================

fn generate_component(ctx: &GenerationContext) -> String {
    let pascal = ctx.pascal_name();
    let component = GenerationContext::list_component_name(ctx.entity_name());
    let table = ctx.table();
    let title = ctx.plural_title();
    let read = ctx.is_enabled(Operation::Read);
    let create = ctx.is_enabled(Operation::Create);
    let update = ctx.is_enabled(Operation::Update);
    let delete = ctx.is_enabled(Operation::Delete);

    let mut out = String::with_capacity(4096);

    out.push_str(&doc_comment(
        Some(&format!("Lists {} in a table.", title.to_lowercase())),
        ctx,
    ));
    out.push_str("#[component]\n");
    out.push_str(&format!("pub fn {}() -> Element {{\n", component));

    // ── State ────────────────────────────────────────────────────────────
    let rows_mut = if read || delete { "mut " } else { "" };
    out.push_str(&format!("    let {}rows = use_signal(Vec::<Value>::new);\n", rows_mut));
    out.push_str("    let mut error_msg: Signal<Option<String>> = use_signal(|| None);\n");
    if ctx.paginated() {
        out.push_str("    let mut page = use_signal(|| 1u64);\n");
    }
    if uses_router(ctx) {
        out.push_str("    let navigator = use_navigator();\n");
    }
    out.push('\n');

    // ── Fetch ────────────────────────────────────────────────────────────
    if read {
        let call = if ctx.paginated() {
            format!("list_{}(current_page, PAGE_SIZE)", table)
        } else {
            format!("list_{}()", table)
        };
        out.push_str("    use_effect(move || {\n");
        if ctx.paginated() {
            out.push_str("        let current_page = *page.read();\n");
        }
        out.push_str("        spawn(async move {\n");
        out.push_str(&format!(
            "            match ApiClient::new().{}.await {{\n",
            call
        ));
        out.push_str("                Ok(items) => rows.set(items),\n");
        out.push_str(&format!(
            "                Err(e) => error_msg.set(Some(format!(\"Failed to load {}: {{}}\", e))),\n",
            table.replace('_', " ")
        ));
        out.push_str("            }\n");
        out.push_str("        });\n");
        out.push_str("    });\n\n");
    }

    // ── Render ───────────────────────────────────────────────────────────
    out.push_str("    rsx! {\n");
    out.push_str("        div { class: \"page\",\n");
    out.push_str("            div { class: \"page-header\",\n");
    out.push_str(&format!("                h2 {{ {} }}\n", rust_string_literal(&title)));
    if create {
        out.push_str("                button {\n");
        out.push_str("                    class: \"btn btn-primary\",\n");
        out.push_str(&format!(
            "                    onclick: move |_| {{ navigator.push(Route::{}New {{}}); }},\n",
            pascal
        ));
        out.push_str("                    \"New\"\n");
        out.push_str("                }\n");
    }
    out.push_str("            }\n");

    out.push_str("            if let Some(msg) = error_msg.read().as_ref() {\n");
    out.push_str("                p { class: \"alert alert-error\", \"{msg}\" }\n");
    out.push_str("            }\n");

    out.push_str("            table { class: \"data-table\",\n");
    out.push_str("                thead {\n");
    out.push_str("                    tr {\n");
    out.push_str("                        for (_, header, _) in COLUMNS.iter() {\n");
    out.push_str("                            th { \"{header}\" }\n");
    out.push_str("                        }\n");
    if has_row_actions(ctx) {
        out.push_str("                        th { \"Actions\" }\n");
    }
    out.push_str("                    }\n");
    out.push_str("                }\n");

    out.push_str("                tbody {\n");
    out.push_str("                    for row in rows.read().iter().cloned() {\n");
    out.push_str("                        tr { key: \"{row_id(&row)}\",\n");
    out.push_str("                            for (key, _, class) in COLUMNS.iter() {\n");
    out.push_str("                                td { class: \"{class}\", {cell_text(&row, key)} }\n");
    out.push_str("                            }\n");
    if has_row_actions(ctx) {
        out.push_str("                            td { class: \"actions\",\n");
        if update {
            out.push_str("                                button {\n");
            out.push_str("                                    class: \"btn btn-sm\",\n");
            out.push_str("                                    onclick: {\n");
            out.push_str("                                        let id = row_id(&row);\n");
            out.push_str(&format!(
                "                                        move |_| {{ navigator.push(Route::{}Edit {{ id: id.clone() }}); }}\n",
                pascal
            ));
            out.push_str("                                    },\n");
            out.push_str("                                    \"Edit\"\n");
            out.push_str("                                }\n");
        }
        if delete {
            out.push_str("                                button {\n");
            out.push_str("                                    class: \"btn btn-sm btn-danger\",\n");
            out.push_str("                                    onclick: {\n");
            out.push_str("                                        let id = row_id(&row);\n");
            out.push_str("                                        move |_| {\n");
            out.push_str("                                            let id = id.clone();\n");
            out.push_str("                                            spawn(async move {\n");
            out.push_str(&format!(
                "                                                match ApiClient::new().delete_{}(&id).await {{\n",
                ctx.snake_name()
            ));
            out.push_str("                                                    Ok(_) => rows.with_mut(|rows| rows.retain(|r| row_id(r) != id)),\n");
            out.push_str("                                                    Err(e) => error_msg.set(Some(format!(\"Failed to delete: {}\", e))),\n");
            out.push_str("                                                }\n");
            out.push_str("                                            });\n");
            out.push_str("                                        }\n");
            out.push_str("                                    },\n");
            out.push_str("                                    \"Delete\"\n");
            out.push_str("                                }\n");
        }
        out.push_str("                            }\n");
    }
    out.push_str("                        }\n");
    out.push_str("                    }\n");
    out.push_str("                }\n");
    out.push_str("            }\n");

    if ctx.paginated() {
        out.push_str("            div { class: \"pager\",\n");
        out.push_str("                button {\n");
        out.push_str("                    class: \"btn btn-sm\",\n");
        out.push_str("                    disabled: *page.read() <= 1,\n");
        out.push_str("                    onclick: move |_| { let current = *page.read(); page.set(current.saturating_sub(1).max(1)); },\n");
        out.push_str("                    \"Previous\"\n");
        out.push_str("                }\n");
        out.push_str("                span { \"Page {page}\" }\n");
        out.push_str("                button {\n");
        out.push_str("                    class: \"btn btn-sm\",\n");
        out.push_str("                    onclick: move |_| { let current = *page.read(); page.set(current + 1); },\n");
        out.push_str("                    \"Next\"\n");
        out.push_str("                }\n");
        out.push_str("            }\n");
    }

    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

// ============================================================================
// Helpers emitted alongside the component
// ============================================================================

fn generate_helpers(ctx: &GenerationContext) -> String {
    let mut out = String::new();

    out.push_str(&doc_comment(Some("Display text for one cell."), ctx));
    out.push_str(
        r#"fn cell_text(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => if *b { "Yes".to_string() } else { "No".to_string() },
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

"#,
    );

    out.push_str(&doc_comment(Some("Identity of a row, as text."), ctx));
    out.push_str(&format!(
        "fn row_id(row: &Value) -> String {{\n    cell_text(row, {})\n}}\n",
        rust_string_literal(ctx.identity_column())
    ));

    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_core::FieldType;
    use schemaforge_ir::{FieldDefinition, Operations, SchemaDefinition};

    fn book() -> SchemaDefinition {
        SchemaDefinition::new("Book")
            .with_field(FieldDefinition::new("id", FieldType::Number).with_label("Book ID"))
            .with_field(FieldDefinition::new("title", FieldType::String).required())
            .with_field(FieldDefinition::new("author", FieldType::String).required())
            .with_field(FieldDefinition::new("in_print", FieldType::Boolean))
    }

    fn render(schema: &SchemaDefinition) -> String {
        generate_list_page(&GenerationContext::from_schema_default(schema))
    }

    #[test]
    fn test_component_name_and_columns() {
        let page = render(&book());
        assert!(page.contains("pub fn BookListPage() -> Element {\n"));
        assert!(page.contains(
            "const COLUMNS: &[(&str, &str, &str)] = &[\n    (\"id\", \"Book ID\", \"cell-number\"),\n    (\"title\", \"Title\", \"cell-text\"),\n    (\"author\", \"Author\", \"cell-text\"),\n    (\"in_print\", \"In Print\", \"cell-flag\"),\n];\n"
        ));
    }

    #[test]
    fn test_all_controls_present() {
        let page = render(&book());
        assert!(page.contains("Route::BookNew {}"));
        assert!(page.contains("Route::BookEdit { id: id.clone() }"));
        assert!(page.contains("ApiClient::new().delete_book(&id)"));
        assert!(page.contains("ApiClient::new().list_books()"));
        assert!(page.contains("th { \"Actions\" }"));
    }

    #[test]
    fn test_update_disabled_removes_edit_only() {
        let page = render(&book().toggle_operation(Operation::Update));
        assert!(!page.contains("\"Edit\""));
        assert!(page.contains("\"New\""));
        assert!(page.contains("\"Delete\""));
        assert!(page.contains("list_books()"));
    }

    #[test]
    fn test_read_disabled_skips_fetch() {
        let page = render(&book().toggle_operation(Operation::Read));
        assert!(!page.contains("use_effect"));
        assert!(!page.contains("list_books"));
        assert!(page.contains("COLUMNS"));
    }

    #[test]
    fn test_no_operations() {
        let page = render(&book().with_operations(Operations::none()));
        assert!(!page.contains("ApiClient"));
        assert!(!page.contains("Route::"));
        assert!(!page.contains("\"Actions\""));
        assert!(page.contains("    let rows = use_signal(Vec::<Value>::new);\n"));
    }

    #[test]
    fn test_paginated_page() {
        let page = render(&book().set_paginated(true));
        assert!(page.contains("const PAGE_SIZE: u64 = 20;\n"));
        assert!(page.contains("list_books(current_page, PAGE_SIZE)"));
        assert!(page.contains("div { class: \"pager\","));

        assert!(!render(&book()).contains("pager"));
    }

    #[test]
    fn test_heading_uses_plural_title() {
        let schema = SchemaDefinition::new("BookCopy")
            .with_field(FieldDefinition::new("barcode", FieldType::String));
        let page = render(&schema);
        assert!(page.contains("h2 { \"Book Copies\" }"));
        assert!(page.contains("pub fn BookCopyListPage()"));
        assert!(page.contains("(\"id\", \"ID\", \"cell-number\"),"));
    }
}
