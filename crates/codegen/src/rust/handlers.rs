//! # Handler Generator (Axum)
//!
//! Generates the API artifact: payload DTOs, one async handler per enabled
//! operation and a `router()` wiring them to their routes.
//!
//! ## Handler Signatures
//!
//! | Operation | Route | Handler |
//! |-----------|-------|---------|
//! | Read      | `GET {prefix}/{table}` | `list_{table}` |
//! | Read      | `GET {prefix}/{table}/{id}` | `get_{entity}` |
//! | Create    | `POST {prefix}/{table}` | `create_{entity}` |
//! | Update    | `PUT {prefix}/{table}/{id}` | `update_{entity}` |
//! | Delete    | `DELETE {prefix}/{table}/{id}` | `delete_{entity}` |

use schemaforge_core::Operation;
use schemaforge_ir::FieldDefinition;

use crate::context::GenerationContext;
use crate::rust::{doc_comment, file_header};

/// Page size used when the client does not ask for one
const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page size a client may request
const MAX_PAGE_SIZE: u64 = 100;

// ============================================================================
// Public API
// ============================================================================

/// Render the API artifact for the context's schema.
pub fn generate_handlers(ctx: &GenerationContext) -> String {
    let mut content = String::with_capacity(4096);

    content.push_str(&file_header(&format!(
        "{} API handlers (Axum).",
        ctx.pascal_name()
    )));

    content.push_str(&generate_imports(ctx));

    if ctx.is_enabled(Operation::Read) && ctx.paginated() {
        content.push_str(&generate_pagination_params(ctx));
        content.push('\n');
    }

    if ctx.is_enabled(Operation::Create) {
        content.push_str(&generate_create_dto(ctx));
        content.push('\n');
    }

    if ctx.is_enabled(Operation::Update) {
        content.push_str(&generate_update_dto(ctx));
        content.push('\n');
    }

    if ctx.is_enabled(Operation::Read) {
        content.push_str(&generate_list_handler(ctx));
        content.push('\n');
        content.push_str(&generate_get_handler(ctx));
        content.push('\n');
    }

    if ctx.is_enabled(Operation::Create) {
        content.push_str(&generate_create_handler(ctx));
        content.push('\n');
    }

    if ctx.is_enabled(Operation::Update) {
        content.push_str(&generate_update_handler(ctx));
        content.push('\n');
    }

    if ctx.is_enabled(Operation::Delete) {
        content.push_str(&generate_delete_handler(ctx));
        content.push('\n');
    }

    content.push_str(&generate_router(ctx));

    content
}

// ============================================================================
// Imports
// ============================================================================

fn generate_imports(ctx: &GenerationContext) -> String {
    let read = ctx.is_enabled(Operation::Read);
    let create = ctx.is_enabled(Operation::Create);
    let update = ctx.is_enabled(Operation::Update);
    let delete = ctx.is_enabled(Operation::Delete);
    let any = read || create || update || delete;

    let mut out = String::with_capacity(512);

    if any {
        let mut extracts = Vec::new();
        if read || update || delete {
            extracts.push("Path");
        }
        if read && ctx.paginated() {
            extracts.push("Query");
        }
        extracts.push("State");
        out.push_str(&format!("use axum::extract::{{{}}};\n", extracts.join(", ")));

        if create || delete {
            out.push_str("use axum::http::StatusCode;\n");
        }

        let routing: Vec<&str> = route_methods(ctx)
            .iter()
            .filter_map(|methods| methods.first().map(|(method, _)| *method))
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        out.push_str(&format!("use axum::routing::{{{}}};\n", routing.join(", ")));
        out.push_str("use axum::{Json, Router};\n");
    } else {
        out.push_str("use axum::Router;\n");
    }

    let mut sea_imports = vec!["DatabaseConnection"];
    if create || update {
        sea_imports.insert(0, "ActiveModelTrait");
    }
    if read || update || delete {
        sea_imports.push("EntityTrait");
    }
    if update {
        sea_imports.push("IntoActiveModel");
    }
    if read && ctx.paginated() {
        sea_imports.push("PaginatorTrait");
    }
    if create && ctx.data_fields().into_iter().any(uses_column_default) {
        sea_imports.push("NotSet");
    }
    if create || update {
        sea_imports.push("Set");
    }
    out.push_str(&format!("use sea_orm::{{{}}};\n", sea_imports.join(", ")));

    if create || update || (read && ctx.paginated()) {
        out.push_str("use serde::Deserialize;\n");
    }
    if create || update {
        out.push_str("use validator::Validate;\n");
    }

    out.push('\n');
    if any {
        out.push_str("use crate::error::AppError;\n");
        out.push_str(&format!("use crate::models::{};\n", ctx.module()));
    }
    out.push('\n');
    out
}

// ============================================================================
// DTOs
// ============================================================================

fn generate_pagination_params(ctx: &GenerationContext) -> String {
    let mut out = String::new();
    out.push_str(&doc_comment(Some("Query parameters for the paginated list."), ctx));
    out.push_str("#[derive(Debug, Deserialize)]\n");
    out.push_str("pub struct PaginationParams {\n");
    out.push_str("    pub page: Option<u64>,\n");
    out.push_str("    pub per_page: Option<u64>,\n");
    out.push_str("}\n");
    out
}

fn generate_create_dto(ctx: &GenerationContext) -> String {
    let name = GenerationContext::create_dto_name(ctx.entity_name());
    let mut out = String::new();

    out.push_str(&doc_comment(
        Some(&format!("Payload for creating a {}.", ctx.snake_name())),
        ctx,
    ));
    out.push_str("#[derive(Debug, Deserialize, Validate)]\n");
    out.push_str(&format!("pub struct {} {{\n", name));
    for field in ctx.data_fields() {
        out.push_str(&dto_field(field, field.required));
    }
    out.push_str("}\n");
    out
}

fn generate_update_dto(ctx: &GenerationContext) -> String {
    let name = GenerationContext::update_dto_name(ctx.entity_name());
    let mut out = String::new();

    out.push_str(&doc_comment(
        Some(&format!(
            "Partial update for a {}; absent members are left unchanged.",
            ctx.snake_name()
        )),
        ctx,
    ));
    out.push_str("#[derive(Debug, Deserialize, Validate)]\n");
    out.push_str(&format!("pub struct {} {{\n", name));
    for field in ctx.data_fields() {
        out.push_str(&dto_field(field, false));
    }
    out.push_str("}\n");
    out
}

fn dto_field(field: &FieldDefinition, required: bool) -> String {
    let mapping = GenerationContext::mapping(field);
    let mut out = String::new();

    if let Some(attr) = mapping.validation.and_then(|check| check.to_validator_attribute()) {
        out.push_str(&format!("    {}\n", attr));
    }
    out.push_str(&format!(
        "    pub {}: {},\n",
        GenerationContext::rust_ident(&field.name),
        mapping.binding.rust_type_for(required)
    ));
    out
}

// ============================================================================
// List handler (Read)
// ============================================================================

fn list_fn_name(ctx: &GenerationContext) -> String {
    format!("list_{}", ctx.table())
}

fn generate_list_handler(ctx: &GenerationContext) -> String {
    let fn_name = list_fn_name(ctx);
    let module = ctx.module();
    let mut out = String::with_capacity(1024);

    out.push_str(&doc_comment(
        Some(&format!(
            "List {}.\n\nGET {}",
            ctx.table(),
            ctx.collection_path()
        )),
        ctx,
    ));

    if ctx.paginated() {
        out.push_str(&format!(
            r#"pub async fn {fn_name}(
    State(db): State<DatabaseConnection>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<{module}::Model>>, AppError> {{
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or({DEFAULT_PAGE_SIZE}).clamp(1, {MAX_PAGE_SIZE});

    let items = {module}::Entity::find()
        .paginate(&db, per_page)
        .fetch_page(page - 1)
        .await?;

    Ok(Json(items))
}}
"#
        ));
    } else {
        out.push_str(&format!(
            r#"pub async fn {fn_name}(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<{module}::Model>>, AppError> {{
    let items = {module}::Entity::find().all(&db).await?;
    Ok(Json(items))
}}
"#
        ));
    }

    out
}

// ============================================================================
// Get handler (Read)
// ============================================================================

fn generate_get_handler(ctx: &GenerationContext) -> String {
    let fn_name = format!("get_{}", ctx.snake_name());
    let module = ctx.module();
    let mut out = String::with_capacity(512);

    out.push_str(&doc_comment(
        Some(&format!(
            "Get a single {} by id.\n\nGET {}",
            ctx.snake_name(),
            ctx.item_path()
        )),
        ctx,
    ));

    out.push_str(&format!(
        r#"pub async fn {fn_name}(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<{module}::Model>, AppError> {{
    let item = {module}::Entity::find_by_id(id)
        .one(&db)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(item))
}}
"#
    ));

    out
}

// ============================================================================
// Create handler
// ============================================================================

/// An omitted optional field with a default leaves the column to the database
fn uses_column_default(field: &FieldDefinition) -> bool {
    !field.required && field.default_value().is_some()
}

fn generate_create_handler(ctx: &GenerationContext) -> String {
    let fn_name = format!("create_{}", ctx.snake_name());
    let module = ctx.module();
    let create_dto = GenerationContext::create_dto_name(ctx.entity_name());
    let mut out = String::with_capacity(1024);

    out.push_str(&doc_comment(
        Some(&format!(
            "Create a new {}.\n\nPOST {}",
            ctx.snake_name(),
            ctx.collection_path()
        )),
        ctx,
    ));

    out.push_str(&format!(
        r#"pub async fn {fn_name}(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<{create_dto}>,
) -> Result<(StatusCode, Json<{module}::Model>), AppError> {{
    payload.validate()?;

    let model = {module}::ActiveModel {{
"#
    ));

    for field in ctx.data_fields() {
        let name = GenerationContext::rust_ident(&field.name);
        if uses_column_default(field) {
            out.push_str(&format!(
                "        {name}: payload.{name}.map(|v| Set(Some(v))).unwrap_or(NotSet),\n"
            ));
        } else {
            out.push_str(&format!("        {name}: Set(payload.{name}),\n"));
        }
    }

    out.push_str(
        r#"        ..Default::default()
    };

    let item = model.insert(&db).await?;
    Ok((StatusCode::CREATED, Json(item)))
}
"#,
    );

    out
}

// ============================================================================
// Update handler
// ============================================================================

fn generate_update_handler(ctx: &GenerationContext) -> String {
    let fn_name = format!("update_{}", ctx.snake_name());
    let module = ctx.module();
    let update_dto = GenerationContext::update_dto_name(ctx.entity_name());
    let mut out = String::with_capacity(1024);

    out.push_str(&doc_comment(
        Some(&format!(
            "Update an existing {}.\n\nPUT {}",
            ctx.snake_name(),
            ctx.item_path()
        )),
        ctx,
    ));

    out.push_str(&format!(
        r#"pub async fn {fn_name}(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<{update_dto}>,
) -> Result<Json<{module}::Model>, AppError> {{
    payload.validate()?;

    let mut model = {module}::Entity::find_by_id(id)
        .one(&db)
        .await?
        .ok_or(AppError::NotFound)?
        .into_active_model();

"#
    ));

    for field in ctx.data_fields() {
        let name = GenerationContext::rust_ident(&field.name);
        let value = if field.required { "value" } else { "Some(value)" };
        out.push_str(&format!(
            "    if let Some(value) = payload.{name} {{\n        model.{name} = Set({value});\n    }}\n"
        ));
    }

    out.push_str(
        r#"
    let item = model.update(&db).await?;
    Ok(Json(item))
}
"#,
    );

    out
}

// ============================================================================
// Delete handler
// ============================================================================

fn generate_delete_handler(ctx: &GenerationContext) -> String {
    let fn_name = format!("delete_{}", ctx.snake_name());
    let module = ctx.module();
    let mut out = String::with_capacity(512);

    out.push_str(&doc_comment(
        Some(&format!(
            "Delete a {}.\n\nDELETE {}",
            ctx.snake_name(),
            ctx.item_path()
        )),
        ctx,
    ));

    out.push_str(&format!(
        r#"pub async fn {fn_name}(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {{
    let result = {module}::Entity::delete_by_id(id).exec(&db).await?;
    if result.rows_affected == 0 {{
        return Err(AppError::NotFound);
    }}

    Ok(StatusCode::NO_CONTENT)
}}
"#
    ));

    out
}

// ============================================================================
// Router
// ============================================================================

/// Method/handler pairs for the collection route and the item route
fn route_methods(ctx: &GenerationContext) -> [Vec<(&'static str, String)>; 2] {
    let snake = ctx.snake_name();
    let mut collection = Vec::new();
    let mut item = Vec::new();

    if ctx.is_enabled(Operation::Read) {
        collection.push(("get", list_fn_name(ctx)));
        item.push(("get", format!("get_{}", snake)));
    }
    if ctx.is_enabled(Operation::Create) {
        collection.push(("post", format!("create_{}", snake)));
    }
    if ctx.is_enabled(Operation::Update) {
        item.push(("put", format!("update_{}", snake)));
    }
    if ctx.is_enabled(Operation::Delete) {
        item.push(("delete", format!("delete_{}", snake)));
    }

    [collection, item]
}

fn method_chain(methods: &[(&'static str, String)]) -> String {
    methods
        .iter()
        .enumerate()
        .map(|(i, (method, handler))| {
            if i == 0 {
                format!("{}({})", method, handler)
            } else {
                format!(".{}({})", method, handler)
            }
        })
        .collect()
}

fn generate_router(ctx: &GenerationContext) -> String {
    let [collection, item] = route_methods(ctx);
    let mut out = String::with_capacity(512);

    out.push_str(&doc_comment(
        Some(&format!("Routes for the {} resource.", ctx.snake_name())),
        ctx,
    ));
    out.push_str("pub fn router() -> Router<DatabaseConnection> {\n");
    out.push_str("    Router::new()");

    if !collection.is_empty() {
        out.push_str(&format!(
            "\n        .route(\"{}\", {})",
            ctx.collection_path(),
            method_chain(&collection)
        ));
    }
    if !item.is_empty() {
        out.push_str(&format!(
            "\n        .route(\"{}\", {})",
            ctx.item_path(),
            method_chain(&item)
        ));
    }

    out.push_str("\n}\n");
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use schemaforge_core::FieldType;
    use schemaforge_ir::{Operations, SchemaDefinition};

    fn book() -> SchemaDefinition {
        SchemaDefinition::new("Book")
            .with_field(FieldDefinition::new("id", FieldType::Number).required())
            .with_field(FieldDefinition::new("title", FieldType::String).required())
            .with_field(FieldDefinition::new("contact", FieldType::Email))
            .with_field(FieldDefinition::new("stock", FieldType::Number).with_default("0"))
    }

    fn render(schema: &SchemaDefinition) -> String {
        generate_handlers(&GenerationContext::from_schema_default(schema))
    }

    #[test]
    fn test_all_operations_router() {
        let api = render(&book());
        assert!(api.contains(
            "        .route(\"/api/books\", get(list_books).post(create_book))\n"
        ));
        assert!(api.contains(
            "        .route(\"/api/books/{id}\", get(get_book).put(update_book).delete(delete_book))\n"
        ));
        assert!(api.contains("use axum::routing::{get};\n"));
    }

    #[test]
    fn test_dto_checks() {
        let api = render(&book());
        assert!(api.contains(
            "pub struct CreateBookDto {\n    #[validate(length(max = 255))]\n    pub title: String,\n    #[validate(email)]\n    pub contact: Option<String>,\n    pub stock: Option<i32>,\n}\n"
        ));
        assert!(api.contains("pub struct UpdateBookDto {\n    #[validate(length(max = 255))]\n    pub title: Option<String>,\n"));
        assert!(!api.contains("pub id: "));
    }

    #[test]
    fn test_create_leaves_defaulted_column_unset() {
        let api = render(&book());
        assert!(api.contains(
            "        stock: payload.stock.map(|v| Set(Some(v))).unwrap_or(NotSet),\n"
        ));
        assert!(api.contains("        title: Set(payload.title),\n"));
        assert!(api.contains("        contact: Set(payload.contact),\n"));
        assert!(api.contains("NotSet, Set};\n"));
    }

    #[test]
    fn test_create_without_defaults_skips_not_set() {
        let schema = SchemaDefinition::new("Book")
            .with_field(FieldDefinition::new("title", FieldType::String).required());
        let api = render(&schema);
        assert!(!api.contains("NotSet"));
    }

    #[test]
    fn test_update_sets_required_and_optional_fields() {
        let api = render(&book());
        assert!(api.contains("    if let Some(value) = payload.title {\n        model.title = Set(value);\n    }\n"));
        assert!(api.contains("    if let Some(value) = payload.stock {\n        model.stock = Set(Some(value));\n    }\n"));
    }

    #[test]
    fn test_update_disabled_removes_only_update() {
        let full = render(&book());
        let gated = render(&book().toggle_operation(Operation::Update));

        assert!(!gated.contains("pub async fn update_book"));
        assert!(!gated.contains("UpdateBookDto"));
        assert!(!gated.contains(".put("));
        assert!(!gated.contains("IntoActiveModel"));

        for handler in ["list_books", "get_book", "create_book", "delete_book"] {
            let signature = format!("pub async fn {}(", handler);
            assert!(full.contains(&signature));
            assert!(gated.contains(&signature));
        }
        assert!(gated.contains(
            "        .route(\"/api/books/{id}\", get(get_book).delete(delete_book))\n"
        ));
    }

    #[test]
    fn test_create_only() {
        let ops = Operations::none().with(Operation::Create, true);
        let api = render(&book().with_operations(ops));

        assert!(api.contains("        .route(\"/api/books\", post(create_book))\n"));
        assert!(!api.contains("/api/books/{id}"));
        assert!(api.contains("use axum::routing::{post};\n"));
        assert!(api.contains("use axum::extract::{State};\n"));
    }

    #[test]
    fn test_item_routes_without_read() {
        let ops = Operations::none().with(Operation::Delete, true).with(Operation::Update, true);
        let api = render(&book().with_operations(ops));
        assert!(api.contains(".route(\"/api/books/{id}\", put(update_book).delete(delete_book))"));
        assert!(api.contains("use axum::routing::{put};\n"));
    }

    #[test]
    fn test_no_operations() {
        let api = render(&book().with_operations(Operations::none()));
        assert!(!api.contains("pub async fn"));
        assert!(api.contains("pub fn router() -> Router<DatabaseConnection> {\n    Router::new()\n}\n"));
        assert!(api.contains("use axum::Router;\n"));
    }

    #[test]
    fn test_paginated_list() {
        let api = render(&book().set_paginated(true));
        assert!(api.contains("pub struct PaginationParams"));
        assert!(api.contains("Query(params): Query<PaginationParams>"));
        assert!(api.contains(".clamp(1, 100)"));

        let plain = render(&book());
        assert!(!plain.contains("PaginationParams"));
        assert!(plain.contains("Entity::find().all(&db)"));
    }

    #[test]
    fn test_custom_prefix() {
        let ctx = GenerationContext::from_schema(
            &book(),
            GeneratorConfig::default().with_api_prefix("/v1"),
        );
        let api = generate_handlers(&ctx);
        assert!(api.contains(".route(\"/v1/books\""));
    }
}
