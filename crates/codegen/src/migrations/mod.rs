//! # Migration Generation
//!
//! This module generates the data-definition artifact: one SQL file that
//! creates the entity's table and its hinted indexes. PostgreSQL, MySQL
//! and SQLite are supported.
//!
//! ## Features
//!
//! - Auto-increment identity column, always first
//! - `NOT NULL` for required fields and `DEFAULT` literals
//! - Trailing `PRIMARY KEY (id)` constraint
//! - `CREATE INDEX` for fields carrying the index hint
//! - `IF NOT EXISTS` for idempotent migrations

pub mod sql;

pub use sql::generate_migration;
