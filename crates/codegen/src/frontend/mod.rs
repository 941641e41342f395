//! # Frontend Generation
//!
//! Generates the Dioxus listing page for the schema's entity. The page
//! talks to the generated API through the host application's
//! `crate::api::client::ApiClient` and navigates with its `Route` enum.

pub mod pages;

pub use pages::generate_list_page;
