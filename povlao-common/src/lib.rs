//! # Povlao Guess Common Library
//!
//! Shared code for the Povlao Guess game engine and catalog server:
//! - Error type shared by both sides
//! - Configuration loading and root folder resolution
//! - Catalog and track records
//! - HTTP request/response types
//! - Accent-insensitive text matching and catalog search
//! - SQLite catalog table (feature `sqlx`)

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod models;
pub mod search;
pub mod text;

pub use error::{Error, Result};
pub use models::{CatalogEntry, Track, UNKNOWN_ARTIST};
