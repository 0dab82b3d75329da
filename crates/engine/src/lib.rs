//! Document store engine for docstore
//!
//! This crate holds everything that talks to the embedded SQLite engine:
//! - Store: lifecycle (open/close) and the batched Get/Put/Delete entry points
//! - Table: schema-bound get/put/delete over a connection or transaction
//! - Document: one stored row with its fixed index slots
//! - Predicate: composable parameterized filters
//! - QueryParams: one logical read (filter + count or ordered/limited items)
//! - StoreConfig: where the store lives and how it is maintained
//!
//! Writes are gated by revision: an upsert only replaces a stored row when
//! its revision is strictly greater, otherwise [`Error::DocumentConflict`]
//! hands back the row that won.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod predicate;
pub mod query;
pub mod schema;
pub mod store;
pub mod table;

pub use config::StoreConfig;
pub use document::{Document, MAX_INDEX};
pub use error::{Error, Result};
pub use predicate::Predicate;
pub use query::{Limit, Order, OrderBy, QueryParams, Selection};
pub use schema::{int_column, string_column, validate_name, Schema};
pub use store::Store;
pub use table::Table;

// Payload types, so callers need only this crate
pub use docstore_core::{codec, CodecError, Map, Value};
