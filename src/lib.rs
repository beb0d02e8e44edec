//! A to-do list service backed by a document store.
//!
//! # Overview
//! Two thin layers: axum handlers ([`server`]) adapt HTTP requests to single
//! data-access operations, and the data-access layer ([`dal`]) maps between
//! wire shapes and persisted list documents. Every mutation is one atomic
//! document operation, so concurrent edits to the same list cannot lose
//! updates without any in-process locking.
//!
//! # Design
//! - Handlers reach the store through the [`dal::TodoStore`] trait; the
//!   MongoDB-backed [`dal::ToDoDal`] is the production implementation and
//!   [`memory::MemoryStore`] backs the tests.
//! - Documents are parsed with explicit `from_doc` constructors; a schema
//!   violation is reported as corruption, never as not-found.
//! - List ids are the store's native ids round-tripped as opaque strings;
//!   item ids are generated UUIDs, unique within their owning list.

pub mod config;
pub mod dal;
pub mod error;
pub mod memory;
pub mod server;
pub mod types;

pub use config::Config;
pub use dal::{ToDoDal, TodoStore, COLLECTION_NAME};
pub use error::Error;
pub use memory::MemoryStore;
pub use server::{app, SharedStore};
pub use types::{ListSummary, ToDoList, ToDoListItem};
