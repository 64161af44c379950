//! # Worknest Store
//!
//! In-memory relational store standing in for the hosted database. Each record type
//! lives in its own `Table` behind a `tokio::sync::RwLock`; the `Database` enforces the
//! referential rules the remote schema would (owning workspace exists, cross-record
//! references resolve, workspace deletion cascades).

pub mod database;
pub mod error;
pub mod table;

pub use database::{Database, Stored};
pub use error::{Result, StoreError};
pub use table::Table;
