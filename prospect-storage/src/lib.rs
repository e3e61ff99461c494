//! SQLite persistence for Prospect — the single source of truth for leads
//! and run history.
//!
//! The store is the serialization point of the whole pipeline: one
//! serialized write connection, a round-robin read pool, and per-write
//! transactions. Stage logic never holds leads beyond a single execution;
//! it reads, decides, and writes back through this crate.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod retention;

pub use connection::DatabaseManager;
