//! # grace-memory
//!
//! Persistent profile storage for Grace (SQLite-backed).

pub mod store;

pub use store::Store;
