//! # grace-core
//!
//! Core types, traits, configuration, error handling, and reply sanitizing for Grace.

pub mod action;
pub mod config;
pub mod context;
pub mod curriculum;
pub mod error;
pub mod message;
pub mod profile;
pub mod sanitize;
pub mod traits;
pub mod verdict;

pub use config::shellexpand;
