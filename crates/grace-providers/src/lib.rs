//! # grace-providers
//!
//! AI provider implementations for Grace.

pub mod gemini;

pub use gemini::GeminiProvider;
