//! Gateway: orchestrates one user message through the credential check, safety
//! classification, the persona call, and reply sanitizing.

mod classifier;
mod pipeline;
pub mod replies;


pub use classifier::SafetyClassifier;

use grace_core::{
    config::{GeminiConfig, Prompts},
    traits::Provider,
};
use std::sync::Arc;

/// Turns user input into a [`grace_core::message::Reply`].
///
/// Holds no per-conversation state; callers pass the history in and await
/// each message before sending the next.
pub struct Gateway {
    pub(super) provider: Arc<dyn Provider>,
    pub(super) classifier: SafetyClassifier,
    pub(super) system_prompt: String,
    pub(super) model: String,
    pub(super) temperature: f32,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(provider: Arc<dyn Provider>, prompts: &Prompts, gemini: &GeminiConfig) -> Self {
        let classifier = SafetyClassifier::new(provider.clone(), gemini.classifier_model.clone());
        Self {
            provider,
            classifier,
            system_prompt: prompts.system_instruction(),
            model: gemini.model.clone(),
            temperature: gemini.temperature,
        }
    }
}
