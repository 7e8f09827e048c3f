//! Message processing pipeline: the main handle_message flow.

use super::{replies, Gateway};
use grace_core::{
    context::{Context, ContextEntry},
    error::GraceError,
    message::Reply,
    sanitize,
};
use tracing::{error, info, warn};

impl Gateway {
    /// Process one user message through the full pipeline.
    ///
    /// `history` holds the prior turns, oldest first, without `input`.
    /// Every failure ends in a fixed reply; this never returns an error.
    pub async fn handle_message(&self, history: &[ContextEntry], input: &str) -> Reply {
        let preview = if input.chars().count() > 60 {
            let truncated: String = input.chars().take(60).collect();
            format!("{truncated}...")
        } else {
            input.to_string()
        };
        info!("user says: {preview}");

        // --- 1. CREDENTIAL CHECK ---
        if !self.provider.is_configured() {
            warn!("no API key configured, replying offline");
            return Reply::fixed(replies::OFFLINE, false);
        }

        // --- 2. SAFETY CLASSIFICATION ---
        let verdict = self.classifier.classify(input).await;

        if !verdict.is_safe {
            warn!("safety check flagged crisis, sending resources");
            return Reply::fixed(replies::CRISIS, true);
        }

        if verdict.is_sexual_topic {
            info!("safety check flagged sexual topic, redirecting to a trusted adult");
            return Reply::fixed(replies::TRUSTED_ADULT_REDIRECT, false);
        }

        // --- 3. PERSONA CALL ---
        let ctx = Context {
            system_prompt: self.system_prompt.clone(),
            history: history.to_vec(),
            current_message: input.to_string(),
            model: Some(self.model.clone()),
            temperature: Some(self.temperature),
            response_schema: None,
        };

        let completion = match self.provider.complete(&ctx).await {
            Ok(c) => c,
            Err(GraceError::CredentialRejected(e)) => {
                error!("API key rejected: {e}");
                return Reply::fixed(replies::CREDENTIAL_REJECTED, false);
            }
            Err(e) => {
                error!("persona call failed: {e}");
                return Reply::fixed(replies::RETRY_LATER, false);
            }
        };

        info!(
            "reply from {} in {}ms",
            completion.metadata.provider_used, completion.metadata.processing_time_ms
        );

        // --- 4. SANITIZE ---
        let cleaned = sanitize::clean_response(&completion.text);
        if let Some(ref action) = cleaned.action {
            info!("reply carried control action {}", action.kind());
        }

        Reply {
            text: cleaned.text,
            is_safety_resource: false,
            action: cleaned.action,
            insight: cleaned.insight,
        }
    }
}
