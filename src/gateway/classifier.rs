//! Safety classifier: one constrained JSON call per user input, fail-open.

use grace_core::{
    config::safety_check_request, context::Context, traits::Provider, verdict::SafetyVerdict,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Judges user input before it reaches the persona.
pub struct SafetyClassifier {
    provider: Arc<dyn Provider>,
    model: String,
}

impl SafetyClassifier {
    pub fn new(provider: Arc<dyn Provider>, model: String) -> Self {
        Self { provider, model }
    }

    /// Classify `input`. Never fails: a missing key, a transport error, or an
    /// unreadable answer all yield [`SafetyVerdict::FAIL_OPEN`].
    pub async fn classify(&self, input: &str) -> SafetyVerdict {
        if !self.provider.is_configured() {
            debug!("safety check skipped: no API key");
            return SafetyVerdict::FAIL_OPEN;
        }

        let mut ctx = Context::new(&safety_check_request(input));
        ctx.model = Some(self.model.clone());
        ctx.response_schema = Some(SafetyVerdict::response_schema());

        match self.provider.complete(&ctx).await {
            Ok(resp) => match parse_verdict(&resp.text) {
                Ok(verdict) => {
                    debug!(
                        "safety verdict: safe={} relevant={} sexual={}",
                        verdict.is_safe, verdict.is_relevant, verdict.is_sexual_topic
                    );
                    verdict
                }
                Err(e) => {
                    warn!("safety check returned unreadable verdict, failing open: {e}");
                    SafetyVerdict::FAIL_OPEN
                }
            },
            Err(e) => {
                warn!("safety check failed, failing open: {e}");
                SafetyVerdict::FAIL_OPEN
            }
        }
    }
}

/// Parse the classifier's JSON, tolerating a ```json fence around it.
fn parse_verdict(text: &str) -> Result<SafetyVerdict, serde_json::Error> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(unfenced.trim())
}
