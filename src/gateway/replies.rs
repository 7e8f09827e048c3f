//! Fixed replies. None of these come from the model or from prompt files.

/// No API key configured.
pub const OFFLINE: &str =
    "Connection to the stars is currently offline. Please ensure your API key is set.";

/// The classifier flagged self-harm or crisis.
pub const CRISIS: &str = "I hear that you are in pain, and I want you to be safe. You matter. \
Text HOME to 741741 or call 988. I am here for you, but your safety requires more help than I can give alone.";

/// The classifier flagged a sexual topic.
pub const TRUSTED_ADULT_REDIRECT: &str = "I hear you, and it's totally natural to have questions about that. \
Since my focus is on helping you navigate the orbits of friendship and social signals, I'm not the best one \
to dive into that topic. I'd really encourage you to share these questions with a trusted friend or an adult \
you feel safe with, like a parent, teacher, or counselor.";

/// The persona call failed in transit.
pub const RETRY_LATER: &str =
    "The stars are a bit fuzzy right now. Let's try that again in a heartbeat.";

/// The provider refused the configured API key.
pub const CREDENTIAL_REJECTED: &str = "I can't reach the stars right now because the API key was rejected. \
Please check that your API key is valid.";
