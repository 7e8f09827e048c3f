use crate::{context::Context, error::GraceError, message::Completion, profile::Profile};
use async_trait::async_trait;

/// AI provider trait.
///
/// Every model backend implements this trait so the gateway can run the
/// classifier and the persona call through one interface.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether a credential is present. Checked before any network call.
    fn is_configured(&self) -> bool;

    /// Send a conversation context to the provider and get the raw completion.
    async fn complete(&self, context: &Context) -> Result<Completion, GraceError>;

    /// Check if the provider is reachable and accepts the credential.
    async fn is_available(&self) -> bool;
}

/// Storage for the single user profile.
///
/// `load` returns `Ok(None)` both when nothing was saved and when the saved
/// data is unreadable; corruption is never an error for callers.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Load the saved profile, if any.
    async fn load(&self) -> Result<Option<Profile>, GraceError>;

    /// Replace the saved profile.
    async fn save(&self, profile: &Profile) -> Result<(), GraceError>;

    /// Forget the saved profile.
    async fn clear(&self) -> Result<(), GraceError>;
}
