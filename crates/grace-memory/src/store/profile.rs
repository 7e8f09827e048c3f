//! Learner profile persistence.

use super::{Store, PROFILE_KEY};
use async_trait::async_trait;
use grace_core::{error::GraceError, profile::Profile, traits::ProfileRepository};
use tracing::warn;

#[async_trait]
impl ProfileRepository for Store {
    async fn load(&self) -> Result<Option<Profile>, GraceError> {
        let Some(raw) = self.get_value(PROFILE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<Profile>(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                // An unreadable profile is treated as absent so onboarding can start over.
                warn!("stored profile is corrupt, discarding: {e}");
                self.delete_value(PROFILE_KEY).await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, profile: &Profile) -> Result<(), GraceError> {
        let json = serde_json::to_string(profile)?;
        self.put_value(PROFILE_KEY, &json).await
    }

    async fn clear(&self) -> Result<(), GraceError> {
        self.delete_value(PROFILE_KEY).await?;
        Ok(())
    }
}
