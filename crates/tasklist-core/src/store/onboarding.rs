use std::sync::Arc;

use super::{collection, StoreError};
use crate::constants::keys::ONBOARDING_COMPLETED;
use crate::constants::ONBOARDING_DONE_VALUE;
use crate::storage::StorageGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingState {
    NotStarted,
    Completed,
}

/// One-time first-run marker stored under `onboardingCompleted`.
#[derive(Clone)]
pub struct OnboardingFlag {
    gateway: Arc<dyn StorageGateway>,
}

impl OnboardingFlag {
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self { gateway }
    }

    /// False when the key is absent, holds a falsy value, or cannot be read.
    pub async fn has_completed(&self) -> bool {
        match self.gateway.get(ONBOARDING_COMPLETED).await {
            Ok(Some(value)) => is_truthy(&value),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read onboarding flag");
                false
            }
        }
    }

    pub async fn state(&self) -> OnboardingState {
        if self.has_completed().await {
            OnboardingState::Completed
        } else {
            OnboardingState::NotStarted
        }
    }

    /// Called when the user finishes or skips the onboarding screens.
    pub async fn mark_completed(&self) -> Result<(), StoreError> {
        collection::write(self.gateway.as_ref(), ONBOARDING_COMPLETED, ONBOARDING_DONE_VALUE).await?;
        tracing::info!("onboarding completed");
        Ok(())
    }

    /// Show onboarding again on next launch.
    pub async fn reset(&self) -> Result<(), StoreError> {
        collection::remove(self.gateway.as_ref(), ONBOARDING_COMPLETED).await
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(value.trim(), "" | "false" | "0" | "null")
}
