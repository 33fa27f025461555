//! Process-wide holder for the most recent reading

use std::sync::Arc;
use tokio::sync::RwLock;
use wxlog_core::Reading;

/// Shared latest-reading slot.
///
/// Empty until the first successful poll, then overwritten on each one.
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct LatestWeatherCache {
    inner: Arc<RwLock<Option<Reading>>>,
}

impl LatestWeatherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current value
    pub async fn get(&self) -> Option<Reading> {
        *self.inner.read().await
    }

    pub async fn set(&self, reading: Reading) {
        *self.inner.write().await = Some(reading);
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_none()
    }
}
