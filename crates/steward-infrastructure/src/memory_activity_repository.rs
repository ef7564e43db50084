//! In-memory ActivityRepository implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use steward_core::activity::{ActivityId, ActivityRecord, ActivityRepository};
use steward_core::error::Result;
use tokio::sync::Mutex;

#[derive(Default)]
struct Activities {
    records: HashMap<ActivityId, ActivityRecord>,
    last_id: i64,
}

/// Map-backed activity repository assigning ids sequentially from 1.
#[derive(Default)]
pub struct InMemoryActivityRepository {
    activities: Mutex<Activities>,
}

impl InMemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn save(&self, activity: &ActivityRecord) -> Result<ActivityRecord> {
        let mut activities = self.activities.lock().await;

        let mut persisted = activity.clone();
        if !persisted.is_persisted() {
            activities.last_id += 1;
            persisted.activity_id = ActivityId::new(activities.last_id);
        }
        activities
            .records
            .insert(persisted.activity_id, persisted.clone());

        tracing::debug!(
            "[ActivityRepository] Saved activity {} '{}'",
            persisted.activity_id,
            persisted.name
        );
        Ok(persisted)
    }

    async fn find_by_id(&self, activity_id: ActivityId) -> Result<Option<ActivityRecord>> {
        Ok(self.activities.lock().await.records.get(&activity_id).cloned())
    }
}
