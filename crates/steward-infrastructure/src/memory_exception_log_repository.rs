//! In-memory ExceptionLogRepository implementation.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use steward_core::activity::ActivityId;
use steward_core::error::Result;
use steward_core::exception_log::{ExceptionLogEntry, ExceptionLogRepository, LogId};
use tokio::sync::Mutex;

/// Map-backed exception log keeping entries in id order.
#[derive(Default)]
pub struct InMemoryExceptionLogRepository {
    entries: Mutex<BTreeMap<LogId, ExceptionLogEntry>>,
}

impl InMemoryExceptionLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All persisted entries, oldest first.
    pub async fn list_all(&self) -> Vec<ExceptionLogEntry> {
        self.entries.lock().await.values().cloned().collect()
    }
}

#[async_trait]
impl ExceptionLogRepository for InMemoryExceptionLogRepository {
    async fn save(&self, entry: &ExceptionLogEntry) -> Result<ExceptionLogEntry> {
        let mut entries = self.entries.lock().await;

        let mut persisted = entry.clone();
        if !persisted.log_id().is_assigned() {
            let next = entries
                .keys()
                .next_back()
                .map(|id| id.value() + 1)
                .unwrap_or(1);
            persisted.mark_persisted(LogId::new(next), Utc::now());
        }
        entries.insert(persisted.log_id(), persisted.clone());

        tracing::debug!(
            "[ExceptionLog] Saved entry {} for activity {}",
            persisted.log_id(),
            persisted.activity_id()
        );
        Ok(persisted)
    }

    async fn find_by_id(&self, log_id: LogId) -> Result<Option<ExceptionLogEntry>> {
        Ok(self.entries.lock().await.get(&log_id).cloned())
    }

    async fn list_by_activity(&self, activity_id: ActivityId) -> Result<Vec<ExceptionLogEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .values()
            .filter(|entry| entry.activity_id() == activity_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_assigns_id_and_date() {
        let repo = InMemoryExceptionLogRepository::new();
        let entry = ExceptionLogEntry::capture(anyhow::anyhow!("timeout"), "Invoice", "post failed");

        let saved = repo.save(&entry).await.unwrap();
        assert_eq!(saved.log_id(), LogId::new(1));
        assert!(saved.created_date().is_some());
        assert_eq!(saved.message(), "timeout");

        // The captured value itself is untouched.
        assert!(!entry.log_id().is_assigned());
    }

    #[tokio::test]
    async fn test_list_by_activity_filters() {
        let repo = InMemoryExceptionLogRepository::new();
        let tracked = ActivityId::new(5);

        repo.save(
            &ExceptionLogEntry::capture(anyhow::anyhow!("a"), "Invoice", "first")
                .with_activity(tracked),
        )
        .await
        .unwrap();
        repo.save(&ExceptionLogEntry::capture(anyhow::anyhow!("b"), "Invoice", "untracked"))
            .await
            .unwrap();
        repo.save(
            &ExceptionLogEntry::capture(anyhow::anyhow!("c"), "Invoice", "second")
                .with_activity(tracked),
        )
        .await
        .unwrap();

        let found = repo.list_by_activity(tracked).await.unwrap();
        let messages: Vec<String> = found.iter().map(|e| e.message()).collect();
        assert_eq!(messages, vec!["a", "c"]);
        assert_eq!(repo.list_all().await.len(), 3);
    }
}
