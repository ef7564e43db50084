//! Directory-backed ExceptionLogRepository implementation.

use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use steward_core::activity::ActivityId;
use steward_core::error::{Result, StewardError};
use steward_core::exception_log::{ExceptionLogEntry, ExceptionLogRepository, LogId};
use tokio::fs;
use tokio::sync::Mutex;

const FILE_PREFIX: &str = "exception-";
const FILE_EXTENSION: &str = "json";

/// Exception log storing one JSON document per entry.
///
/// Directory structure:
/// ```text
/// base_dir/
/// ├── exception-1.json
/// └── exception-2.json
/// ```
///
/// Entries are written with their derived fields materialised, so a reloaded
/// entry reports the message, inner message and stack trace it was saved with.
pub struct AsyncDirExceptionLogRepository {
    base_dir: PathBuf,
    /// Highest id handed out so far. Held while writing to serialise saves.
    last_id: Mutex<i64>,
}

impl AsyncDirExceptionLogRepository {
    /// Opens (creating if needed) an exception log in `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or scanned.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StewardError::io(format!("Failed to create exception log dir: {}", e)))?;

        let last_id = scan_ids(&base_dir).await?.into_iter().max().unwrap_or(0);
        tracing::debug!(
            "[ExceptionLog] Opened {:?} (last id {})",
            base_dir,
            last_id
        );

        Ok(Self {
            base_dir,
            last_id: Mutex::new(last_id),
        })
    }

    fn entry_path(&self, log_id: LogId) -> PathBuf {
        self.base_dir
            .join(format!("{}{}.{}", FILE_PREFIX, log_id.value(), FILE_EXTENSION))
    }

    async fn load(&self, path: &Path) -> Result<ExceptionLogEntry> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

async fn scan_ids(base_dir: &Path) -> Result<Vec<i64>> {
    let mut ids = Vec::new();
    let mut dir = fs::read_dir(base_dir).await?;
    while let Some(item) = dir.next_entry().await? {
        if let Some(id) = parse_id(&item.path()) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn parse_id(path: &Path) -> Option<i64> {
    if path.extension()? != FILE_EXTENSION {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix(FILE_PREFIX)?
        .parse()
        .ok()
}

#[async_trait]
impl ExceptionLogRepository for AsyncDirExceptionLogRepository {
    async fn save(&self, entry: &ExceptionLogEntry) -> Result<ExceptionLogEntry> {
        let mut last_id = self.last_id.lock().await;

        let mut persisted = entry.clone();
        if !persisted.log_id().is_assigned() {
            persisted.mark_persisted(LogId::new(*last_id + 1), Utc::now());
        }

        let path = self.entry_path(persisted.log_id());
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&persisted)?;

        // Write to a temp file and rename so readers never see a partial entry
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| StewardError::io(format!("Failed to write exception log: {}", e)))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StewardError::io(format!("Failed to commit exception log: {}", e)))?;

        // Entries saved with an explicit id must not be overwritten by a later assignment
        *last_id = (*last_id).max(persisted.log_id().value());

        tracing::debug!("[ExceptionLog] Wrote {:?}", path);
        Ok(persisted)
    }

    async fn find_by_id(&self, log_id: LogId) -> Result<Option<ExceptionLogEntry>> {
        let content = match fs::read_to_string(self.entry_path(log_id)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn list_by_activity(&self, activity_id: ActivityId) -> Result<Vec<ExceptionLogEntry>> {
        let mut ids = scan_ids(&self.base_dir).await?;
        ids.sort_unstable();

        let mut entries = Vec::new();
        for id in ids {
            let entry = self.load(&self.entry_path(LogId::new(id))).await?;
            if entry.activity_id() == activity_id {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use tempfile::TempDir;

    async fn create_test_repository() -> (AsyncDirExceptionLogRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AsyncDirExceptionLogRepository::new(temp_dir.path())
            .await
            .unwrap();
        (repo, temp_dir)
    }

    fn failing_write() -> ExceptionLogEntry {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "deadlock detected");
        let failure = Err::<(), _>(io).context("updating stock level").unwrap_err();
        ExceptionLogEntry::capture(failure, "StockItem", "reserve failed")
    }

    #[tokio::test]
    async fn test_save_and_find_entry() {
        let (repo, _temp_dir) = create_test_repository().await;

        let saved = repo
            .save(&failing_write().with_activity(ActivityId::new(2)))
            .await
            .unwrap();
        assert_eq!(saved.log_id(), LogId::new(1));

        let found = repo.find_by_id(saved.log_id()).await.unwrap().unwrap();
        assert_eq!(found.message(), "updating stock level");
        assert_eq!(found.inner_message(), "deadlock detected");
        assert_eq!(
            found.custom_message(),
            "Error in type: StockItem. Message: reserve failed"
        );
        assert_eq!(found.activity_id(), ActivityId::new(2));
        assert_eq!(found.created_date(), saved.created_date());
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let (repo, _temp_dir) = create_test_repository().await;
        assert!(repo.find_by_id(LogId::new(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_continue_after_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let repo = AsyncDirExceptionLogRepository::new(temp_dir.path())
                .await
                .unwrap();
            repo.save(&failing_write()).await.unwrap();
            repo.save(&failing_write()).await.unwrap();
        }

        let reopened = AsyncDirExceptionLogRepository::new(temp_dir.path())
            .await
            .unwrap();
        let saved = reopened.save(&failing_write()).await.unwrap();
        assert_eq!(saved.log_id(), LogId::new(3));
    }

    #[tokio::test]
    async fn test_explicit_id_advances_assignment() {
        let (repo, _temp_dir) = create_test_repository().await;
        let mut imported = failing_write();
        imported.mark_persisted(LogId::new(10), Utc::now());
        repo.save(&imported).await.unwrap();

        let saved = repo.save(&failing_write()).await.unwrap();
        assert_eq!(saved.log_id(), LogId::new(11));

        let kept = repo.find_by_id(LogId::new(10)).await.unwrap().unwrap();
        assert_eq!(kept.created_date(), imported.created_date());
    }

    #[tokio::test]
    async fn test_list_by_activity() {
        let (repo, _temp_dir) = create_test_repository().await;
        let tracked = ActivityId::new(8);

        repo.save(&failing_write().with_activity(tracked)).await.unwrap();
        repo.save(&failing_write()).await.unwrap();
        repo.save(&failing_write().with_activity(tracked)).await.unwrap();

        let entries = repo.list_by_activity(tracked).await.unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.log_id().value()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Path::new("/x/exception-12.json")), Some(12));
        assert_eq!(parse_id(Path::new("/x/exception-12.json.tmp")), None);
        assert_eq!(parse_id(Path::new("/x/notes.json")), None);
    }
}
