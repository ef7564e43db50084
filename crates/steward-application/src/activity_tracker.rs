//! Activity tracking use case.
//!
//! Opens activities and routes entity writes through the save/delete contract,
//! recording every failed write in the exception log under the activity it
//! belonged to.

use std::sync::Arc;
use steward_core::activity::{ActivityId, ActivityRecord, ActivityRepository};
use steward_core::entity::{AuditContext, EntityStore, Saveable, SaveableExt};
use steward_core::error::{Result, StewardError};
use steward_core::exception_log::{ExceptionLogEntry, ExceptionLogRepository};
use steward_core::session::SessionIdentity;

/// Coordinates activities, entity writes and the exception log.
///
/// # Example
///
/// ```ignore
/// let activity = tracker.begin_activity(&session, "Close month").await?;
/// tracker.save(&mut invoice, &store, AuditContext::Tracked(&activity)).await?;
/// ```
pub struct ActivityTracker {
    activity_repository: Arc<dyn ActivityRepository>,
    exception_log: Arc<dyn ExceptionLogRepository>,
}

impl ActivityTracker {
    pub fn new(
        activity_repository: Arc<dyn ActivityRepository>,
        exception_log: Arc<dyn ExceptionLogRepository>,
    ) -> Self {
        Self {
            activity_repository,
            exception_log,
        }
    }

    pub fn exception_log(&self) -> Arc<dyn ExceptionLogRepository> {
        self.exception_log.clone()
    }

    /// Persists a new activity for `session` and returns it with its id.
    pub async fn begin_activity(
        &self,
        session: &SessionIdentity,
        name: impl Into<String>,
    ) -> Result<ActivityRecord> {
        let activity = ActivityRecord::new(name, session.clone());
        let saved = self.activity_repository.save(&activity).await?;
        if !saved.is_persisted() {
            return Err(StewardError::persistence(
                "Activity",
                "repository did not assign an activity id",
            ));
        }

        tracing::info!(
            "[ActivityTracker] Began activity {} '{}' for {}",
            saved.activity_id,
            saved.name,
            session.user_name()
        );
        Ok(saved)
    }

    /// Reloads an activity by id.
    pub async fn find_activity(&self, activity_id: ActivityId) -> Result<ActivityRecord> {
        self.activity_repository
            .find_by_id(activity_id)
            .await?
            .ok_or_else(|| StewardError::not_found("Activity", activity_id.to_string()))
    }

    /// Saves `entity`, logging any failure before returning it.
    pub async fn save<E: Saveable>(
        &self,
        entity: &mut E,
        store: &dyn EntityStore<E>,
        audit: AuditContext<'_>,
    ) -> Result<i64> {
        match entity.save(store, audit).await {
            Ok(key) => Ok(key),
            Err(e) => {
                self.record_failure::<E>(&e, "save failed", audit).await;
                Err(e)
            }
        }
    }

    /// Deletes `entity`, logging any failure before returning it.
    pub async fn delete<E: Saveable>(
        &self,
        entity: &E,
        store: &dyn EntityStore<E>,
        audit: AuditContext<'_>,
    ) -> Result<()> {
        match entity.delete(store, audit).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.record_failure::<E>(&e, "delete failed", audit).await;
                Err(e)
            }
        }
    }

    /// Exception log entries recorded under `activity`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidActivity` for an activity that was never persisted.
    pub async fn exceptions_for(&self, activity: &ActivityRecord) -> Result<Vec<ExceptionLogEntry>> {
        match AuditContext::Tracked(activity).activity_id()? {
            Some(activity_id) => self.exception_log.list_by_activity(activity_id).await,
            None => Ok(Vec::new()),
        }
    }

    async fn record_failure<E: Saveable>(
        &self,
        error: &StewardError,
        custom_message: &str,
        audit: AuditContext<'_>,
    ) {
        // An unpersisted activity cannot be correlated; log it uncorrelated
        let activity_id = audit
            .activity_id()
            .ok()
            .flatten()
            .unwrap_or(ActivityId::UNASSIGNED);

        let entry = ExceptionLogEntry::capture_for::<E>(error.clone(), custom_message)
            .with_activity(activity_id);

        match self.exception_log.save(&entry).await {
            Ok(saved) => tracing::warn!(
                "[ActivityTracker] Logged exception {} for {} (activity {}): {}",
                saved.log_id(),
                E::ENTITY_NAME,
                activity_id,
                error
            ),
            Err(log_error) => tracing::error!(
                "[ActivityTracker] Failed to log exception for {}: {} (original error: {})",
                E::ENTITY_NAME,
                log_error,
                error
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_core::entity::UNASSIGNED_KEY;
    use steward_infrastructure::{
        InMemoryActivityRepository, InMemoryEntityStore, InMemoryExceptionLogRepository,
    };
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    struct Invoice {
        invoice_id: i64,
        activity_id: ActivityId,
        amount: i64,
    }

    impl Invoice {
        fn new(amount: i64) -> Self {
            Self {
                invoice_id: UNASSIGNED_KEY,
                activity_id: ActivityId::UNASSIGNED,
                amount,
            }
        }
    }

    impl Saveable for Invoice {
        const ENTITY_NAME: &'static str = "Invoice";

        fn primary_key(&self) -> i64 {
            self.invoice_id
        }

        fn assign_primary_key(&mut self, key: i64) {
            self.invoice_id = key;
        }

        fn activity_id(&self) -> ActivityId {
            self.activity_id
        }

        fn set_activity_id(&mut self, activity_id: ActivityId) {
            self.activity_id = activity_id;
        }
    }

    struct Fixture {
        tracker: ActivityTracker,
        activities: Arc<InMemoryActivityRepository>,
        exception_log: Arc<InMemoryExceptionLogRepository>,
        store: InMemoryEntityStore<Invoice>,
    }

    fn create_fixture() -> Fixture {
        let activities = Arc::new(InMemoryActivityRepository::new());
        let exception_log = Arc::new(InMemoryExceptionLogRepository::new());
        Fixture {
            tracker: ActivityTracker::new(activities.clone(), exception_log.clone()),
            activities,
            exception_log,
            store: InMemoryEntityStore::new(),
        }
    }

    fn accountant() -> SessionIdentity {
        SessionIdentity::new("ledger-pc-04", "steward-books", Uuid::new_v4(), "accountant")
    }

    #[tokio::test]
    async fn test_begin_activity_assigns_id() {
        let fixture = create_fixture();
        let activity = fixture
            .tracker
            .begin_activity(&accountant(), "Close month")
            .await
            .unwrap();

        assert!(activity.is_persisted());
        assert_eq!(activity.session.user_name(), "accountant");

        let reloaded = fixture
            .tracker
            .find_activity(activity.activity_id)
            .await
            .unwrap();
        assert_eq!(reloaded, activity);
    }

    #[tokio::test]
    async fn test_find_missing_activity() {
        let fixture = create_fixture();
        let err = fixture
            .tracker
            .find_activity(ActivityId::new(77))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_tracked_save_stamps_activity() {
        let fixture = create_fixture();
        let activity = fixture
            .tracker
            .begin_activity(&accountant(), "Issue invoices")
            .await
            .unwrap();
        let mut invoice = Invoice::new(1200);

        let key = fixture
            .tracker
            .save(&mut invoice, &fixture.store, AuditContext::Tracked(&activity))
            .await
            .unwrap();

        assert_eq!(invoice.invoice_id, key);
        assert_eq!(invoice.activity_id, activity.activity_id);
        let stored = fixture.store.find(key).await.unwrap().unwrap();
        assert_eq!(stored.amount, 1200);
        assert!(fixture.exception_log.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_is_logged_under_activity() {
        let fixture = create_fixture();
        let activity = fixture
            .tracker
            .begin_activity(&accountant(), "Void invoices")
            .await
            .unwrap();
        let never_saved = Invoice::new(5);

        let err = fixture
            .tracker
            .delete(&never_saved, &fixture.store, AuditContext::Tracked(&activity))
            .await
            .unwrap_err();
        assert!(err.is_persistence());

        let entries = fixture.tracker.exceptions_for(&activity).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source_type(), "Invoice");
        assert_eq!(
            entries[0].custom_message(),
            "Error in type: Invoice. Message: delete failed"
        );
        assert_eq!(entries[0].message(), err.to_string());
    }

    #[tokio::test]
    async fn test_unpersisted_activity_is_logged_uncorrelated() {
        let fixture = create_fixture();
        let draft = ActivityRecord::new("Draft", accountant());
        let mut invoice = Invoice::new(10);

        let err = fixture
            .tracker
            .save(&mut invoice, &fixture.store, AuditContext::Tracked(&draft))
            .await
            .unwrap_err();

        assert!(err.is_invalid_activity());
        assert!(invoice.is_new());
        assert!(fixture.store.is_empty().await);

        let logged = fixture.exception_log.list_all().await;
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].activity_id(), ActivityId::UNASSIGNED);
        assert!(
            fixture
                .tracker
                .exceptions_for(&draft)
                .await
                .unwrap_err()
                .is_invalid_activity()
        );
    }

    #[tokio::test]
    async fn test_reloaded_activity_id_matches_logged_entries() {
        let fixture = create_fixture();
        let activity = fixture
            .tracker
            .begin_activity(&accountant(), "Reconcile")
            .await
            .unwrap();
        let _ = fixture
            .tracker
            .delete(&Invoice::new(1), &fixture.store, AuditContext::Tracked(&activity))
            .await;

        let reloaded = fixture
            .activities
            .find_by_id(activity.activity_id)
            .await
            .unwrap()
            .unwrap();
        let entries = fixture.tracker.exceptions_for(&reloaded).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].activity_id(), reloaded.activity_id);
    }
}
