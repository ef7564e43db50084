//! The `OkCancel` operation lifecycle.
//!
//! Drives one UI-triggered business operation from `Idle` through
//! `Processing` to exactly one terminal state, while staying responsive to a
//! cancel request from another task.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use steward_core::error::{Result, StewardError};
use steward_core::exception_log::ExceptionLogEntry;
use steward_core::operation::{LifecycleState, OperationContext, WorkerResult};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// State of a lifecycle at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleSnapshot {
    pub state: LifecycleState,
    /// Set exactly when `state` is terminal.
    pub result: Option<WorkerResult>,
}

type CompletionHandler = Box<dyn Fn(&WorkerResult) + Send + Sync>;

/// State machine for one operation: `Idle → Processing → {Succeeded, Cancelled, Errored}`.
///
/// Share it behind an `Arc` so the driver can [`run`](OkCancel::run) the
/// operation while a UI task calls [`cancel_processing`](OkCancel::cancel_processing).
///
/// # Transition rules
///
/// - `start_processing` is accepted only from `Idle`. A second start while
///   `Processing` is rejected with `InvalidTransition` and changes nothing.
/// - `stop_processing` is accepted only from `Processing`.
/// - `cancel_processing` is accepted from `Idle` (pre-emptive) or `Processing`.
/// - Every terminal transition cancels the lifecycle's token, so an operation
///   still running under [`run`](OkCancel::run) is abandoned.
/// - Every check-and-set happens under the watch channel's lock, so of a racing
///   stop and cancel exactly one succeeds and the other is rejected.
pub struct OkCancel {
    context: OperationContext,
    snapshot: watch::Sender<LifecycleSnapshot>,
    token: CancellationToken,
    handlers: Mutex<Vec<CompletionHandler>>,
}

impl OkCancel {
    /// Creates an idle lifecycle bound to `context`.
    pub fn new(context: OperationContext) -> Self {
        let (snapshot, _) = watch::channel(LifecycleSnapshot::default());
        Self {
            context,
            snapshot,
            token: CancellationToken::new(),
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn context(&self) -> &OperationContext {
        &self.context
    }

    pub fn state(&self) -> LifecycleState {
        self.snapshot.borrow().state
    }

    /// Terminal result, once there is one.
    pub fn result(&self) -> Option<WorkerResult> {
        self.snapshot.borrow().result.clone()
    }

    /// Token cancelled when the lifecycle reaches a terminal state.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Watches state changes.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleSnapshot> {
        self.snapshot.subscribe()
    }

    /// Registers a handler called once with the terminal result.
    ///
    /// Handlers registered after completion are not called retroactively.
    pub fn on_completed<F>(&self, handler: F)
    where
        F: Fn(&WorkerResult) + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(handler));
    }

    /// `Idle → Processing`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from any other state, including `Processing`.
    pub fn start_processing(&self) -> Result<()> {
        self.transition("start processing", |state| match state {
            LifecycleState::Idle => Some((LifecycleState::Processing, None)),
            _ => None,
        })?;
        tracing::debug!(
            source_type = %self.context.source_type,
            "[OkCancel] Processing started"
        );
        Ok(())
    }

    /// `Processing → Succeeded | Cancelled | Errored`, following the result's outcome.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the lifecycle is `Processing`. The
    /// result is discarded in that case.
    pub fn stop_processing(&self, result: WorkerResult) -> Result<()> {
        let terminal = LifecycleState::for_result(&result);
        let published = result.clone();
        self.transition("stop processing", move |state| match state {
            LifecycleState::Processing => Some((terminal, Some(result))),
            _ => None,
        })?;

        self.token.cancel();
        tracing::info!(
            source_type = %self.context.source_type,
            state = %terminal,
            "[OkCancel] Processing stopped"
        );
        self.notify(&published);
        Ok(())
    }

    /// `Idle | Processing → Cancelled`, and signals the cancellation token.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` once the lifecycle is terminal.
    pub fn cancel_processing(&self) -> Result<()> {
        let result = WorkerResult::cancelled_result();
        let published = result.clone();
        self.transition("cancel processing", move |state| match state {
            LifecycleState::Idle | LifecycleState::Processing => {
                Some((LifecycleState::Cancelled, Some(result)))
            }
            _ => None,
        })?;

        self.token.cancel();
        tracing::info!(
            source_type = %self.context.source_type,
            "[OkCancel] Processing cancelled"
        );
        self.notify(&published);
        Ok(())
    }

    /// Waits for the terminal result.
    pub async fn wait(&self) -> WorkerResult {
        let mut receiver = self.snapshot.subscribe();
        let result = match receiver.wait_for(|snapshot| snapshot.result.is_some()).await {
            Ok(snapshot) => snapshot.result.clone(),
            Err(_) => None,
        };
        result.unwrap_or_else(|| WorkerResult::errored("operation lifecycle closed before completing"))
    }

    /// Runs `operation` through the whole lifecycle and returns its terminal result.
    ///
    /// The operation receives a child of the lifecycle's cancellation token.
    /// If the lifecycle turns terminal first (a cancel, or a stop from another
    /// task), the operation future is dropped at its next suspension point, so
    /// it performs no further writes, and any value it would have produced is
    /// discarded.
    ///
    /// A failing operation never escapes as an error: the failure is captured
    /// into an [`ExceptionLogEntry`] and persisted through the context's
    /// exception log before the `Errored` result carrying its message is
    /// published.
    ///
    /// If the lifecycle was already started, `operation` is not called and the
    /// lifecycle's own terminal result is returned once there is one.
    pub async fn run<F, Fut>(&self, operation: F) -> WorkerResult
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = anyhow::Result<i64>>,
    {
        if let Err(e) = self.start_processing() {
            tracing::debug!("[OkCancel] Not running operation: {}", e);
            return self.wait().await;
        }

        let span = tracing::info_span!(
            "operation",
            source_type = %self.context.source_type,
            activity_id = %self.context.activity_id(),
            user = %self.context.session.user_name(),
        );

        let token = self.token.clone();
        let outcome = async {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                outcome = operation(token.child_token()) => Some(outcome),
            }
        }
        .instrument(span.clone())
        .await;

        match outcome {
            None => {
                tracing::debug!(parent: &span, "[OkCancel] Operation dropped after terminal transition");
            }
            Some(Ok(return_id)) => {
                if self
                    .stop_processing(WorkerResult::succeeded_with(return_id))
                    .is_err()
                {
                    tracing::debug!(parent: &span, "[OkCancel] Discarding result that lost to another transition");
                }
            }
            Some(Err(failure)) => {
                let entry = ExceptionLogEntry::capture(
                    failure,
                    self.context.source_type.clone(),
                    &self.context.failure_message,
                )
                .with_activity(self.context.activity_id());
                let message = entry.message();

                // Persisted before Errored is published
                self.persist_exception(entry)
                    .instrument(span.clone())
                    .await;
                if self.stop_processing(WorkerResult::errored(message)).is_err() {
                    tracing::debug!(parent: &span, "[OkCancel] Discarding failure that lost to another transition");
                }
            }
        }

        self.wait().await
    }

    async fn persist_exception(&self, entry: ExceptionLogEntry) {
        match self.context.exception_log.save(&entry).await {
            Ok(saved) => tracing::warn!(
                log_id = %saved.log_id(),
                "[OkCancel] {}: {}",
                saved.custom_message(),
                saved.message()
            ),
            Err(e) => tracing::error!(
                "[OkCancel] Failed to persist exception log ({}): {}",
                entry.custom_message(),
                e
            ),
        }
    }

    /// Applies `next` to the current state under the channel lock.
    ///
    /// `next` returns the new state and result, or `None` to reject.
    fn transition<F>(&self, action: &'static str, next: F) -> Result<()>
    where
        F: FnOnce(LifecycleState) -> Option<(LifecycleState, Option<WorkerResult>)>,
    {
        let mut rejected_from = None;
        self.snapshot.send_if_modified(|snapshot| match next(snapshot.state) {
            Some((state, result)) => {
                snapshot.state = state;
                snapshot.result = result;
                true
            }
            None => {
                rejected_from = Some(snapshot.state);
                false
            }
        });

        match rejected_from {
            Some(from) => {
                tracing::debug!("[OkCancel] Rejected '{}' while {}", action, from);
                Err(StewardError::invalid_transition(from.name(), action))
            }
            None => Ok(()),
        }
    }

    fn notify(&self, result: &WorkerResult) {
        // Taken out of the lock so a handler may register further handlers
        let handlers = std::mem::take(
            &mut *self.handlers.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for handler in &handlers {
            handler(result);
        }
    }
}
