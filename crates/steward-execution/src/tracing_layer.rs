//! Tracing layer that forwards operation events to a channel.
//!
//! Lets a UI (or a test) observe lifecycle transitions and captured failures
//! as structured data instead of scraping formatted log lines.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

const DEFAULT_TARGET_PREFIX: &str = "steward";

/// One forwarded event.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OperationEvent {
    /// Event target (e.g. `"steward_execution::lifecycle"`)
    pub target: String,
    /// Log level (INFO, DEBUG, WARN, ERROR)
    pub level: String,
    pub message: String,
    /// Structured fields from the event
    pub fields: HashMap<String, Value>,
    /// Fields of the enclosing spans (e.g. source_type, activity_id), innermost wins
    pub span: HashMap<String, Value>,
    pub timestamp: String,
}

/// Forwards events whose target starts with a prefix to an unbounded channel.
pub struct OperationEventLayer {
    sender: mpsc::UnboundedSender<OperationEvent>,
    target_prefix: String,
}

impl OperationEventLayer {
    /// Forwards events from the steward crates.
    pub fn new(sender: mpsc::UnboundedSender<OperationEvent>) -> Self {
        Self::with_target_prefix(sender, DEFAULT_TARGET_PREFIX)
    }

    pub fn with_target_prefix(
        sender: mpsc::UnboundedSender<OperationEvent>,
        target_prefix: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            target_prefix: target_prefix.into(),
        }
    }
}

/// Span fields stored in span extensions.
struct SpanFields(HashMap<String, Value>);

impl<S> Layer<S> for OperationEventLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = HashMap::new();
        attrs.record(&mut FieldVisitor(&mut fields));
        span.extensions_mut().insert(SpanFields(fields));
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !target.starts_with(&self.target_prefix) {
            return;
        }

        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let mut span_fields = HashMap::new();
        if let Some(scope) = ctx.event_scope(event) {
            // Root first so inner spans override outer ones
            for span in scope.from_root() {
                if let Some(stored) = span.extensions().get::<SpanFields>() {
                    span_fields.extend(stored.0.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let message = fields
            .remove("message")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        let operation_event = OperationEvent {
            target: target.to_string(),
            level: event.metadata().level().to_string(),
            message,
            fields,
            span: span_fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // Receiver may be gone; events are best-effort
        let _ = self.sender.send(operation_event);
    }
}

/// Extracts tracing fields into a map of JSON values.
struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}
