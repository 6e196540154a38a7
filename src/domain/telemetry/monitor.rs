//! Transparent telemetry wrapper for tool calls.
//!
//! [`ToolMonitor::call`] runs a tool body and reports exactly one
//! `tool_start` followed by exactly one `tool_complete` or `tool_error`.
//! The body's value or error is handed back untouched.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{NoopObserver, ParameterSnapshot, Section, ToolEvent, ToolObserver};

/// Characters kept per argument in a start event.
pub const PARAMETER_PREVIEW_CHARS: usize = 100;

/// Characters kept when a scalar result is stringified.
pub const RESULT_PREVIEW_CHARS: usize = 500;

/// Wraps tool bodies with start/complete/error telemetry.
#[derive(Clone)]
pub struct ToolMonitor {
    observer: Arc<dyn ToolObserver>,
}

impl fmt::Debug for ToolMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolMonitor").finish_non_exhaustive()
    }
}

impl Default for ToolMonitor {
    fn default() -> Self {
        Self::disabled()
    }
}

impl ToolMonitor {
    pub fn new(observer: Arc<dyn ToolObserver>) -> Self {
        Self { observer }
    }

    /// Monitor whose events go nowhere.
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopObserver))
    }

    /// Runs `body` between a start event and its outcome event.
    ///
    /// `arguments` is only read to build the truncated parameter snapshot.
    /// The error returned by `body` is re-raised as-is after the
    /// `tool_error` event carries its message.
    pub fn call<T, E, F>(
        &self,
        tool_name: &str,
        section: Section,
        arguments: &Value,
        body: F,
    ) -> Result<T, E>
    where
        T: Serialize,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        self.observer.on_tool_event(&ToolEvent::start(
            tool_name,
            section,
            snapshot_parameters(arguments),
        ));
        tracing::debug!(tool_name, section = %section, "tool started");

        let started = Instant::now();
        let outcome = body();
        let duration_secs = started.elapsed().as_secs_f64();

        match &outcome {
            Ok(value) => {
                let result = snapshot_result(value);
                self.observer.on_tool_event(&ToolEvent::complete(
                    tool_name,
                    section,
                    result,
                    duration_secs,
                ));
                tracing::debug!(tool_name, section = %section, duration_secs, "tool completed");
            }
            Err(err) => {
                let message = err.to_string();
                tracing::debug!(
                    tool_name,
                    section = %section,
                    duration_secs,
                    error = %message,
                    "tool failed"
                );
                self.observer.on_tool_event(&ToolEvent::error(
                    tool_name,
                    section,
                    message,
                    duration_secs,
                ));
            }
        }

        outcome
    }
}

/// Builds the per-argument snapshot carried by a start event.
///
/// Object arguments keep their keys; anything else is filed under `args`.
pub fn snapshot_parameters(arguments: &Value) -> ParameterSnapshot {
    let mut snapshot = ParameterSnapshot::new();
    match arguments {
        Value::Object(map) => {
            for (key, value) in map {
                snapshot.insert(key.clone(), truncate(&stringify(value), PARAMETER_PREVIEW_CHARS));
            }
        }
        Value::Null => {}
        other => {
            snapshot.insert(
                "args".to_string(),
                truncate(&stringify(other), PARAMETER_PREVIEW_CHARS),
            );
        }
    }
    snapshot
}

/// Shapes a tool result for a complete event.
///
/// Records pass through, sequences become `{items, count}`, scalars become
/// `{value}` capped at [`RESULT_PREVIEW_CHARS`].
pub fn snapshot_result<T: Serialize>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(Value::Array(items)) => {
            let count = items.len();
            json!({ "items": items, "count": count })
        }
        Ok(other) => json!({ "value": truncate(&stringify(&other), RESULT_PREVIEW_CHARS) }),
        Err(err) => {
            let text = format!("<unserializable: {}>", err);
            json!({ "value": truncate(&text, RESULT_PREVIEW_CHARS) })
        }
    }
}

/// Keeps at most `max_chars` characters, respecting char boundaries.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
