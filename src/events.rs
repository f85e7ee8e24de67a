use serde_json::Value;

/// Fire-and-forget analytics. Tracking never affects form behavior.
pub trait EventSink: Send + Sync {
    fn track(&self, event: &str, props: Value);
}

/// Writes events to the log under the `analytics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn track(&self, event: &str, props: Value) {
        log::info!(target: "analytics", "{} {}", event, props);
    }
}
