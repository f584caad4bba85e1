//! Event sink trait and implementations.

use async_trait::async_trait;
use tracing::{debug, info, Level};

/// Trait for sinks that receive pipeline lifecycle events.
///
/// The coordinator emits `stage.started`, `stage.completed`,
/// `stage.failed`, `pipeline.completed` and `pipeline.failed` through the
/// sink it was built with. There is no ambient global sink; the sink is
/// injected at construction time.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>);

    /// Emits an event without blocking.
    ///
    /// Must never panic; delivery problems are logged and suppressed.
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>);
}

/// A sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {
        // Intentionally empty.
    }

    fn try_emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {
        // Intentionally empty.
    }
}

/// A sink that logs events through the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a logging sink with the specified level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level logging sink.
    #[must_use]
    pub const fn info() -> Self {
        Self::new(Level::INFO)
    }

    fn log_event(&self, event_type: &str, data: &Option<serde_json::Value>) {
        if self.level == Level::DEBUG {
            debug!(
                event_type = %event_type,
                event_data = ?data,
                "Event: {}", event_type
            );
        } else {
            info!(
                event_type = %event_type,
                event_data = ?data,
                "Event: {}", event_type
            );
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, &data);
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, &data);
    }
}

/// A sink that buffers events for assertions in tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<(String, Option<serde_json::Value>)>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<(String, Option<serde_json::Value>)> {
        self.events.read().clone()
    }

    /// Returns the collected event types in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events.read().iter().map(|(t, _)| t.clone()).collect()
    }

    /// Clears the buffer.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.write().push((event_type.to_string(), data));
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.write().push((event_type.to_string(), data));
    }
}
