use async_trait::async_trait;

use crate::events::{Listener, TeamEvent};

/// Logs every team event through the `log` crate.
///
/// Denials are logged one level below `level` so that routine "not found"
/// answers don't drown out membership changes.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Creates a new logging listener at INFO level.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }

    fn level_for(&self, event: &TeamEvent) -> log::Level {
        match (event, self.level) {
            (TeamEvent::AccessDenied { .. }, log::Level::Error) => log::Level::Warn,
            (TeamEvent::AccessDenied { .. }, log::Level::Warn) => log::Level::Info,
            (TeamEvent::AccessDenied { .. }, log::Level::Info) => log::Level::Debug,
            (TeamEvent::AccessDenied { .. }, _) => log::Level::Trace,
            (_, level) => level,
        }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &TeamEvent) {
        log::log!(
            target: "warden::events",
            self.level_for(event),
            "event={} {:?}",
            event.name(),
            event
        );
    }
}
