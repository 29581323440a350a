use async_trait::async_trait;

use crate::events::{Listener, TeamEvent};

/// Emits team events as tracing events.
///
/// Requires the `tracing` feature to be enabled.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &TeamEvent) {
        match event {
            TeamEvent::AccessDenied {
                user_id,
                resource_id,
                reason,
                ..
            } => tracing::debug!(
                target: "warden::events",
                event_name = event.name(),
                user_id = user_id.as_deref().unwrap_or("anonymous"),
                %resource_id,
                %reason,
                "access denied"
            ),
            _ => tracing::info!(
                target: "warden::events",
                event_name = event.name(),
                ?event,
                "team event"
            ),
        }
    }
}
