use std::sync::OnceLock;

use super::{Listener, TeamEvent};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// Listeners receiving every [`TeamEvent`], in registration order.
///
/// Configure the process-wide registry once with [`register_event_listeners`].
#[derive(Default)]
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver an event to every listener of this registry.
    pub async fn deliver(&self, event: &TeamEvent) {
        for listener in &self.listeners {
            listener.handle(event).await;
        }
    }
}

/// Register the process-wide listeners at application startup.
///
/// Only the first call takes effect; later calls are logged and ignored.
///
/// ```rust,ignore
/// use warden::register_event_listeners;
/// use warden::events::listeners::LoggingListener;
///
/// register_event_listeners(|registry| {
///     registry
///         .listen(LoggingListener::new())
///         .listen(InviteNotifier::new(notifications));
/// });
/// ```
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);
    let count = registry.len();
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: "warden::events",
            "msg=\"register_event_listeners called more than once, ignoring\""
        );
        return;
    }
    log::debug!(target: "warden::events", "msg=\"event listeners registered\", count={count}");
}

/// Dispatch an event to the process-wide listeners. No-op until
/// [`register_event_listeners`] was called.
pub async fn dispatch(event: TeamEvent) {
    if let Some(registry) = REGISTRY.get() {
        registry.deliver(&event).await;
    }
}
