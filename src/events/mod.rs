//! Event system for team actions.
//!
//! Events are fired from every team action. If no listeners are registered,
//! they are silently ignored.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use warden::register_event_listeners;
//! use warden::events::listeners::LoggingListener;
//!
//! fn main() {
//!     register_event_listeners(|registry| {
//!         registry.listen(LoggingListener::new());
//!     });
//! }
//! ```
//!
//! # Custom Listeners
//!
//! ```rust,ignore
//! use warden::events::{TeamEvent, Listener};
//! use async_trait::async_trait;
//!
//! struct SearchSyncListener;
//!
//! #[async_trait]
//! impl Listener for SearchSyncListener {
//!     async fn handle(&self, event: &TeamEvent) {
//!         match event {
//!             TeamEvent::ProjectAddedToOrganisation { project_id, .. }
//!             | TeamEvent::ProjectRemovedFromOrganisation { project_id, .. } => {
//!                 // reindex the project
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::TeamEvent;
pub use listener::Listener;
pub use registry::{dispatch, register_event_listeners, EventRegistry};
