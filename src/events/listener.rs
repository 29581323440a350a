use async_trait::async_trait;

use super::TeamEvent;

/// Trait for handling team events asynchronously.
///
/// Implement this trait to create custom event listeners, e.g. to send the
/// invitee a notification or to keep a search index in sync.
///
/// # Example
///
/// ```rust,ignore
/// use warden::events::{TeamEvent, Listener};
/// use async_trait::async_trait;
///
/// struct InviteNotifier {
///     notifications: NotificationService,
/// }
///
/// #[async_trait]
/// impl Listener for InviteNotifier {
///     async fn handle(&self, event: &TeamEvent) {
///         if let TeamEvent::MemberInvited { team_id, user_id, invited_by, .. } = event {
///             self.notifications.team_invite(user_id, team_id, invited_by).await;
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Handle a team event.
    ///
    /// This method is called for every event dispatched. Filter by matching
    /// on the event variant to handle specific events.
    async fn handle(&self, event: &TeamEvent);
}
