//! Room broadcaster trait (port) - real-time fan-out after state changes

use async_trait::async_trait;

use crate::events::GatewayEvent;
use crate::value_objects::Snowflake;

/// Fan-out interface injected into the service layer
///
/// Implementations track which live connections have joined which rooms.
/// Delivery is best-effort; a slow or dead subscriber never fails the
/// operation that triggered the event.
#[async_trait]
pub trait RoomBroadcaster: Send + Sync {
    /// Deliver an event to every connection currently joined to its room
    async fn broadcast_to_room(&self, event: GatewayEvent);

    /// Deliver an event to every connection of one user, regardless of rooms
    async fn send_to_user(&self, user_id: Snowflake, event: GatewayEvent);

    /// Detach every connection from a room that no longer exists
    async fn close_room(&self, group_id: Snowflake);
}
