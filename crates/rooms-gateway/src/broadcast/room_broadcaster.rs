//! `RoomBroadcaster` impl for the connection manager

use async_trait::async_trait;

use rooms_core::traits::RoomBroadcaster;
use rooms_core::{GatewayEvent, Snowflake};

use crate::connection::ConnectionManager;

#[async_trait]
impl RoomBroadcaster for ConnectionManager {
    async fn broadcast_to_room(&self, event: GatewayEvent) {
        let group_id = event.group_id();
        self.send_to_room(group_id, event).await;
    }

    async fn send_to_user(&self, user_id: Snowflake, event: GatewayEvent) {
        Self::send_to_user(self, user_id, event).await;
    }

    async fn close_room(&self, group_id: Snowflake) {
        self.drop_room(group_id).await;
    }
}
