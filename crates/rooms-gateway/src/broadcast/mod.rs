//! Room broadcaster implementation
//!
//! Wires the `RoomBroadcaster` port from rooms-core to the in-process
//! connection manager.

mod room_broadcaster;
