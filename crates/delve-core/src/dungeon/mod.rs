//! Dungeon data model
//!
//! Rooms, the room registry and the connections between main rooms.

mod connection;
mod room;
mod room_set;

pub use connection::{ConnectionKind, Direction, RoomConnection};
pub use room::{Room, RoomFlags, RoomId};
pub use room_set::RoomSet;
