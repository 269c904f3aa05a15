pub mod event;
pub mod markdown;
pub mod room;

pub use event::{Event, EventError, Presence};
pub use room::{RoomId, MAIN_ROOM};
