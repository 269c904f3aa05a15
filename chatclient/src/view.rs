use common::RoomId;

// Enum used to determine how to stylize the text
// printed out in the notification area
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextType {
    Notification { text: String },
    Error { text: String },
    Listing { text: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    Own,
    Other,
}

/// One rendered chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bubble {
    pub ownership: Ownership,
    pub username: String,
    pub timestamp: String,
    pub markup: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserEntry {
    pub handle: u64,
    pub username: String,
    pub is_self: bool,
    pub typing: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomEntry {
    pub id: RoomId,
    pub label: String,
    pub selected: bool,
}

/// Render callbacks invoked by the session layer. Views live in the task
/// that owns the session, so they must be `Send`.
pub trait ChatView: Send {
    fn render_bubble(&mut self, bubble: Bubble);

    fn clear_log(&mut self);

    fn render_user_list(&mut self, users: Vec<UserEntry>);

    fn render_room_list(&mut self, rooms: Vec<RoomEntry>);

    /// Peers currently typing, whether or not they are listed online.
    fn render_typing(&mut self, users: Vec<String>);

    fn notify(&mut self, notice: TextType);
}
