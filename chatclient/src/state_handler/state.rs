use crate::view::{Bubble, ChatView, RoomEntry, TextType, UserEntry};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    LoggedOut,
    Connected,
}

/// Snapshot of everything the terminal UI draws.
#[derive(Clone)]
pub struct ClientState {
    pub connection_status: ConnectionStatus,
    pub current_server: String,
    pub username: String,
    pub log: Vec<Bubble>,
    pub users: Vec<UserEntry>,
    pub rooms: Vec<RoomEntry>,
    pub typing: Vec<String>,
    pub notifications: Vec<TextType>,
    pub exit: bool,
}

impl Default for ClientState {
    fn default() -> ClientState {
        let startup_notifications = vec![
            TextType::Notification {
                text: String::from("---- To quit use /quit ----"),
            },
            TextType::Notification {
                text: String::from("[*] Not logged in. Use /login {user} {password}"),
            },
            TextType::Notification {
                text: String::from("[*] To see list of available commands use /help"),
            },
        ];

        ClientState {
            connection_status: ConnectionStatus::LoggedOut,
            current_server: String::new(),
            username: String::new(),
            log: Vec::new(),
            users: Vec::new(),
            rooms: Vec::new(),
            typing: Vec::new(),
            notifications: startup_notifications,
            exit: false,
        }
    }
}

impl ClientState {
    pub fn push_notification(&mut self, notification: TextType) {
        self.notifications.push(notification);
    }

    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn establish(&mut self, server: &str, username: &str) {
        self.connection_status = ConnectionStatus::Connected;
        self.current_server = server.to_string();
        self.username = username.to_string();
    }

    /// Resets everything tied to the session. Notifications are kept.
    pub fn terminate_connection(&mut self) {
        self.connection_status = ConnectionStatus::LoggedOut;
        self.current_server.clear();
        self.username.clear();
        self.log.clear();
        self.users.clear();
        self.rooms.clear();
        self.typing.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.connection_status == ConnectionStatus::Connected
    }

    pub fn active_room(&self) -> Option<&RoomEntry> {
        self.rooms.iter().find(|room| room.selected)
    }

    /// Status line naming the peers that are currently typing, including
    /// ones that never announced themselves online.
    pub fn typing_line(&self) -> Option<String> {
        let typing: Vec<&str> = self
            .typing
            .iter()
            .map(String::as_str)
            .filter(|user| *user != self.username)
            .collect();

        match typing.as_slice() {
            [] => None,
            [user] => Some(format!("{user} is typing...")),
            users => Some(format!("{} are typing...", users.join(", "))),
        }
    }
}

impl ChatView for ClientState {
    fn render_bubble(&mut self, bubble: Bubble) {
        self.log.push(bubble);
    }

    fn clear_log(&mut self) {
        self.log.clear();
    }

    fn render_user_list(&mut self, users: Vec<UserEntry>) {
        self.users = users;
    }

    fn render_room_list(&mut self, rooms: Vec<RoomEntry>) {
        self.rooms = rooms;
    }

    fn render_typing(&mut self, users: Vec<String>) {
        self.typing = users;
    }

    fn notify(&mut self, notice: TextType) {
        self.push_notification(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, is_self: bool, typing: bool) -> UserEntry {
        UserEntry {
            handle: 0,
            username: name.to_string(),
            is_self,
            typing,
        }
    }

    #[test]
    fn typing_line_skips_self() {
        let mut state = ClientState::default();
        state.establish("ws://localhost", "me");
        state.render_typing(vec![String::from("me")]);
        assert_eq!(state.typing_line(), None);

        state.render_typing(vec![String::from("bob"), String::from("me")]);
        assert_eq!(state.typing_line().as_deref(), Some("bob is typing..."));

        state.render_typing(vec![String::from("amy"), String::from("bob")]);
        assert_eq!(state.typing_line().as_deref(), Some("amy, bob are typing..."));
    }

    #[test]
    fn typing_line_covers_users_not_listed_online() {
        let mut state = ClientState::default();
        state.establish("ws://localhost", "me");
        state.render_user_list(vec![user("me", true, false)]);
        state.render_typing(vec![String::from("ghost")]);

        assert_eq!(state.typing_line().as_deref(), Some("ghost is typing..."));
    }

    #[test]
    fn terminate_keeps_notifications() {
        let mut state = ClientState::default();
        let startup = state.notifications.len();
        state.establish("ws://localhost", "me");
        state.render_user_list(vec![user("me", true, false)]);
        state.render_typing(vec![String::from("bob")]);
        state.terminate_connection();

        assert!(!state.is_connected());
        assert!(state.users.is_empty());
        assert_eq!(state.typing_line(), None);
        assert_eq!(state.notifications.len(), startup);
    }
}
