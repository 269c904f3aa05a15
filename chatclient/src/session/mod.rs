mod connection;
pub mod dispatcher;
pub mod heartbeat;

use common::{Event, RoomId};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::Instant;

use crate::error::ClientError;
use crate::state_handler::{PresenceTracker, RoomStateManager, TypingIndicatorController};
use crate::view::{ChatView, UserEntry};
use connection::{Connection, Inbound};
pub use dispatcher::{Dispatched, DropReason, ProtocolDispatcher};
use heartbeat::{HeartbeatScheduler, HEARTBEAT_INTERVAL};

// Minimum gap between two outbound typing notices
const TYPING_THROTTLE: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub ws_url: String,
    pub heartbeat_interval: Duration,
    pub typing_window: Duration,
    /// Peers whose direct-message rooms are listed right after login.
    pub contacts: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ws_url: String::from("ws://127.0.0.1:8080"),
            heartbeat_interval: HEARTBEAT_INTERVAL,
            typing_window: crate::state_handler::typing::TYPING_WINDOW,
            contacts: Vec::new(),
        }
    }
}

/// Mutable state of one logged-in session.
pub struct SessionState {
    pub(crate) user: String,
    pub(crate) rooms: RoomStateManager,
    pub(crate) presence: PresenceTracker,
    pub(crate) typing: TypingIndicatorController,
}

impl SessionState {
    pub fn new(user: &str, config: &SessionConfig) -> Self {
        let mut rooms = RoomStateManager::new(user);
        for contact in &config.contacts {
            rooms.add_peer(contact);
        }

        Self {
            user: user.to_string(),
            rooms,
            presence: PresenceTracker::new(),
            typing: TypingIndicatorController::new(config.typing_window),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn rooms(&self) -> &RoomStateManager {
        &self.rooms
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    pub fn typing(&self) -> &TypingIndicatorController {
        &self.typing
    }

    pub fn user_entries(&self) -> Vec<UserEntry> {
        self.presence
            .snapshot()
            .into_iter()
            .map(|(username, handle)| UserEntry {
                handle,
                username: username.to_string(),
                is_self: username == self.user,
                typing: self.typing.is_typing(username),
            })
            .collect()
    }

    pub fn typing_users(&self) -> Vec<String> {
        let mut users = self.typing.typing_users();
        users.retain(|user| *user != self.user);

        users
    }

    /// Re-renders the typing line only.
    pub fn render_typing(&self, view: &mut dyn ChatView) {
        view.render_typing(self.typing_users());
    }

    /// Re-renders the user list and the typing line.
    pub fn render_users(&self, view: &mut dyn ChatView) {
        view.render_user_list(self.user_entries());
        self.render_typing(view);
    }

    /// Re-renders what a change to `user`'s typing flag affects. Users that
    /// are not listed online only show up in the typing line.
    pub fn render_typing_change(&self, user: &str, view: &mut dyn ChatView) {
        match self.presence.handle(user) {
            Some(handle) => {
                debug!("[*] Typing marker changed for {user} (#{handle})");
                self.render_users(view);
            }
            None => self.render_typing(view),
        }
    }
}

/// WebSocket URL for `user`. A bare host gets a `/` path so the query has
/// something to attach to.
pub fn session_url(ws_url: &str, user: &str) -> String {
    let base = ws_url.trim_end_matches('/');
    let has_path = base
        .split_once("://")
        .is_some_and(|(_, rest)| rest.contains('/'));
    let separator = if has_path { "" } else { "/" };

    format!("{base}{separator}?user={}", urlencoding::encode(user))
}

struct Session {
    state: SessionState,
    connection: Connection,
    heartbeat: HeartbeatScheduler,
    last_typing: Option<Instant>,
}

/// Something the event loop has to react to.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionSignal {
    Frame(String),
    TypingExpired(String),
    /// The server went away. The session is still held until `close()`.
    Closed,
}

/// Owns the connection and the single live session.
pub struct SessionManager {
    config: SessionConfig,
    dispatcher: ProtocolDispatcher,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_dispatcher(config, ProtocolDispatcher::default())
    }

    pub fn with_dispatcher(config: SessionConfig, dispatcher: ProtocolDispatcher) -> Self {
        Self {
            config,
            dispatcher,
            session: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Opens the connection for `user`. On success the local user is shown
    /// online, the active room is joined once and presence is announced.
    pub async fn connect(&mut self, user: &str, view: &mut dyn ChatView) -> Result<(), ClientError> {
        let user = user.trim();
        if user.is_empty() {
            return Err(ClientError::Connection(String::from("username required")));
        }

        if self.session.is_some() {
            self.close();
        }

        let url = session_url(&self.config.ws_url, user);
        info!("[*] Connecting to {url}");

        let connection = Connection::open(&url).await?;

        let mut state = SessionState::new(user, &self.config);
        state.presence.online(user);
        state.render_users(view);
        let join = state.rooms.rejoin(view);

        self.session = Some(Session {
            state,
            connection,
            heartbeat: HeartbeatScheduler::start(self.config.heartbeat_interval),
            last_typing: None,
        });

        self.send(join)?;
        self.send(Event::online(user))?;

        info!("[+] Session opened for {user}");

        Ok(())
    }

    /// Queues `event` on the connection. Never buffers: if the connection is
    /// not open the event is dropped.
    pub fn send(&mut self, event: Event) -> Result<(), ClientError> {
        let Some(session) = self.session.as_ref().filter(|s| s.connection.is_open()) else {
            warn!("[-] Dropping {} event: connection not open", event.kind());
            return Err(ClientError::SendRejected("connection not open"));
        };

        session.connection.send(event.to_message()?)
    }

    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                "[*] Closing session for {} after {} heartbeats",
                session.state.user,
                session.heartbeat.sent()
            );
        }
    }

    pub fn is_open(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.connection.is_open())
    }

    pub fn user(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.state.user())
    }

    pub fn active_room(&self) -> Option<&RoomId> {
        self.session
            .as_ref()
            .map(|session| session.state.rooms.active())
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.session.as_ref().map(|session| &session.state)
    }

    /// Waits for the next inbound frame, typing expiry or disconnect.
    /// Heartbeats are sent from here and never surface. Pends forever while
    /// logged out.
    pub async fn next_signal(&mut self) -> SessionSignal {
        let Some(session) = self.session.as_mut() else {
            return std::future::pending().await;
        };

        loop {
            tokio::select! {
                inbound = session.connection.recv() => {
                    return match inbound {
                        Inbound::Text(raw) => SessionSignal::Frame(raw),
                        Inbound::Closed => SessionSignal::Closed,
                    };
                },
                Some(user) = session.state.typing.next_expired() => {
                    return SessionSignal::TypingExpired(user);
                },
                heartbeat = session.heartbeat.tick() => {
                    let sent = heartbeat
                        .to_message()
                        .map_err(ClientError::from)
                        .and_then(|message| session.connection.send(message));

                    match sent {
                        Ok(()) => debug!("[*] Heartbeat sent by {}", session.state.user),
                        Err(e) => warn!("[-] Heartbeat not sent: {e}"),
                    }
                },
            }
        }
    }

    /// Runs one inbound payload through the dispatcher. Malformed payloads
    /// are logged and returned as errors without touching the session.
    pub fn handle_frame(
        &mut self,
        raw: &str,
        view: &mut dyn ChatView,
    ) -> Result<Dispatched, ClientError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Dispatched::Ignored);
        };

        let dispatched = match self.dispatcher.dispatch(raw, &mut session.state, view) {
            Ok(dispatched) => dispatched,
            Err(e) => {
                warn!("[-] Discarding inbound event: {e}");
                return Err(e.into());
            }
        };

        if let Dispatched::Rejoin(event) = &dispatched {
            self.send(event.clone())?;
        }

        Ok(dispatched)
    }

    pub fn handle_typing_expired(&mut self, user: &str, view: &mut dyn ChatView) {
        if let Some(session) = self.session.as_ref() {
            debug!("[*] {user} stopped typing");
            session.state.render_typing_change(user, view);
        }
    }

    /// Switches the active room. Returns `false` if it already was active.
    pub fn switch_room(&mut self, room: RoomId, view: &mut dyn ChatView) -> Result<bool, ClientError> {
        let session = self
            .session
            .as_mut()
            .ok_or(ClientError::SendRejected("not logged in"))?;

        match session.state.rooms.switch_to(room, view) {
            Some(event) => {
                self.send(event)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn direct_message(&mut self, peer: &str, view: &mut dyn ChatView) -> Result<bool, ClientError> {
        let session = self
            .session
            .as_mut()
            .ok_or(ClientError::SendRejected("not logged in"))?;

        if peer == session.state.user {
            return Err(ClientError::SendRejected("cannot message yourself"));
        }

        session.state.rooms.add_peer(peer);
        let room = RoomId::direct(&session.state.user, peer);

        self.switch_room(room, view)
    }

    /// Sends a chat message to the active room. Nothing is rendered here;
    /// the message shows up when the server echoes it back.
    pub fn send_message(&mut self, text: &str) -> Result<(), ClientError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::SendRejected("empty message"));
        }

        let session = self
            .session
            .as_ref()
            .ok_or(ClientError::SendRejected("not logged in"))?;
        let event = Event::message(&session.state.user, session.state.rooms.active(), text);

        self.send(event)
    }

    /// Sends a typing notice, at most one per second.
    pub fn send_typing(&mut self) -> Result<(), ClientError> {
        let session = self
            .session
            .as_mut()
            .ok_or(ClientError::SendRejected("not logged in"))?;

        let now = Instant::now();
        if session
            .last_typing
            .is_some_and(|last| now.duration_since(last) < TYPING_THROTTLE)
        {
            return Ok(());
        }
        session.last_typing = Some(now);
        let event = Event::typing(&session.state.user);

        self.send(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_url_carries_username() {
        assert_eq!(
            session_url("ws://127.0.0.1:8080", "al ice"),
            "ws://127.0.0.1:8080/?user=al%20ice"
        );
        assert_eq!(
            session_url("wss://chat.example/ws/", "bob"),
            "wss://chat.example/ws?user=bob"
        );
    }

    #[test]
    fn contacts_become_rooms() {
        let config = SessionConfig {
            contacts: vec![String::from("bob"), String::from("me")],
            ..SessionConfig::default()
        };
        let state = SessionState::new("me", &config);

        let labels: Vec<String> = state
            .rooms()
            .entries()
            .into_iter()
            .map(|room| room.label)
            .collect();
        assert_eq!(labels, vec!["Main Chat", "Chat with bob"]);
        assert!(state.presence().is_empty());
    }
}
