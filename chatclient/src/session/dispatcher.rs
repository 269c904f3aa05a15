use common::{markdown, Event, EventError, Presence, RoomId};

use super::SessionState;
use crate::view::{Bubble, ChatView, Ownership};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    InactiveRoom,
    Duplicate,
}

/// What one inbound event did to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatched {
    Heartbeat,
    Rendered,
    Dropped(DropReason),
    Typing,
    Presence,
    /// The log was cleared; the event must be sent to reload the history.
    Rejoin(Event),
    Ignored,
}

/// Routes inbound events to the session's state components.
pub struct ProtocolDispatcher {
    clock: fn() -> String,
}

fn local_clock() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

impl Default for ProtocolDispatcher {
    fn default() -> Self {
        Self { clock: local_clock }
    }
}

impl ProtocolDispatcher {
    pub fn with_clock(clock: fn() -> String) -> Self {
        Self { clock }
    }

    /// Parses and applies one raw payload. A parse error leaves the session
    /// untouched; the caller decides how to report it.
    pub fn dispatch(
        &self,
        raw: &str,
        session: &mut SessionState,
        view: &mut dyn ChatView,
    ) -> Result<Dispatched, EventError> {
        let event = Event::parse(raw)?;

        Ok(self.apply(event, session, view))
    }

    pub fn apply(
        &self,
        event: Event,
        session: &mut SessionState,
        view: &mut dyn ChatView,
    ) -> Dispatched {
        match event {
            Event::Heartbeat => Dispatched::Heartbeat,
            Event::Message {
                id,
                user,
                room,
                text,
            } => self.render_message(id, user, room, &text, session, view),
            Event::Typing { user } => {
                if user == session.user {
                    return Dispatched::Ignored;
                }

                session.typing.mark_typing(&user);
                session.render_typing_change(&user, view);

                Dispatched::Typing
            }
            Event::Status { user, presence } => {
                match presence {
                    Presence::Online => {
                        if session.presence.online(&user) && session.rooms.add_peer(&user) {
                            view.render_room_list(session.rooms.entries());
                        }
                    }
                    Presence::Offline => {
                        session.presence.offline(&user);
                    }
                }
                session.render_users(view);

                Dispatched::Presence
            }
            Event::HistoryCleared { room, .. } => {
                if !session.rooms.is_active(&room) {
                    return Dispatched::Ignored;
                }

                Dispatched::Rejoin(session.rooms.rejoin(view))
            }
            Event::SwitchRoom { .. } => Dispatched::Ignored,
        }
    }

    fn render_message(
        &self,
        id: Option<String>,
        user: String,
        room: RoomId,
        text: &str,
        session: &mut SessionState,
        view: &mut dyn ChatView,
    ) -> Dispatched {
        if !session.rooms.is_active(&room) {
            return Dispatched::Dropped(DropReason::InactiveRoom);
        }

        if let Some(id) = id {
            if !session.rooms.note_rendered(&id) {
                return Dispatched::Dropped(DropReason::Duplicate);
            }
        }

        let ownership = if user == session.user {
            Ownership::Own
        } else {
            Ownership::Other
        };

        view.render_bubble(Bubble {
            ownership,
            username: user,
            timestamp: (self.clock)(),
            markup: markdown::render(text),
        });

        Dispatched::Rendered
    }
}
