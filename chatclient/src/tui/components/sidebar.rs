use super::component::{Component, ComponentRender, RenderProps};
use chatclient::state_handler::{Action, ClientState};
use chatclient::view::{RoomEntry, UserEntry};

use crossterm::event::KeyEvent;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

/// Room list on top, online users below.
pub struct Sidebar {
    rooms: Vec<RoomEntry>,
    users: Vec<UserEntry>,
}

impl Component for Sidebar {
    fn new(state: &ClientState, _action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            rooms: state.rooms.clone(),
            users: state.users.clone(),
        }
    }

    fn update(self, state: &ClientState) -> Self
    where
        Self: Sized,
    {
        Self {
            rooms: state.rooms.clone(),
            users: state.users.clone(),
        }
    }

    fn handle_key_event(&mut self, _key: KeyEvent) {}
}

fn room_item(room: &RoomEntry) -> ListItem<'_> {
    if room.selected {
        ListItem::new(format!("> {}", room.label)).style(
            Style::new()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ListItem::new(format!("  {}", room.label))
    }
}

fn user_item(user: &UserEntry) -> ListItem<'_> {
    let mut spans = vec![Span::styled("● ", Style::new().fg(Color::Green))];

    if user.is_self {
        spans.push(Span::styled(
            format!("{} (you)", user.username),
            Style::new().add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::raw(user.username.as_str()));
    }

    if user.typing && !user.is_self {
        spans.push(Span::styled(
            " typing...",
            Style::new().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ));
    }

    ListItem::new(Line::from(spans))
}

impl ComponentRender<RenderProps> for Sidebar {
    fn render(&self, frame: &mut Frame, props: RenderProps) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(Constraint::from_percentages([40, 60]))
            .split(props.area);

        let rooms = List::new(self.rooms.iter().map(room_item).collect::<Vec<_>>()).block(
            Block::default()
                .title(" Rooms ")
                .borders(Borders::ALL)
                .fg(props.border_color),
        );

        let users = List::new(self.users.iter().map(user_item).collect::<Vec<_>>()).block(
            Block::default()
                .title(format!(" Online ({}) ", self.users.len()))
                .borders(Borders::ALL)
                .fg(props.border_color),
        );

        frame.render_widget(rooms, layout[0]);
        frame.render_widget(users, layout[1]);
    }
}
