use super::component::{Component, ComponentRender, RenderProps};
use crate::tui::markup;
use chatclient::state_handler::{Action, ClientState};
use chatclient::view::{Bubble, Ownership};

use crossterm::event::KeyEvent;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListDirection, ListItem},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

/// Message log of the active room.
pub struct Primary {
    log: Vec<Bubble>,
    title: String,
    typing: Option<String>,
}

fn title_for(state: &ClientState) -> String {
    match state.active_room() {
        Some(room) => format!(" {} @ {} ", room.label, state.current_server),
        None => String::from(" CLI CHAT RUST "),
    }
}

impl Component for Primary {
    fn new(state: &ClientState, _action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            log: state.log.clone(),
            title: title_for(state),
            typing: state.typing_line(),
        }
    }

    fn update(self, state: &ClientState) -> Self
    where
        Self: Sized,
    {
        Self {
            log: state.log.clone(),
            title: title_for(state),
            typing: state.typing_line(),
        }
    }

    fn handle_key_event(&mut self, _key: KeyEvent) {}
}

fn bubble_item(bubble: &Bubble) -> ListItem<'static> {
    let name_style = match bubble.ownership {
        Ownership::Own => Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
        Ownership::Other => Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    };

    let mut spans = vec![
        Span::styled(format!("[{}] ", bubble.timestamp), Style::new().fg(Color::DarkGray)),
        Span::styled(format!("{}: ", bubble.username), name_style),
    ];
    spans.extend(markup::to_spans(&bubble.markup));

    ListItem::new(Line::from(spans))
}

impl ComponentRender<RenderProps> for Primary {
    fn render(&self, frame: &mut Frame, props: RenderProps) {
        let mut block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .fg(props.border_color);

        if let Some(typing) = &self.typing {
            block = block.title_bottom(
                Line::from(format!(" {typing} "))
                    .style(Style::new().fg(Color::Gray).add_modifier(Modifier::ITALIC)),
            );
        }

        let log = List::new(self.log.iter().rev().map(bubble_item).collect::<Vec<_>>())
            .direction(ListDirection::BottomToTop)
            .block(block);

        frame.render_widget(log, props.area);
    }
}
