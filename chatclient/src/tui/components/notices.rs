use super::component::{Component, ComponentRender, RenderProps};
use chatclient::state_handler::{Action, ClientState};
use chatclient::view::TextType;

use crossterm::event::KeyEvent;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListDirection},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

/// Local notifications: command feedback, errors, help output.
pub struct Notices {
    print_buffer: Vec<TextType>,
}

impl Component for Notices {
    fn new(state: &ClientState, _action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            print_buffer: state.notifications.clone(),
        }
    }

    fn update(self, state: &ClientState) -> Self
    where
        Self: Sized,
    {
        Self {
            print_buffer: state.notifications.clone(),
        }
    }

    fn handle_key_event(&mut self, _key: KeyEvent) {}
}

impl ComponentRender<RenderProps> for Notices {
    fn render(&self, frame: &mut Frame, props: RenderProps) {
        let text = List::new(
            self.print_buffer
                .iter()
                .rev()
                .map(|line| match line {
                    TextType::Notification { text } => {
                        let style = Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD);

                        Line::from(text.as_str()).style(style)
                    }
                    TextType::Error { text } => {
                        let style = Style::new()
                            .fg(Color::LightRed)
                            .add_modifier(Modifier::BOLD);

                        Line::from(text.as_str()).style(style)
                    }
                    TextType::Listing { text } => {
                        let style = Style::new().fg(Color::White);

                        Line::from(text.as_str()).style(style)
                    }
                })
                .collect::<Vec<_>>(),
        )
        .direction(ListDirection::BottomToTop)
        .block(
            Block::default()
                .title(" Notifications ")
                .borders(Borders::ALL)
                .fg(props.border_color),
        );

        frame.render_widget(text, props.area);
    }
}
