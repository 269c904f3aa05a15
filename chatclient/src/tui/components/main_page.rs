use super::component::{Component, ComponentRender, RenderProps};
use super::input_box::InputBox;
use super::notices::Notices;
use super::primary::Primary;
use super::sidebar::Sidebar;
use chatclient::state_handler::{Action, ClientState};

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Color,
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

pub struct MainPage {
    input_box: InputBox,
    primary: Primary,
    notices: Notices,
    sidebar: Sidebar,
}

impl Component for MainPage {
    fn new(state: &ClientState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            input_box: InputBox::new(state, action_tx.clone()),
            primary: Primary::new(state, action_tx.clone()),
            notices: Notices::new(state, action_tx.clone()),
            sidebar: Sidebar::new(state, action_tx),
        }
    }

    fn update(self, state: &ClientState) -> Self
    where
        Self: Sized,
    {
        Self {
            input_box: self.input_box.update(state),
            primary: self.primary.update(state),
            notices: self.notices.update(state),
            sidebar: self.sidebar.update(state),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        self.input_box.handle_key_event(key);
    }
}

impl ComponentRender<()> for MainPage {
    fn render(&self, frame: &mut Frame, _props: ()) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(20)])
            .split(frame.area());

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(8),
                Constraint::Length(3),
            ])
            .split(columns[1]);

        self.sidebar.render(
            frame,
            RenderProps {
                area: columns[0],
                border_color: Color::LightMagenta,
            },
        );

        self.primary.render(
            frame,
            RenderProps {
                area: rows[0],
                border_color: Color::LightMagenta,
            },
        );

        self.notices.render(
            frame,
            RenderProps {
                area: rows[1],
                border_color: Color::Blue,
            },
        );

        self.input_box.render(
            frame,
            RenderProps {
                area: rows[2],
                border_color: Color::LightMagenta,
            },
        );
    }
}
