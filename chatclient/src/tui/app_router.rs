use super::components::component::{Component, ComponentRender};
use super::components::main_page::MainPage;
use chatclient::state_handler::{Action, ClientState};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use tokio::sync::mpsc::UnboundedSender;

/// Top of the component tree. Owns the global key bindings and forwards
/// everything else to the page.
pub struct AppRouter {
    main_page: MainPage,
    action_tx: UnboundedSender<Action>,
}

impl Component for AppRouter {
    fn new(state: &ClientState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        AppRouter {
            main_page: MainPage::new(state, action_tx.clone()),
            action_tx,
        }
    }

    fn update(self, state: &ClientState) -> Self
    where
        Self: Sized,
    {
        Self {
            main_page: self.main_page.update(state),
            action_tx: self.action_tx,
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            let _ = self.action_tx.send(Action::Quit);
            return;
        }

        self.main_page.handle_key_event(key);
    }
}

impl ComponentRender<()> for AppRouter {
    fn render(&self, frame: &mut Frame, props: ()) {
        self.main_page.render(frame, props);
    }
}
