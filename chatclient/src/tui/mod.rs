pub mod app_router;
pub mod components;
pub mod markup;

use chatclient::state_handler::Action;

use color_eyre::eyre::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::{FutureExt, StreamExt};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub struct Tui {
    pub action_tx: UnboundedSender<Action>,
}

#[derive(Clone, Copy, Debug)]
pub enum Event {
    Error,
    Tick,
    Key(KeyEvent),
}

pub struct EventHandler {
    _tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let tick_rate = std::time::Duration::from_millis(200);

        let (tx, rx) = mpsc::unbounded_channel();
        let _tx = tx.clone();

        let _task = tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                let delay = interval.tick();
                let crossterm_event = reader.next().fuse();
                let event = tokio::select! {
                    maybe_event = crossterm_event => {
                        match maybe_event {
                            Some(Ok(crossterm::event::Event::Key(key)))
                                if key.kind == crossterm::event::KeyEventKind::Press =>
                            {
                                Some(Event::Key(key))
                            }
                            Some(Err(_)) => Some(Event::Error),
                            _ => None,
                        }
                    },
                    _ = delay => Some(Event::Tick),
                };

                if let Some(event) = event {
                    // Receiver dropped means the TUI is gone
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { _tx, rx }
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or(color_eyre::eyre::eyre!("Unable to get event"))
    }
}

impl Tui {
    pub fn new() -> (Self, UnboundedReceiver<Action>, EventHandler) {
        let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
        let event_handler = EventHandler::new();

        (Self { action_tx }, action_rx, event_handler)
    }

    pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
        let mut stdout = io::stdout();

        enable_raw_mode()?;

        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        Terminal::new(CrosstermBackend::new(stdout))
    }

    pub fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
        disable_raw_mode()?;

        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;

        terminal.show_cursor()
    }
}
