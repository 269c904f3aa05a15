mod action;
pub mod presence;
pub mod room;
mod state;
pub mod typing;

pub use action::{parse_command, Action};
pub use presence::{PresenceTracker, UserHandle};
pub use room::RoomStateManager;
pub use state::{ClientState, ConnectionStatus};
pub use typing::TypingIndicatorController;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub struct StateHandler {
    pub state_tx: UnboundedSender<ClientState>,
}

impl StateHandler {
    pub fn new() -> (Self, UnboundedReceiver<ClientState>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel::<ClientState>();

        (Self { state_tx }, state_rx)
    }

    pub fn send_update(&self, state: ClientState) {
        // Receiver only goes away when the TUI is shutting down
        let _ = self.state_tx.send(state);
    }
}
