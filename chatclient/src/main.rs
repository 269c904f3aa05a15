#![warn(clippy::all)]

mod tui;

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::{debug, error, info};
use std::{fs::File, path::PathBuf, time::Duration};
use tokio::sync::{
    broadcast::{self},
    mpsc,
};

use chatclient::{
    api::{self, Api},
    config::ClientConfig,
    session::{SessionManager, SessionSignal},
    state_handler::{Action, ClientState, StateHandler},
    view::TextType,
    ClientError,
};
use common::RoomId;
use tui::{
    app_router::AppRouter,
    components::component::{Component, ComponentRender},
    Event, Tui,
};

#[derive(Clone)]
enum Terminate {
    Exit,
}

type UploadOutcome = (PathBuf, Result<String, ClientError>);

fn init_logging(config: &ClientConfig) -> Result<()> {
    let log_file = File::create(&config.log_file)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(log_file)))
        .init();

    Ok(())
}

pub fn display_help(state: &mut ClientState) {
    state.push_notification(TextType::Notification {
        text: String::from("List of available commands:"),
    });

    let commands = [
        "    /login {user} {password} - Log in and join the main room",
        "    /logout - Close the session",
        "    /join {room} - Switch to a room",
        "    /main - Switch back to the main room",
        "    /dm {user} - Open the direct-message room with a user",
        "    /upload {path} - Upload a file and share its link",
        "    /quit - Close chat client",
        "    Ctrl-B / Ctrl-T / Ctrl-U - Bold, italic, underline the draft",
        "    Anything else is sent to the active room",
    ];

    for command in commands {
        state.push_notification(TextType::Listing {
            text: String::from(command),
        });
    }
}

fn notify_error(state: &mut ClientState, text: String) {
    state.push_notification(TextType::Error { text });
}

fn handle_signal(signal: SessionSignal, sessions: &mut SessionManager, state: &mut ClientState) {
    match signal {
        SessionSignal::Frame(raw) => match sessions.handle_frame(&raw, state) {
            Ok(dispatched) => debug!("[*] Dispatched inbound event: {dispatched:?}"),
            // Already logged by the session
            Err(ClientError::MalformedEvent(_)) => {}
            Err(e) => notify_error(state, format!("[-] {e}")),
        },
        SessionSignal::TypingExpired(user) => {
            sessions.handle_typing_expired(&user, state);
        }
        SessionSignal::Closed => {
            sessions.close();
            state.terminate_connection();
            notify_error(state, String::from("[-] Closed connection to server"));
        }
    }
}

async fn handle_action(
    action: Action,
    api: &Api,
    sessions: &mut SessionManager,
    state: &mut ClientState,
    state_handler: &StateHandler,
    upload_tx: &mpsc::UnboundedSender<UploadOutcome>,
) {
    match action {
        Action::Help => display_help(state),
        Action::Quit => state.exit(),
        Action::Invalid => notify_error(state, String::from("[-] Invalid command")),
        Action::Login { user, password } => {
            if sessions.is_open() {
                notify_error(state, String::from("[-] Already logged in, use /logout first"));
                return;
            }

            state.push_notification(TextType::Notification {
                text: format!("[*] Logging in as [{user}]"),
            });
            state_handler.send_update(state.clone());

            if let Err(e) = api.login(&user, &password).await {
                notify_error(state, format!("[-] {e}"));
                return;
            }

            match sessions.connect(&user, state).await {
                Ok(()) => {
                    let server = sessions.config().ws_url.clone();
                    state.establish(&server, &user);
                    state.push_notification(TextType::Notification {
                        text: format!("[+] Connected to {server} as [{user}]"),
                    });
                }
                Err(e) => {
                    error!("[-] Failed to open session: {e}");
                    state.terminate_connection();
                    notify_error(state, format!("[-] Failed to connect: {e}"));
                }
            }
        }
        // Everything below needs a session
        _ if !sessions.is_open() => {
            notify_error(state, String::from("[-] Not logged in"));
        }
        Action::Logout => {
            sessions.close();
            state.terminate_connection();
            state.push_notification(TextType::Notification {
                text: String::from("[-] Logged out"),
            });
        }
        Action::Join { room } => match sessions.switch_room(RoomId::new(room), state) {
            Ok(true) => {}
            Ok(false) => state.push_notification(TextType::Notification {
                text: String::from("[*] Already in that room"),
            }),
            Err(e) => notify_error(state, format!("[-] {e}")),
        },
        Action::DirectMessage { user } => {
            if let Err(e) = sessions.direct_message(&user, state) {
                notify_error(state, format!("[-] {e}"));
            }
        }
        Action::Send { message } => {
            if let Err(e) = sessions.send_message(&message) {
                notify_error(state, format!("[-] {e}"));
            }
        }
        Action::Typing => {
            if let Err(e) = sessions.send_typing() {
                debug!("[-] Typing notice not sent: {e}");
            }
        }
        Action::Upload { path } => {
            state.push_notification(TextType::Notification {
                text: format!("[*] Uploading {}", path.display()),
            });

            let api = api.clone();
            let upload_tx = upload_tx.clone();
            tokio::spawn(async move {
                let result = api.upload(&path).await;
                let _ = upload_tx.send((path, result));
            });
        }
    }
}

fn handle_upload(outcome: UploadOutcome, sessions: &mut SessionManager, state: &mut ClientState) {
    let (path, result) = outcome;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let sent = result.and_then(|url| {
        info!("[+] Uploaded {file_name} to {url}");
        sessions.send_message(&api::shared_file_message(&file_name, &url))
    });

    if let Err(e) = sent {
        error!("[-] Upload of {file_name} failed: {e}");
        notify_error(state, format!("[-] {e}"));
    }
}

async fn run(
    config: ClientConfig,
    shutdown_tx: broadcast::Sender<Terminate>,
    shutdown_rx: &mut broadcast::Receiver<Terminate>,
) -> Result<()> {
    // Initialize required structures:
    // * Channel for passing state between TUI and state handler
    // * Channel for passing actions/input from TUI to state handler
    // * Shutdown channels for TUI and state handler components
    let (state_handler, mut state_rx) = StateHandler::new();
    let (tui, mut action_rx, mut tui_events) = Tui::new();
    let mut shutdown_state = shutdown_rx.resubscribe();
    let mut shutdown_tui = shutdown_rx.resubscribe();

    // State Handler
    let state_task = tokio::spawn(async move {
        let mut state = ClientState::default();
        state_handler.send_update(state.clone());

        let api = Api::new(&config.api_url);
        let mut sessions = SessionManager::new(config.session_config());
        let (upload_tx, mut upload_rx) = mpsc::unbounded_channel::<UploadOutcome>();

        let mut ticker = tokio::time::interval(Duration::from_millis(250));
        let mut update = false;

        loop {
            if state.exit {
                let _ = shutdown_tx.send(Terminate::Exit);
                break;
            }

            // Four sources of events:
            // * Session (server frames, typing expiry, disconnect)
            // * Finished uploads
            // * Action channel from TUI
            // * Shutdown channel
            tokio::select! {
                _tick = ticker.tick() => {},
                signal = sessions.next_signal() => {
                    handle_signal(signal, &mut sessions, &mut state);
                    update = true;
                },
                Some(outcome) = upload_rx.recv() => {
                    handle_upload(outcome, &mut sessions, &mut state);
                    update = true;
                },
                action = action_rx.recv() => {
                    let Some(action) = action else {
                        break;
                    };

                    handle_action(
                        action,
                        &api,
                        &mut sessions,
                        &mut state,
                        &state_handler,
                        &upload_tx,
                    )
                    .await;
                    update = true;
                },
                _ = shutdown_state.recv() => {
                    break;
                }
            }

            // Update state if needed
            if update {
                state_handler.send_update(state.clone());
                update = false;
            }
        }

        sessions.close();
    });

    // TUI Handler
    let tui_task = tokio::spawn(async move {
        let mut terminal = match Tui::setup_terminal() {
            Ok(terminal) => terminal,
            Err(e) => {
                error!("[-] Failed to set up terminal: {e}");
                return;
            }
        };

        // Get initial State
        let Some(state) = state_rx.recv().await else {
            let _ = Tui::teardown_terminal(&mut terminal);
            return;
        };
        let mut app_router = AppRouter::new(&state, tui.action_tx);
        let _ = terminal.draw(|f| app_router.render(f, ()));

        // Main loop with three sources of events:
        // * Terminal user interface events such as keyboard
        // * State update channel
        // * Client shutdown channel
        loop {
            tokio::select! {
                event = tui_events.next() => {
                    match event {
                        Ok(Event::Key(key)) => app_router.handle_key_event(key),
                        Ok(Event::Tick) => {},
                        Ok(Event::Error) | Err(_) => {},
                    }
                },
                state = state_rx.recv() => {
                    if let Some(state) = state {
                        app_router = app_router.update(&state);
                    }
                },
                _ = shutdown_tui.recv() => {
                    break;
                }
            }

            let _ = terminal.draw(|f| app_router.render(f, ()));
        }

        if let Err(e) = Tui::teardown_terminal(&mut terminal) {
            error!("[-] Failed to restore terminal: {e}");
        }
    });

    // Wait for both tasks to finish
    let (_, _) = tokio::join!(tui_task, state_task);

    Ok(())
}

fn shutdown() {
    println!("shutting down client");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::parse();
    init_logging(&config)?;
    info!("[*] Starting client, api at {}", config.api_url);

    // Create broadcast channel to send shutdown signal to the different components
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<Terminate>(2);
    let mut shutdown_main = shutdown_rx.resubscribe();

    tokio::spawn(async move {
        if let Err(e) = run(config, shutdown_tx, &mut shutdown_rx).await {
            error!("[-] Client stopped: {e}");
        }
    })
    .await?;

    tokio::select! {
        _ = shutdown_main.recv() => {
            shutdown();
        }
    }

    Ok(())
}
