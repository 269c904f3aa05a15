use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Help,
    Login { user: String, password: String },
    Logout,
    Join { room: String },
    DirectMessage { user: String },
    Upload { path: PathBuf },
    Send { message: String },
    Typing,
    Quit,
    Invalid,
}

pub fn parse_command(string: String) -> Option<Action> {
    let trimmed = string.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Some(stripped) = trimmed.strip_prefix('/') else {
        return Some(Action::Send {
            message: trimmed.to_string(),
        });
    };

    let mut tokens = stripped.split_whitespace();
    let cmd_name = tokens.next()?;

    match cmd_name {
        "help" => Some(Action::Help),
        "login" => {
            let user = tokens.next()?.to_string();
            let password = tokens.next()?.to_string();

            Some(Action::Login { user, password })
        }
        "logout" => Some(Action::Logout),
        "join" => {
            let room = tokens.next()?.to_string();

            Some(Action::Join { room })
        }
        "main" => Some(Action::Join {
            room: String::from(common::MAIN_ROOM),
        }),
        "dm" => {
            let user = tokens.next()?.to_string();

            Some(Action::DirectMessage { user })
        }
        "upload" => {
            // Paths may contain spaces
            let path = stripped
                .trim_start()
                .strip_prefix("upload")
                .unwrap_or_default()
                .trim();
            if path.is_empty() {
                return None;
            }

            Some(Action::Upload {
                path: PathBuf::from(path),
            })
        }
        "quit" => Some(Action::Quit),
        _ => None,
    }
}
