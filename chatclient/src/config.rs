use clap::Parser;
use std::{path::PathBuf, time::Duration};

use crate::session::SessionConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "chatclient", about = "Terminal client for the realtime chat server")]
pub struct ClientConfig {
    // WebSocket endpoint, the username is appended as ?user=
    #[arg(long, env = "CHAT_WS_URL", default_value = "ws://127.0.0.1:8080")]
    pub ws_url: String,

    // Base URL of the login and upload endpoints
    #[arg(long, env = "CHAT_API_URL", default_value = "http://127.0.0.1:5000")]
    pub api_url: String,

    #[arg(long, default_value_t = 10)]
    pub heartbeat_secs: u64,

    #[arg(long, default_value_t = 3)]
    pub typing_secs: u64,

    // Peers listed as direct-message rooms after login
    #[arg(long, value_delimiter = ',')]
    pub contacts: Vec<String>,

    #[arg(long, env = "CHAT_LOG_FILE", default_value = "chatclient.log")]
    pub log_file: PathBuf,
}

impl ClientConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            ws_url: self.ws_url.clone(),
            heartbeat_interval: Duration::from_secs(self.heartbeat_secs.max(1)),
            typing_window: Duration::from_secs(self.typing_secs.max(1)),
            contacts: self
                .contacts
                .iter()
                .map(|contact| contact.trim().to_string())
                .filter(|contact| !contact.is_empty())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::parse_from(["chatclient"]);
        let session = config.session_config();

        assert_eq!(session.heartbeat_interval, Duration::from_secs(10));
        assert_eq!(session.typing_window, Duration::from_secs(3));
        assert!(session.contacts.is_empty());
    }

    #[test]
    fn contacts_are_comma_separated() {
        let config = ClientConfig::parse_from([
            "chatclient",
            "--contacts",
            "user1,user2, ,user3",
            "--heartbeat-secs",
            "5",
        ]);
        let session = config.session_config();

        assert_eq!(session.contacts, vec!["user1", "user2", "user3"]);
        assert_eq!(session.heartbeat_interval, Duration::from_secs(5));
    }
}
