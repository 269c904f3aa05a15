use common::markdown;
use log::{error, info};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ClientError;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
}

/// HTTP side of the chat server: login and file upload.
#[derive(Clone)]
pub struct Api {
    client: reqwest::Client,
    base_url: String,
}

impl Api {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            return Err(ClientError::Login(String::from(
                "Please enter both username and password.",
            )));
        }

        info!("[*] Logging in as {username}");

        let response = self
            .client
            .post(format!("{}/login", self.base_url))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        // Rejections still carry a JSON body, so the status code is not checked
        let result: LoginResponse = response.json().await?;

        if result.success {
            Ok(())
        } else {
            let reason = result
                .message
                .unwrap_or_else(|| String::from("Invalid username or password."));
            error!("[-] Login rejected for {username}: {reason}");

            Err(ClientError::Login(reason))
        }
    }

    /// Makes a server-relative path absolute against the API base URL.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            url.to_string()
        }
    }

    /// Uploads the file and returns the absolute URL the server stored it
    /// under.
    pub async fn upload(&self, path: &Path) -> Result<String, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        info!("[*] Uploading {file_name} ({} bytes)", bytes.len());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        let result: UploadResponse = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        match (result.success, result.url) {
            (true, Some(url)) => Ok(self.resolve_url(&url)),
            _ => Err(ClientError::Upload(String::from("Upload failed."))),
        }
    }
}

/// Chat message announcing an uploaded file. Uses link syntax so it goes
/// through the same escaping renderer as any other message. Markers in the
/// file name are escaped so it renders verbatim.
pub fn shared_file_message(file_name: &str, url: &str) -> String {
    format!(
        "Shared a file: [{}]({url})",
        markdown::escape_markers(file_name)
    )
}
