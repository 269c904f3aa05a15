use common::event::EventError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport could not be established. The client stays logged out.
    #[error("connection failed: {0}")]
    Connection(String),
    /// Unparseable or unrecognized payload. Logged and discarded.
    #[error("malformed event: {0}")]
    MalformedEvent(#[from] EventError),
    /// Send attempted while the connection is not open. Nothing is retried.
    #[error("send rejected: {0}")]
    SendRejected(&'static str),
    #[error("login failed: {0}")]
    Login(String),
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
