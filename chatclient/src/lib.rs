pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod state_handler;
pub mod view;

pub use error::ClientError;
