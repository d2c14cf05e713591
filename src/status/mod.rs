mod client;
mod models;
mod parser;

/// Settings key holding the dedicated server base URL.
pub const SERVER_URL_KEY: &str = "ams2_server_url";

pub use client::StatusClient;
pub use models::{LiveParticipant, SessionInfo, StatusPage};
pub use parser::parse_status_page;
