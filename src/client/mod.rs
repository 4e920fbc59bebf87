//! Terminal client: logs in, polls the conversation and submits messages.

pub mod api;
pub mod formulas;
pub mod poller;
pub mod render;
pub mod session;

pub use api::{ChatClient, ClientError};
pub use poller::Poller;
pub use session::{Session, SessionState};

pub const CLEAR_CONFIRMATION: &str = "Are you sure you want to delete all messages? This cannot be undone. [y/N] ";

pub const HELP: &str = "\
Commands:
  <text>              send a message
  /clear              delete all messages (asks for confirmation)
  /refresh            fetch messages now
  /physics [section]  show the physics formula reference
  /logout             end the session
  /quit               exit
";

/// One line of user input while logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Clear,
    Refresh,
    Physics(Option<String>),
    Logout,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parses an input line. Blank lines yield `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let Some(rest) = trimmed.strip_prefix('/') else {
            return Some(Self::Send(trimmed.to_string()));
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty()).map(str::to_string);

        Some(match name {
            "clear" => Self::Clear,
            "refresh" => Self::Refresh,
            "physics" => Self::Physics(arg),
            "logout" => Self::Logout,
            "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// Only an explicit yes confirms a destructive action.
#[must_use]
pub fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
