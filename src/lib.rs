//! mudprobe - scripted WebSocket smoke-test client for MUD servers
//!
//! Connects to a server, sends a fixed time-delayed sequence of text
//! commands, logs everything it sees, and closes the connection.

pub mod config;
pub mod error;
pub mod event;
pub mod script;
pub mod session;

pub use config::Config;
pub use error::SessionError;
pub use event::{ErrorKind, SessionEvent, Transcript};
pub use script::{Action, Script, Step};
pub use session::Session;
