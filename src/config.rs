//! Runtime configuration

use std::time::Duration;

use clap::Parser;

/// Client configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "mudprobe", about = "Scripted WebSocket smoke-test client")]
pub struct Config {
    /// WebSocket endpoint to probe
    #[arg(long, default_value = "ws://localhost:3000")]
    pub url: String,

    /// Close the connection if no message arrives within this many
    /// milliseconds (the scripted sequence keys off the first inbound
    /// message, so a silent server would otherwise hold the session open)
    #[arg(long, default_value_t = 10_000)]
    pub idle_timeout_ms: u64,
}

impl Config {
    /// Idle deadline as a Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "ws://localhost:3000".to_string(),
            idle_timeout_ms: 10_000,
        }
    }
}
