//! The probe session: one connection, one scripted run
//!
//! A single `select!` loop multiplexes the WebSocket stream with the next
//! scheduled deadline. The delayed script steps are armed exactly once, on
//! the first inbound message; closing the connection before a step fires
//! cancels it. Every failure is logged and recorded, never retried, never
//! fatal to the host process.

use std::collections::VecDeque;

use futures_util::{SinkExt, StreamExt};
use tokio::time::{sleep_until, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::SessionError;
use crate::event::{SessionEvent, Transcript};
use crate::script::{Action, ScheduledAction, Script};

/// One scripted probe session against a WebSocket endpoint
pub struct Session {
    config: Config,
    script: Script,
}

impl Session {
    /// Create a session for the given endpoint and script
    pub fn new(config: Config, script: Script) -> Self {
        Self { config, script }
    }

    /// Drive the session to its terminal state and return the transcript
    ///
    /// Connection failure is not an error at this level: it is recorded in
    /// the transcript as an error event followed by the terminal close.
    pub async fn run(&self) -> Transcript {
        let mut transcript = Transcript::new();

        info!(url = %self.config.url, "connecting");
        let ws = match connect_async(self.config.url.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(e) => {
                let err = SessionError::Connect(e);
                warn!("{err}");
                transcript.record(SessionEvent::Error(err.kind(), err.to_string()));
                transcript.record(SessionEvent::Closed);
                info!("connection closed");
                return transcript;
            }
        };

        info!("connected to server");
        transcript.record(SessionEvent::Open);

        let (mut write, mut read) = ws.split();

        // Opening probe: an empty frame elicits the server's first response
        match write.send(Message::Text("".into())).await {
            Ok(()) => transcript.record(SessionEvent::Sent(String::new())),
            Err(e) => {
                let err = SessionError::Send(e);
                warn!("{err}");
                transcript.record(SessionEvent::Error(err.kind(), err.to_string()));
            }
        }

        let mut pending: VecDeque<ScheduledAction> = VecDeque::new();
        let mut armed = false;
        let idle_deadline = Instant::now() + self.config.idle_timeout();

        loop {
            // Next wakeup: the front of the armed queue, or the idle
            // deadline while still waiting for the first message. Once the
            // queue drains we only wait for the close handshake to finish.
            let deadline = match pending.front() {
                Some(next) => Some(next.fire_at),
                None if !armed => Some(idle_deadline),
                None => None,
            };

            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        info!(payload = %text, "received");
                        transcript.record(SessionEvent::Received(text.as_str().to_string()));
                        if !armed {
                            if let Some(uuid) = extract_uuid(text.as_str()) {
                                info!(%uuid, "session uuid");
                            }
                            armed = true;
                            pending = self.script.arm(Instant::now()).into();
                            transcript.record(SessionEvent::ScriptArmed);
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("connection closed");
                        transcript.record(SessionEvent::Closed);
                        break;
                    }
                    Some(Ok(_)) => {} // Skip binary/ping/pong frames
                    Some(Err(e)) => {
                        let err = SessionError::Transport(e);
                        warn!("{err}");
                        transcript.record(SessionEvent::Error(err.kind(), err.to_string()));
                        transcript.record(SessionEvent::Closed);
                        break;
                    }
                },
                _ = sleep_to(deadline) => match pending.pop_front() {
                    Some(ScheduledAction { action: Action::Send(text), .. }) => {
                        info!(payload = %text, "sending scripted command");
                        match write.send(Message::Text(text.as_str().into())).await {
                            Ok(()) => transcript.record(SessionEvent::Sent(text)),
                            Err(e) => {
                                let err = SessionError::Send(e);
                                warn!("{err}");
                                transcript.record(SessionEvent::Error(err.kind(), err.to_string()));
                            }
                        }
                    }
                    Some(ScheduledAction { action: Action::Close, .. }) => {
                        info!("closing connection");
                        if let Err(e) = write.close().await {
                            let err = SessionError::Send(e);
                            warn!("{err}");
                            transcript.record(SessionEvent::Error(err.kind(), err.to_string()));
                        }
                        // Terminal close is recorded when the stream ends
                    }
                    None => {
                        // Idle deadline: no message ever arrived, so the
                        // script never armed. Close unilaterally.
                        info!(
                            timeout_ms = self.config.idle_timeout_ms,
                            "no message within idle timeout, closing"
                        );
                        armed = true;
                        if let Err(e) = write.close().await {
                            let err = SessionError::Send(e);
                            warn!("{err}");
                            transcript.record(SessionEvent::Error(err.kind(), err.to_string()));
                        }
                    }
                },
            }
        }

        transcript
    }
}

async fn sleep_to(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Pull a session UUID out of a welcome line like `... UUID: <uuid>, ...`
fn extract_uuid(text: &str) -> Option<Uuid> {
    let (_, rest) = text.split_once("UUID: ")?;
    let token = rest.split(',').next()?.trim();
    Uuid::parse_str(token).ok()
}
