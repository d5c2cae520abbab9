//! Session events and the transcript that records them
//!
//! The transport's open/message/error/close callbacks are modelled as a
//! closed set of tagged variants dispatched by pattern matching. The
//! `Transcript` is the ordered record of one session, and what the
//! integration tests assert against.

/// Classification of a recorded error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection or handshake failure
    Connect,
    /// Outbound send failure
    Send,
    /// Mid-stream transport failure
    Transport,
}

/// One observed lifecycle or traffic event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Handshake completed
    Open,
    /// Inbound text frame
    Received(String),
    /// Outbound text frame accepted by the transport
    Sent(String),
    /// The delayed script steps were armed (fires at most once per session)
    ScriptArmed,
    /// A failure was observed and logged
    Error(ErrorKind, String),
    /// The connection reached its terminal closed state
    Closed,
}

/// Ordered record of everything one session observed
#[derive(Debug, Default)]
pub struct Transcript {
    events: Vec<SessionEvent>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn record(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// All events, in the order they occurred
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Whether the handshake completed
    pub fn opened(&self) -> bool {
        self.events.contains(&SessionEvent::Open)
    }

    /// Errors recorded, in order
    pub fn errors(&self) -> Vec<&SessionEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Error(_, _)))
            .collect()
    }

    /// Payloads of all outbound frames, in order
    pub fn sent(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Sent(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Payloads of all inbound frames, in order
    pub fn received(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Received(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Position of the terminal close event, if the session closed
    pub fn closed_at(&self) -> Option<usize> {
        self.events.iter().position(|e| *e == SessionEvent::Closed)
    }
}
