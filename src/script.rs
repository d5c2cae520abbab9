//! The scripted sequence of delayed actions
//!
//! A `Script` is an ordered list of `(delay, action)` steps. Delays are
//! relative to the moment the script is armed (the first inbound message),
//! and steps always fire in ascending delay order. Arming converts the
//! steps into `ScheduledAction`s with absolute deadlines; dropping the
//! armed queue cancels whatever has not fired yet.

use std::time::Duration;

use tokio::time::Instant;

/// One scripted outbound action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send a text frame
    Send(String),
    /// Initiate the close handshake
    Close,
}

/// A delayed step in the script
#[derive(Debug, Clone)]
pub struct Step {
    /// Delay relative to arming
    pub delay: Duration,
    /// What to do when the delay elapses
    pub action: Action,
}

impl Step {
    pub fn send(delay: Duration, text: &str) -> Self {
        Self {
            delay,
            action: Action::Send(text.to_string()),
        }
    }

    pub fn close(delay: Duration) -> Self {
        Self {
            delay,
            action: Action::Close,
        }
    }
}

/// An ordered sequence of delayed steps
#[derive(Debug, Clone)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Build a script from steps, sorting them into firing order
    pub fn new(mut steps: Vec<Step>) -> Self {
        steps.sort_by_key(|s| s.delay);
        Self { steps }
    }

    /// The fixed smoke-test sequence: `/say`, then `/witness`, then close
    pub fn smoke_test() -> Self {
        Self::new(vec![
            Step::send(Duration::from_millis(500), "/say Hello from Node.js!"),
            Step::send(Duration::from_millis(1000), "/witness"),
            Step::close(Duration::from_millis(2000)),
        ])
    }

    /// Steps in firing order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Convert the steps into absolute deadlines measured from `now`
    pub fn arm(&self, now: Instant) -> Vec<ScheduledAction> {
        self.steps
            .iter()
            .map(|step| ScheduledAction {
                fire_at: now + step.delay,
                action: step.action.clone(),
            })
            .collect()
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::smoke_test()
    }
}

/// A step armed against an absolute deadline
#[derive(Debug, Clone)]
pub struct ScheduledAction {
    /// When this action should fire
    pub fire_at: Instant,
    /// What to do
    pub action: Action,
}
