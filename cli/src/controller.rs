//! Chat state controller with a single-flight gate.
//!
//! `submit` either drops the input or starts exactly one exchange with the
//! relay. While that exchange is outstanding the gate is `Awaiting` and every
//! further submission is discarded, so the rendered order always matches the
//! order of accepted submissions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, warn};
use nittany_core::{ChatMessage, RequestEnvelope};
use tokio::task::JoinHandle;

use crate::relay_client::{ExchangeError, RelayReply, RelayTransport};
use crate::render::{Entry, Suggestions, Transcript};

/// Shown instead of the real error whenever an exchange fails
pub const APOLOGY_TEXT: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Idle,
    Awaiting,
}

#[derive(Debug)]
struct ChatState {
    gate: Gate,
    input_enabled: bool,
    transcript: Transcript,
    suggestions: Suggestions,
}

/// Point-in-time copy of what the UI should show
#[derive(Debug, Clone)]
pub struct ChatView {
    pub gate: Gate,
    pub input_enabled: bool,
    pub suggestions_visible: bool,
    pub entries: Vec<Entry>,
}

impl ChatView {
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(message) => Some(message),
            Entry::Pending => None,
        })
    }
}

fn lock(state: &Mutex<ChatState>) -> MutexGuard<'_, ChatState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ChatController {
    state: Arc<Mutex<ChatState>>,
    transport: Arc<dyn RelayTransport>,
}

impl ChatController {
    pub fn new(transport: Arc<dyn RelayTransport>, suggestions: Suggestions) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChatState {
                gate: Gate::Idle,
                input_enabled: true,
                transcript: Transcript::new(),
                suggestions,
            })),
            transport,
        }
    }

    /// Starts one exchange, or returns `None` when the text is blank or a
    /// reply is still outstanding. Must be called from within a tokio runtime.
    pub fn submit(&self, text: &str) -> Option<JoinHandle<()>> {
        let Some(envelope) = RequestEnvelope::new(text) else {
            debug!("Ignoring blank submission");
            return None;
        };

        {
            let mut state = lock(&self.state);
            if state.gate == Gate::Awaiting {
                debug!("Dropping submission while a reply is outstanding");
                return None;
            }

            state.suggestions.hide();
            state.gate = Gate::Awaiting;
            state.input_enabled = false;
            state.transcript.push(ChatMessage::user(text));
            state.transcript.show_pending();
        }

        let guard = GateGuard {
            state: Arc::clone(&self.state),
            settled: false,
        };
        let transport = Arc::clone(&self.transport);

        Some(tokio::spawn(async move {
            let outcome = transport.send(&envelope).await;
            guard.settle(outcome);
        }))
    }

    /// Resolves `/N` to the N-th visible suggestion, anything else to itself
    pub fn resolve_input(&self, input: &str) -> String {
        let state = lock(&self.state);
        input
            .trim()
            .strip_prefix('/')
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| state.suggestions.pick(n))
            .map(str::to_string)
            .unwrap_or_else(|| input.to_string())
    }

    pub fn suggestions(&self) -> Suggestions {
        lock(&self.state).suggestions.clone()
    }

    pub fn gate(&self) -> Gate {
        lock(&self.state).gate
    }

    pub fn view(&self) -> ChatView {
        let state = lock(&self.state);
        ChatView {
            gate: state.gate,
            input_enabled: state.input_enabled,
            suggestions_visible: state.suggestions.is_visible(),
            entries: state.transcript.entries().to_vec(),
        }
    }
}

/// Holds the gate for one exchange and releases it on drop, whichever way the
/// exchange task ends.
struct GateGuard {
    state: Arc<Mutex<ChatState>>,
    settled: bool,
}

impl GateGuard {
    fn settle(mut self, outcome: Result<RelayReply, ExchangeError>) {
        let mut state = lock(&self.state);
        state.transcript.clear_pending();

        match outcome {
            Ok(reply) => {
                debug!("Relay replied using model {}", reply.model);
                state.transcript.push(ChatMessage::assistant(reply.reply));
            }
            Err(e) => {
                error!("Error: {}", e);
                state.transcript.push(ChatMessage::assistant(APOLOGY_TEXT));
            }
        }
        drop(state);
        self.settled = true;
    }
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        if !self.settled {
            warn!("Exchange ended without a result");
            state.transcript.clear_pending();
            state.transcript.push(ChatMessage::assistant(APOLOGY_TEXT));
        }
        state.gate = Gate::Idle;
        state.input_enabled = true;
    }
}
