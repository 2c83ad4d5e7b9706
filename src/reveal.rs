//! Typewriter reveal
//!
//! Assistant replies are revealed character by character with a fixed
//! per-character delay. The presenter is a small state machine: `Idle`
//! while nothing is revealing, `Revealing` with the target message id and
//! the partial text while a reveal is in flight. Before each character the
//! presenter re-checks that its message is still the active target, so a
//! newer reveal supersedes an older one without interleaving output.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Reveal state for the active presenter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RevealState {
    /// No reveal in flight
    #[default]
    Idle,
    /// A message is being revealed
    Revealing {
        /// Id of the message being revealed
        message_id: String,
        /// Text revealed so far
        partial: String,
    },
}

/// Destination for revealed characters
pub trait RevealSink {
    /// Emit the next revealed chunk
    fn emit(&mut self, chunk: &str);
}

/// Sink that writes straight to stdout, flushing per character
pub struct TerminalSink;

impl RevealSink for TerminalSink {
    fn emit(&mut self, chunk: &str) {
        print!("{}", chunk);
        let _ = std::io::stdout().flush();
    }
}

/// Character-by-character reveal of assistant replies
///
/// Clone-cheap handle over shared state; clones observe and supersede each
/// other's reveals.
#[derive(Clone)]
pub struct TypingPresenter {
    delay: Duration,
    state: Arc<Mutex<RevealState>>,
}

impl TypingPresenter {
    /// Create a presenter with the given per-character delay
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            state: Arc::new(Mutex::new(RevealState::Idle)),
        }
    }

    /// Current reveal state
    pub fn state(&self) -> RevealState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    /// Reveal `text` for `message_id`, one character at a time
    ///
    /// Claims the presenter as the active reveal target, then emits one
    /// character per delay tick as long as the claim holds. Returns `true`
    /// when the full text was revealed and `false` when a newer reveal
    /// superseded this one mid-string.
    pub async fn reveal<S: RevealSink>(&self, message_id: &str, text: &str, sink: &mut S) -> bool {
        self.set_state(RevealState::Revealing {
            message_id: message_id.to_string(),
            partial: String::new(),
        });

        for ch in text.chars() {
            tokio::time::sleep(self.delay).await;
            if !self.push_char(message_id, ch) {
                tracing::debug!("Reveal of {} superseded", message_id);
                return false;
            }
            let mut buf = [0u8; 4];
            sink.emit(ch.encode_utf8(&mut buf));
        }

        self.finish(message_id)
    }

    /// Append a character to the partial text if this reveal still owns the
    /// presenter
    fn push_char(&self, message_id: &str, ch: char) -> bool {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return false,
        };
        match &mut *state {
            RevealState::Revealing {
                message_id: active,
                partial,
            } if active == message_id => {
                partial.push(ch);
                true
            }
            _ => false,
        }
    }

    /// Return to idle if this reveal still owns the presenter
    fn finish(&self, message_id: &str) -> bool {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return false,
        };
        match &*state {
            RevealState::Revealing { message_id: active, .. } if active == message_id => {
                *state = RevealState::Idle;
                true
            }
            _ => false,
        }
    }

    fn set_state(&self, next: RevealState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }
}
