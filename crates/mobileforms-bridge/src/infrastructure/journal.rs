//! Ordered record of peer traffic and listener callbacks.
//!
//! A [`RecordingPeer`](super::RecordingPeer) and a
//! [`RecordingListener`](super::RecordingListener) built over the same
//! [`Journal`] interleave their entries in the exact order the bridge
//! produced them, which is what ordering checks (e.g. "the values refresh is
//! injected before the focus event reaches the listener") need.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use mobileforms_core::FormEvent;

/// A listener callback as it was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerCall {
    Submit(String),
    Values(String),
    Event(FormEvent),
    Errors(String),
    Validity(bool),
}

/// One recorded effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    /// `FormPeer::load_shell(url)`.
    LoadShell(String),
    /// `FormPeer::inject(script)`.
    Inject(String),
    /// A `FormListener` callback.
    Callback(ListenerCall),
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalEntry::LoadShell(url) => write!(f, "load  {url}"),
            JournalEntry::Inject(script) => write!(f, "exec  {script}"),
            JournalEntry::Callback(call) => match call {
                ListenerCall::Submit(data) => write!(f, "call  on_submit {data}"),
                ListenerCall::Values(data) => write!(f, "call  on_values {data}"),
                ListenerCall::Event(e) => write!(
                    f,
                    "call  on_event {} element={:?} value={:?}",
                    e.kind, e.element, e.value
                ),
                ListenerCall::Errors(errors) => write!(f, "call  on_errors {errors}"),
                ListenerCall::Validity(valid) => write!(f, "call  on_validity_checked {valid}"),
            },
        }
    }
}

/// Thread-safe append-only log shared between recorders.
#[derive(Debug, Default)]
pub struct Journal {
    entries: Mutex<Vec<JournalEntry>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: JournalEntry) {
        self.lock().push(entry);
    }

    /// Every entry so far, in order.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.lock().clone()
    }

    /// Only the injected scripts, in order.
    pub fn injected(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                JournalEntry::Inject(script) => Some(script.clone()),
                _ => None,
            })
            .collect()
    }

    /// Only the listener callbacks, in order.
    pub fn callbacks(&self) -> Vec<ListenerCall> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                JournalEntry::Callback(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of shell document loads.
    pub fn shell_loads(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, JournalEntry::LoadShell(_)))
            .count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A recorder that panicked mid-push leaves a valid Vec behind.
    fn lock(&self) -> MutexGuard<'_, Vec<JournalEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
