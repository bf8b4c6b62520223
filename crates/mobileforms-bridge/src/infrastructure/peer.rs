//! In-memory peer.
//!
//! [`RecordingPeer`] stands in for the web engine: it performs nothing and
//! appends every call to a [`Journal`].  The replay harness drives it from a
//! transcript; tests use it to assert exactly what reached the peer.

use std::sync::Arc;

use tracing::debug;

use crate::application::ports::FormPeer;
use crate::infrastructure::journal::{Journal, JournalEntry};

/// A peer that records instead of executing.
#[derive(Debug, Default)]
pub struct RecordingPeer {
    journal: Arc<Journal>,
}

impl RecordingPeer {
    /// Creates a peer with its own empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a peer that records into a shared journal.
    pub fn with_journal(journal: Arc<Journal>) -> Self {
        Self { journal }
    }

    pub fn journal(&self) -> &Arc<Journal> {
        &self.journal
    }
}

impl FormPeer for RecordingPeer {
    fn load_shell(&self, url: &str) {
        debug!(url, "peer: load shell");
        self.journal.record(JournalEntry::LoadShell(url.to_owned()));
    }

    fn inject(&self, script: &str) {
        self.journal.record(JournalEntry::Inject(script.to_owned()));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
