//! Recorded peer sessions.
//!
//! A transcript is a JSON-lines file, one [`PeerEvent`] per line, describing
//! everything that reached the host during a session: signals from the peer
//! (shell ready, alerts, navigations), lifecycle events from the host
//! container (teardown) and host-side requests.  Blank lines and lines
//! starting with `#` are ignored.
//!
//! ```text
//! # one form session
//! {"type":"shell_ready"}
//! {"type":"request_values"}
//! {"type":"alert","message":"formData:{\"a\":1}"}
//! {"type":"navigate","url":"mobileforms://event?element=a&value=1&type=change"}
//! {"type":"teardown"}
//! {"type":"shell_ready"}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of a recorded session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeerEvent {
    /// The peer finished loading the shell document.
    ShellReady,
    /// The peer raised a blocking dialog with `message`.
    Alert { message: String },
    /// The peer attempted to navigate to `url`.
    Navigate { url: String },
    /// The host container destroyed and recreated the bridge.
    Teardown,
    /// The host asked for the shell to be loaded again.
    Reload,
    RequestValues,
    RequestValidatedSubmission,
    RequestErrors,
    RequestValidity,
    SetReadOnly { read_only: bool },
    PopulateAsync { data: String },
}

/// Error type for transcript parsing.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("transcript line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses a JSON-lines transcript.
///
/// # Errors
///
/// Returns [`TranscriptError::Line`] with the 1-based line number of the
/// first record that fails to decode.
pub fn parse_transcript(text: &str) -> Result<Vec<PeerEvent>, TranscriptError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| TranscriptError::Line {
                line: index + 1,
                source,
            })
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
