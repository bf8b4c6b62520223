//! Readiness-gated command queue.
//!
//! The peer accepts commands only after its shell document has finished
//! loading, and it forgets every script-side customization whenever the shell
//! is loaded again.  [`CommandQueue`] keeps two ordered lists to cope with
//! both facts:
//!
//! - `pending` – commands issued before the peer was ready.  Consumed exactly
//!   once by [`CommandQueue::flush`], then cleared.
//! - `restorable` – durable customizations (stylesheets, user scripts).
//!   Never shrinks; re-applied in full by every flush.
//!
//! The queue never talks to the peer.  [`CommandQueue::enqueue`] and
//! [`CommandQueue::flush`] return the commands the caller must inject, in
//! order.
//!
//! # Flush order
//!
//! ```text
//! pending − restorable   (one-shot deltas, original order)
//! restorable             (durable state, original order)
//! ```
//!
//! A restorable command queued before readiness sits in both lists; removing
//! it from the first phase keeps it from being applied twice.  Durable state
//! goes last so it wins over any stale one-shot command.

use crate::protocol::command::Command;

/// Ordered outbound commands awaiting (or surviving) peer readiness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandQueue {
    pending: Vec<Command>,
    restorable: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a queue from previously captured lists, verbatim.
    pub fn from_parts(pending: Vec<Command>, restorable: Vec<Command>) -> Self {
        Self {
            pending,
            restorable,
        }
    }

    /// Accepts `cmd`.
    ///
    /// When `ready` is `true` the command is returned for immediate
    /// injection; otherwise it is buffered in `pending`.  Restorable commands
    /// are additionally recorded in `restorable` in both cases, so nothing is
    /// ever lost regardless of readiness.
    pub fn enqueue(&mut self, cmd: Command, ready: bool) -> Option<Command> {
        if cmd.is_restorable() {
            self.restorable.push(cmd.clone());
        }
        if ready {
            Some(cmd)
        } else {
            self.pending.push(cmd);
            None
        }
    }

    /// Drains `pending` and returns the full replay list (see module docs).
    pub fn flush(&mut self) -> Vec<Command> {
        let pending = std::mem::take(&mut self.pending);
        let mut to_apply: Vec<Command> = pending
            .into_iter()
            .filter(|cmd| !self.restorable.contains(cmd))
            .collect();
        to_apply.extend(self.restorable.iter().cloned());
        to_apply
    }

    pub fn pending(&self) -> &[Command] {
        &self.pending
    }

    pub fn restorable(&self) -> &[Command] {
        &self.restorable
    }

    /// Splits the queue into `(pending, restorable)`.
    pub fn into_parts(self) -> (Vec<Command>, Vec<Command>) {
        (self.pending, self.restorable)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
