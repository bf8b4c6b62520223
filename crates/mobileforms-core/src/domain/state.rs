//! Bridge lifecycle state machine and its serializable snapshot.
//!
//! # Phases
//!
//! ```text
//!  ┌──────────────┐ set_form_definition ┌────────────┐ begin_load ┌─────────┐ on_peer_ready ┌───────┐
//!  │ Unconfigured │────────────────────►│ Configured │───────────►│ Loading │──────────────►│ Ready │
//!  └──────────────┘                     └────────────┘            └─────────┘◄──────────────└───────┘
//!                                             ▲                                    reload
//!                                             │ restore (from any phase)
//! ```
//!
//! - `begin_load` from `Unconfigured` fails: there is nothing to load.
//! - `begin_load` while `Loading`/`Ready` is an idempotent no-op.
//! - `on_peer_ready` outside `Loading` is ignored, so a duplicate readiness
//!   signal never re-injects the form definition or re-flushes the queue.
//!
//! # Readiness sequence
//!
//! Entering `Ready` yields, in order:
//!
//! 1. `setJsonForm(<definition>)`
//! 2. `setJsonPopulateData(<data>)`, only if populate data is set
//! 3. `init()`
//! 4. everything [`CommandQueue::flush`] returns
//!
//! The phase flips to `Ready` only after that list is complete, inside the
//! same `&mut self` call; no command can slip in between.
//!
//! # Snapshot / restore
//!
//! [`BridgeSnapshot`] is the only I/O boundary of the machine.  It captures
//! the definition, populate data, read-only flag and both queue lists
//! verbatim, plus whether a load had been requested.  Restoring puts the
//! machine back in `Configured` and re-issues the read-only command through
//! the ordinary [`BridgeStateMachine::set_read_only`] path, so peer and state
//! agree again once `Ready` is reached.  [`BridgeStateMachine::reload`] does
//! the same, since a fresh shell document starts editable.
//!
//! Snapshots carry the [`PROTOCOL_VERSION`] they were written with; restoring
//! a blob from another version logs a warning and proceeds.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::queue::CommandQueue;
use crate::protocol::command::{Command, PROTOCOL_VERSION};

/// Lifecycle phase of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No form definition yet.
    Unconfigured,
    /// Definition set; the peer has not been told to load the shell.
    Configured,
    /// The peer is loading the shell document.
    Loading,
    /// The shell finished loading and the form was initialised.
    Ready,
}

/// Configuration failures.  Reported, never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// An empty form definition was supplied.
    #[error("form definition is empty")]
    EmptyDefinition,

    /// A load was requested before any form definition was set.
    #[error("form definition is not set; set a form before loading")]
    MissingDefinition,
}

/// Errors encoding or decoding a [`BridgeSnapshot`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode bridge snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode bridge snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result of a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The caller must now instruct the peer to fetch the shell document.
    Started,
    /// A load is already in flight or complete; nothing to do.
    AlreadyRequested,
}

fn default_true() -> bool {
    true
}

fn default_protocol_version() -> u32 {
    PROTOCOL_VERSION
}

/// Flat, serializable copy of the bridge state.
///
/// Used only across a full teardown/recreate cycle.  The host persists the
/// JSON produced by [`BridgeSnapshot::to_json`] opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSnapshot {
    #[serde(default)]
    pub form_definition: Option<String>,
    #[serde(default)]
    pub populate_data: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub pending: Vec<Command>,
    #[serde(default)]
    pub restorable: Vec<Command>,
    /// Whether the host had asked for the form to be loaded.  Blobs written
    /// without this field restore with a load.
    #[serde(default = "default_true")]
    pub load_requested: bool,
    /// Command protocol the queued commands were built for.  Blobs written
    /// without this field are taken to be current.
    #[serde(default = "default_protocol_version")]
    pub protocol_version: u32,
}

impl BridgeSnapshot {
    /// Encodes the snapshot as a JSON blob.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(SnapshotError::Encode)
    }

    /// Decodes a blob previously produced by [`BridgeSnapshot::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Decode`] if `json` is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(SnapshotError::Decode)
    }
}

/// Owner of all bridge state and the only component that changes the phase.
#[derive(Debug, Clone)]
pub struct BridgeStateMachine {
    form_definition: Option<String>,
    populate_data: Option<String>,
    read_only: bool,
    queue: CommandQueue,
    phase: Phase,
    load_requested: bool,
}

impl Default for BridgeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeStateMachine {
    pub fn new() -> Self {
        Self {
            form_definition: None,
            populate_data: None,
            read_only: false,
            queue: CommandQueue::new(),
            phase: Phase::Unconfigured,
            load_requested: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn form_definition(&self) -> Option<&str> {
        self.form_definition.as_deref()
    }

    pub fn populate_data(&self) -> Option<&str> {
        self.populate_data.as_deref()
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// `true` once a load has been asked for, even if it failed.
    pub fn load_requested(&self) -> bool {
        self.load_requested
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    /// Stores the form definition and leaves `Unconfigured`.
    ///
    /// Setting it after a load was requested is allowed but only takes effect
    /// on the next load of the shell; a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::EmptyDefinition`] for a blank definition; the
    /// state is left untouched.
    pub fn set_form_definition(&mut self, definition: String) -> Result<(), StateError> {
        if definition.trim().is_empty() {
            return Err(StateError::EmptyDefinition);
        }
        if self.load_requested {
            warn!("form definition set after load was requested; it applies on the next load");
        }
        self.form_definition = Some(definition);
        if self.phase == Phase::Unconfigured {
            self.phase = Phase::Configured;
        }
        Ok(())
    }

    /// Stores the initial populate data applied during initialisation.
    pub fn set_populate_data(&mut self, data: String) {
        if self.load_requested {
            warn!("populate data set after load was requested; it applies on the next load");
        }
        self.populate_data = Some(data);
    }

    /// Replaces the cached populate data with the values last reported by the
    /// peer, so a restore repopulates the form with what the user saw.
    pub fn record_current_values(&mut self, data: String) {
        self.populate_data = Some(data);
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    /// `Configured → Loading`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::MissingDefinition`] from `Unconfigured`.
    pub fn begin_load(&mut self) -> Result<LoadOutcome, StateError> {
        self.load_requested = true;
        match self.phase {
            Phase::Unconfigured => Err(StateError::MissingDefinition),
            Phase::Configured => {
                self.phase = Phase::Loading;
                info!("bridge phase: configured → loading");
                Ok(LoadOutcome::Started)
            }
            Phase::Loading | Phase::Ready => {
                debug!(phase = ?self.phase, "load already requested; ignoring");
                Ok(LoadOutcome::AlreadyRequested)
            }
        }
    }

    /// Re-enters `Loading` so the next readiness signal replays everything.
    ///
    /// Used when the shell document must be fetched again (the peer discards
    /// all script state on a full navigation).  From `Configured` this is the
    /// same as [`begin_load`](Self::begin_load).
    ///
    /// # Errors
    ///
    /// Returns [`StateError::MissingDefinition`] from `Unconfigured`.
    pub fn reload(&mut self) -> Result<LoadOutcome, StateError> {
        match self.phase {
            Phase::Loading | Phase::Ready => {
                info!(from = ?self.phase, "bridge phase: reloading shell");
                self.phase = Phase::Loading;
                self.load_requested = true;
                // The new shell document starts editable.
                self.requeue_read_only();
                Ok(LoadOutcome::Started)
            }
            Phase::Unconfigured | Phase::Configured => self.begin_load(),
        }
    }

    /// `Loading → Ready`.  Returns every command to inject, in order.
    ///
    /// Outside `Loading` the signal is ignored and the list is empty.
    pub fn on_peer_ready(&mut self) -> Vec<Command> {
        if self.phase != Phase::Loading {
            debug!(phase = ?self.phase, "peer readiness ignored");
            return Vec::new();
        }
        let Some(definition) = self.form_definition.as_deref() else {
            warn!("peer became ready without a form definition");
            return Vec::new();
        };

        let mut commands = vec![Command::set_json_form(definition)];
        if let Some(data) = self.populate_data.as_deref() {
            commands.push(Command::set_json_populate_data(data));
        }
        commands.push(Command::init());
        commands.extend(self.queue.flush());

        self.phase = Phase::Ready;
        info!(commands = commands.len(), "bridge phase: loading → ready");
        commands
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// Routes `cmd` through the queue.  Returns it when it may be injected now.
    pub fn enqueue(&mut self, cmd: Command) -> Option<Command> {
        let ready = self.phase == Phase::Ready;
        self.queue.enqueue(cmd, ready)
    }

    /// Records the read-only flag and queues the matching command.
    pub fn set_read_only(&mut self, read_only: bool) -> Option<Command> {
        self.read_only = read_only;
        self.enqueue(Command::set_read_only(read_only))
    }

    // ── Snapshot ──────────────────────────────────────────────────────────────

    /// Captures the state verbatim.  Valid in any phase.
    pub fn snapshot(&self) -> BridgeSnapshot {
        BridgeSnapshot {
            form_definition: self.form_definition.clone(),
            populate_data: self.populate_data.clone(),
            read_only: self.read_only,
            pending: self.queue.pending().to_vec(),
            restorable: self.queue.restorable().to_vec(),
            load_requested: self.load_requested,
            protocol_version: PROTOCOL_VERSION,
        }
    }

    /// Replaces the whole state with `snapshot`.
    ///
    /// The machine lands in `Configured` (or `Unconfigured` when the snapshot
    /// has no usable definition).  Returns `true` when the snapshot says a
    /// load had been requested and the caller should request it again.
    pub fn restore(&mut self, snapshot: BridgeSnapshot) -> bool {
        let BridgeSnapshot {
            form_definition,
            populate_data,
            read_only,
            pending,
            restorable,
            load_requested,
            protocol_version,
        } = snapshot;

        if protocol_version != PROTOCOL_VERSION {
            warn!(
                snapshot = protocol_version,
                current = PROTOCOL_VERSION,
                "restoring snapshot written for another command protocol version"
            );
        }

        self.form_definition = form_definition.filter(|d| !d.trim().is_empty());
        self.populate_data = populate_data;
        self.queue = CommandQueue::from_parts(pending, restorable);
        self.load_requested = false;
        self.phase = if self.form_definition.is_some() {
            Phase::Configured
        } else {
            Phase::Unconfigured
        };
        info!(phase = ?self.phase, load_requested, "bridge state restored");

        self.read_only = read_only;
        self.requeue_read_only();
        load_requested
    }

    /// Queues the current read-only flag for the next readiness, unless it is
    /// already the last pending command.
    fn requeue_read_only(&mut self) {
        let cmd = Command::set_read_only(self.read_only);
        if self.queue.pending().last() == Some(&cmd) {
            return;
        }
        // Not ready, so this lands in `pending` and is replayed on readiness.
        self.enqueue(cmd);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"{"fields":[]}"#;

    fn loading_machine() -> BridgeStateMachine {
        let mut sm = BridgeStateMachine::new();
        sm.set_form_definition(FORM.to_string()).unwrap();
        assert_eq!(sm.begin_load(), Ok(LoadOutcome::Started));
        sm
    }

    fn scripts(commands: &[Command]) -> Vec<&str> {
        commands.iter().map(Command::script).collect()
    }

    #[test]
    fn test_new_machine_is_unconfigured() {
        let sm = BridgeStateMachine::new();
        assert_eq!(sm.phase(), Phase::Unconfigured);
        assert!(!sm.load_requested());
    }

    #[test]
    fn test_set_form_definition_moves_to_configured() {
        let mut sm = BridgeStateMachine::new();
        sm.set_form_definition(FORM.to_string()).unwrap();
        assert_eq!(sm.phase(), Phase::Configured);
        assert_eq!(sm.form_definition(), Some(FORM));
    }

    #[test]
    fn test_empty_definition_is_rejected_and_state_unchanged() {
        let mut sm = BridgeStateMachine::new();

        let result = sm.set_form_definition("   ".to_string());

        assert_eq!(result, Err(StateError::EmptyDefinition));
        assert_eq!(sm.phase(), Phase::Unconfigured);
        assert!(sm.form_definition().is_none());
    }

    #[test]
    fn test_begin_load_without_definition_fails() {
        let mut sm = BridgeStateMachine::new();
        assert_eq!(sm.begin_load(), Err(StateError::MissingDefinition));
        assert_eq!(sm.phase(), Phase::Unconfigured);
    }

    #[test]
    fn test_begin_load_twice_starts_once() {
        let mut sm = loading_machine();

        let second = sm.begin_load();

        assert_eq!(second, Ok(LoadOutcome::AlreadyRequested));
        assert_eq!(sm.phase(), Phase::Loading);
    }

    #[test]
    fn test_ready_sequence_without_populate_data() {
        let mut sm = loading_machine();

        let commands = sm.on_peer_ready();

        assert_eq!(scripts(&commands), vec![r#"setJsonForm({"fields":[]})"#, "init()"]);
        assert_eq!(sm.phase(), Phase::Ready);
    }

    #[test]
    fn test_ready_sequence_with_populate_data_and_pending() {
        // Arrange
        let mut sm = BridgeStateMachine::new();
        sm.set_form_definition(FORM.to_string()).unwrap();
        sm.set_populate_data(r#"{"a":1}"#.to_string());
        assert!(sm.set_read_only(true).is_none());
        sm.begin_load().unwrap();

        // Act
        let commands = sm.on_peer_ready();

        // Assert
        assert_eq!(
            scripts(&commands),
            vec![
                r#"setJsonForm({"fields":[]})"#,
                r#"setJsonPopulateData({"a":1})"#,
                "init()",
                "setReadOnly(true)",
            ]
        );
    }

    #[test]
    fn test_second_peer_ready_is_ignored() {
        let mut sm = loading_machine();
        sm.enqueue(Command::add_css("a{}", false));
        assert!(!sm.on_peer_ready().is_empty());

        assert!(sm.on_peer_ready().is_empty());
        assert_eq!(sm.phase(), Phase::Ready);
    }

    #[test]
    fn test_peer_ready_before_load_is_ignored() {
        let mut sm = BridgeStateMachine::new();
        sm.set_form_definition(FORM.to_string()).unwrap();

        assert!(sm.on_peer_ready().is_empty());
        assert_eq!(sm.phase(), Phase::Configured);
    }

    #[test]
    fn test_enqueue_is_immediate_only_when_ready() {
        let mut sm = loading_machine();
        assert!(sm.enqueue(Command::get_form_data()).is_none());

        sm.on_peer_ready();

        assert_eq!(sm.enqueue(Command::get_form_data()), Some(Command::get_form_data()));
    }

    #[test]
    fn test_reload_replays_restorable_commands() {
        // Arrange: a ready bridge with one durable customization
        let mut sm = loading_machine();
        sm.enqueue(Command::add_js("x()"));
        sm.on_peer_ready();

        // Act
        assert_eq!(sm.reload(), Ok(LoadOutcome::Started));
        let commands = sm.on_peer_ready();

        // Assert
        assert_eq!(commands.last(), Some(&Command::add_js("x()")));
        assert_eq!(commands.iter().filter(|c| c.is_restorable()).count(), 1);
    }

    #[test]
    fn test_reload_replays_read_only_mode() {
        // Arrange: read-only applied live, so it is no longer pending
        let mut sm = loading_machine();
        sm.on_peer_ready();
        assert_eq!(sm.set_read_only(true), Some(Command::set_read_only(true)));

        // Act
        sm.reload().unwrap();
        let commands = sm.on_peer_ready();

        // Assert
        assert_eq!(
            commands,
            vec![
                Command::set_json_form(FORM),
                Command::init(),
                Command::set_read_only(true),
            ]
        );
        assert!(sm.read_only());
    }

    #[test]
    fn test_reload_while_loading_does_not_duplicate_read_only() {
        let mut sm = loading_machine();
        sm.on_peer_ready();
        sm.reload().unwrap();

        sm.reload().unwrap();

        assert_eq!(sm.queue().pending(), &[Command::set_read_only(false)]);
    }

    #[test]
    fn test_repeated_restore_before_ready_keeps_one_read_only_command() {
        // Arrange
        let mut sm = loading_machine();
        sm.set_read_only(true);

        // Act: several teardowns before the peer ever becomes ready
        for _ in 0..5 {
            let snap = sm.snapshot();
            sm = BridgeStateMachine::new();
            sm.restore(snap);
        }

        // Assert
        assert_eq!(sm.queue().pending(), &[Command::set_read_only(true)]);
    }

    #[test]
    fn test_snapshot_records_protocol_version() {
        let snap = loading_machine().snapshot();
        assert_eq!(snap.protocol_version, PROTOCOL_VERSION);

        let legacy = BridgeSnapshot::from_json(r#"{"form_definition":"{}"}"#).unwrap();
        assert_eq!(legacy.protocol_version, PROTOCOL_VERSION);
    }

    #[test]
    fn test_restore_of_other_protocol_version_still_restores() {
        let mut snap = loading_machine().snapshot();
        snap.protocol_version = PROTOCOL_VERSION + 1;

        let mut sm = BridgeStateMachine::new();
        assert!(sm.restore(snap));

        assert_eq!(sm.phase(), Phase::Configured);
        assert_eq!(sm.form_definition(), Some(FORM));
    }

    #[test]
    fn test_reload_without_definition_fails() {
        let mut sm = BridgeStateMachine::new();
        assert_eq!(sm.reload(), Err(StateError::MissingDefinition));
    }

    #[test]
    fn test_record_current_values_replaces_populate_data() {
        let mut sm = loading_machine();
        sm.on_peer_ready();

        sm.record_current_values(r#"{"name":"Ada"}"#.to_string());

        assert_eq!(sm.populate_data(), Some(r#"{"name":"Ada"}"#));
    }

    #[test]
    fn test_snapshot_captures_fields_verbatim() {
        let mut sm = BridgeStateMachine::new();
        sm.set_form_definition(FORM.to_string()).unwrap();
        sm.set_populate_data("{}".to_string());
        sm.set_read_only(true);
        sm.enqueue(Command::add_css("a{}", true));

        let snap = sm.snapshot();

        assert_eq!(snap.form_definition.as_deref(), Some(FORM));
        assert_eq!(snap.populate_data.as_deref(), Some("{}"));
        assert!(snap.read_only);
        assert_eq!(
            snap.pending,
            vec![Command::set_read_only(true), Command::add_css("a{}", true)]
        );
        assert_eq!(snap.restorable, vec![Command::add_css("a{}", true)]);
        assert!(!snap.load_requested);
    }

    #[test]
    fn test_restore_lands_in_configured_and_requeues_read_only() {
        // Arrange: snapshot of a ready, read-only bridge
        let mut original = loading_machine();
        original.set_read_only(true);
        original.on_peer_ready();
        let snap = original.snapshot();

        // Act
        let mut restored = BridgeStateMachine::new();
        let should_load = restored.restore(snap);

        // Assert
        assert!(should_load);
        assert_eq!(restored.phase(), Phase::Configured);
        assert!(restored.read_only());
        assert_eq!(restored.queue().pending(), &[Command::set_read_only(true)]);
    }

    #[test]
    fn test_restore_without_definition_is_unconfigured() {
        let mut sm = BridgeStateMachine::new();
        let snap = BridgeSnapshot {
            form_definition: None,
            populate_data: None,
            read_only: false,
            pending: vec![],
            restorable: vec![],
            load_requested: true,
            protocol_version: PROTOCOL_VERSION,
        };

        assert!(sm.restore(snap));
        assert_eq!(sm.phase(), Phase::Unconfigured);
        assert_eq!(sm.begin_load(), Err(StateError::MissingDefinition));
    }

    #[test]
    fn test_snapshot_json_round_trip_and_defaults() {
        let mut sm = loading_machine();
        sm.enqueue(Command::add_js("y()"));
        let snap = sm.snapshot();

        let decoded = BridgeSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(decoded, snap);

        // Older blobs without `load_requested` restore with a load.
        let legacy = BridgeSnapshot::from_json(r#"{"form_definition":"{}"}"#).unwrap();
        assert!(legacy.load_requested);
        assert!(legacy.pending.is_empty());
    }

    #[test]
    fn test_snapshot_decode_error() {
        let err = BridgeSnapshot::from_json("not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
    }
}
