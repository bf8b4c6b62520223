//! # mobileforms-core
//!
//! Shared library for the MobileForms host bridge containing the command wire
//! format, the side-channel response decoder, the navigation classifier and
//! the replayable bridge state.
//!
//! It has zero dependencies on UI frameworks, rendering engines or I/O.
//!
//! # Architecture overview (for beginners)
//!
//! A MobileForms form is rendered by an embedded web engine (the *peer*).  The
//! host can only talk to the peer by injecting script strings, and the peer
//! can only answer in two indirect ways:
//!
//! - by raising an `alert()` whose text starts with a known tag, and
//! - by navigating to a private `mobileforms://event?...` URL.
//!
//! This crate is the pure half of that conversation:
//!
//! - **`protocol`** – How commands look on the wire ([`Command`]) and how
//!   tagged alert strings are decoded ([`TaggedResponse`]).
//!
//! - **`domain`** – Form events and the navigation classifier, plus the
//!   [`CommandQueue`] and [`BridgeStateMachine`] that decide *when* a command
//!   may reach the peer and how the whole bridge survives a teardown.
//!
//! Nothing here calls the peer.  Every operation returns the commands that
//! must be injected and leaves the actual injection to the caller.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `mobileforms_core::Command` instead of `mobileforms_core::protocol::command::Command`.
pub use domain::event::{FormEvent, FormEventKind};
pub use domain::navigation::{EventClassifier, ExternalIntent, IntentKind, NavigationDecision};
pub use domain::queue::CommandQueue;
pub use domain::state::{
    BridgeSnapshot, BridgeStateMachine, LoadOutcome, Phase, SnapshotError, StateError,
};
pub use protocol::command::{Command, CommandKind, PROTOCOL_VERSION};
pub use protocol::response::{ResponseTag, TaggedResponse};
