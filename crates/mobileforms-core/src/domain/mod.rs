//! Domain layer: pure bridge logic with no I/O.
//!
//! - [`event`] – typed form events reported by the peer.
//! - [`navigation`] – decoding intercepted navigations into events, external
//!   intents, or pass-through decisions.
//! - [`queue`] – the readiness-gated, replayable command queue.
//! - [`state`] – the lifecycle state machine and its snapshot.

pub mod event;
pub mod navigation;
pub mod queue;
pub mod state;

pub use event::{FormEvent, FormEventKind};
pub use navigation::{EventClassifier, ExternalIntent, IntentKind, NavigationDecision};
pub use queue::CommandQueue;
pub use state::{
    BridgeSnapshot, BridgeStateMachine, LoadOutcome, Phase, SnapshotError, StateError,
};
