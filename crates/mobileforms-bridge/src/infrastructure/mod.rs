//! Infrastructure layer for mobileforms-bridge.
//!
//! Concrete implementations of the application ports plus the replay loop:
//!
//! - [`assets`] – [`FsAssetLoader`], assets read from a directory.
//! - [`journal`] – shared, ordered record of everything a session produced.
//! - [`peer`] – [`RecordingPeer`], an in-memory stand-in for the web engine.
//! - [`listener`] – [`RecordingListener`], a host listener that records.
//! - [`session`] – [`run_session`], replays a transcript through a bridge.

pub mod assets;
pub mod journal;
pub mod listener;
pub mod peer;
pub mod session;

pub use assets::FsAssetLoader;
pub use journal::{Journal, JournalEntry, ListenerCall};
pub use listener::RecordingListener;
pub use peer::RecordingPeer;
pub use session::{run_session, FormSource, SessionOptions, SessionReport};
