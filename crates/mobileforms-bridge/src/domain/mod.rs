//! Domain layer for mobileforms-bridge.
//!
//! Plain data: how the bridge is configured and how a recorded peer session
//! is described.  No peer, no runtime, no listener.

pub mod config;
pub mod transcript;

pub use config::{BridgeConfig, ConfigError};
pub use transcript::{parse_transcript, PeerEvent, TranscriptError};
