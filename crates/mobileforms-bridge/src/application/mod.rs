//! Application layer for mobileforms-bridge.
//!
//! - [`ports`] – the collaborator traits the bridge is wired against.
//! - [`response_router`] – turns side-channel messages into listener calls.
//! - [`bridge_service`] – [`FormBridge`], the composition root and the only
//!   component that injects into the peer.

pub mod bridge_service;
pub mod ports;
pub mod response_router;

pub use bridge_service::FormBridge;
pub use ports::{Acknowledge, AssetError, AssetLoader, FormListener, FormPeer};
pub use response_router::ResponseRouter;
