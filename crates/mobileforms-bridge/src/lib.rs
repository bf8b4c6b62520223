//! mobileforms-bridge library crate.
//!
//! This crate drives an embedded form-rendering peer (a web engine running
//! the MobileForms shell document) from a native host.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Host UI (lifecycle container, listener)
//!         ↕
//! [mobileforms-bridge]
//!   ├── domain/           BridgeConfig, transcript records
//!   ├── application/      FormBridge composition root, ResponseRouter,
//!   │                     collaborator ports (peer, assets, listener)
//!   └── infrastructure/
//!         ├── assets/     Filesystem asset loader
//!         ├── journal/    Ordered record of peer traffic and callbacks
//!         ├── peer/       Recording peer
//!         ├── listener/   Recording listener
//!         └── session/    Transcript replay loop (tokio)
//!         ↕
//! Peer (script injection in, tagged alerts and navigations out)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O beyond reading its own config file.
//! - `application` depends on `domain` and `mobileforms-core` only; the peer,
//!   the asset store and the listener are reached through traits.
//! - `infrastructure` implements those traits and owns the async runtime.

/// Domain layer: configuration and transcript types.
pub mod domain;

/// Application layer: the bridge and its collaborator ports.
pub mod application;

/// Infrastructure layer: asset loading, recording stubs, replay loop.
pub mod infrastructure;
