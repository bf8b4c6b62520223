//! Wire protocol between the host and the form peer.
//!
//! Two directions, two very different encodings:
//!
//! ```text
//! Host → Peer:  Command            (script string, injected one-way)
//! Peer → Host:  TaggedResponse     (alert text "<tag>:<payload>")
//! ```
//!
//! The literals in both submodules match the shipped peer-side script
//! (`mobileforms.js`) and must not be changed on one side only.

pub mod command;
pub mod response;

pub use command::{Command, CommandKind, PROTOCOL_VERSION};
pub use response::{ResponseTag, TaggedResponse};
