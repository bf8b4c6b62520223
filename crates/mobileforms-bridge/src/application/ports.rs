//! Collaborator ports.
//!
//! The bridge never touches a rendering engine, a file system or a UI
//! directly.  It is wired against the traits below, which the host (or the
//! [`infrastructure`](crate::infrastructure) layer, or a test) implements.
//!
//! # Why traits here? (for beginners)
//!
//! Defining the interfaces in the application layer and implementing them in
//! the outer layers is the dependency-inversion principle: [`FormBridge`]
//! depends on "something that can inject a script", not on a particular web
//! engine.  Tests substitute in-memory recorders and `mockall` mocks without
//! changing a line of the bridge.
//!
//! [`FormBridge`]: crate::application::FormBridge

use mobileforms_core::FormEvent;
use thiserror::Error;

/// The embedded rendering engine, seen from the host.
///
/// Both calls are fire-and-forget: there is no return value and no delivery
/// confirmation.
pub trait FormPeer: Send + Sync {
    /// Navigates the peer to the shell document at `url`.
    fn load_shell(&self, url: &str);

    /// Executes `script` inside the peer.
    fn inject(&self, script: &str);
}

/// Error type for asset retrieval.
#[derive(Debug, Error)]
pub enum AssetError {
    /// No asset exists under the identifier.
    #[error("asset not found: {identifier}")]
    NotFound { identifier: String },

    /// The asset exists but could not be read as text.
    #[error("failed to read asset {identifier}: {source}")]
    Io {
        identifier: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only text store for form definitions and customization files.
#[cfg_attr(test, mockall::automock)]
pub trait AssetLoader: Send + Sync {
    /// Returns the full text of the asset named `identifier`.
    ///
    /// # Errors
    ///
    /// [`AssetError::NotFound`] when nothing exists under `identifier`,
    /// [`AssetError::Io`] when it exists but cannot be read.
    fn load_text(&self, identifier: &str) -> Result<String, AssetError>;
}

/// Outward callback interface implemented by the host.
///
/// Payloads are passed through verbatim as the peer produced them (JSON text
/// for data and errors).
pub trait FormListener: Send + Sync {
    /// Validated form data, delivered after a submit.
    fn on_submit(&self, validated_data: &str);

    /// Current, unvalidated form data.
    fn on_values(&self, current_data: &str);

    /// A user interaction inside the form.
    fn on_event(&self, event: &FormEvent);

    /// The form's validation error report.
    fn on_errors(&self, errors: &str);

    /// Result of a validity check.
    fn on_validity_checked(&self, is_valid: bool);
}

/// Unblocks a peer waiting on its side-channel dialog.
///
/// Any `FnMut()` closure is an `Acknowledge`.
pub trait Acknowledge {
    fn acknowledge(&mut self);
}

impl<F: FnMut()> Acknowledge for F {
    fn acknowledge(&mut self) {
        self()
    }
}
