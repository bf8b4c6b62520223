//! The form bridge: composition root of the host side.
//!
//! [`FormBridge`] owns the [`BridgeStateMachine`], the [`ResponseRouter`] and
//! the [`EventClassifier`], and it is the only component that ever calls
//! [`FormPeer::inject`].
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//!   set_form / set_form_named          (Unconfigured → Configured)
//!         │
//!   load()  ── peer.load_shell(url) ── (Configured → Loading)
//!         │
//!   on_shell_ready()                   (Loading → Ready)
//!         ├─ setJsonForm(..)
//!         ├─ setJsonPopulateData(..)   when populate data is set
//!         ├─ init()
//!         └─ queued commands, then durable customizations
//! ```
//!
//! Every public operation is safe to call in any phase.  Before `Ready`,
//! commands wait in the queue; once `Ready`, they are injected immediately.
//!
//! # Failure policy
//!
//! Nothing here is fatal.  A missing form definition, an unreadable asset or
//! an absent listener degrades to "the requested effect did not happen" plus
//! a `tracing` diagnostic.

use std::sync::Arc;

use mobileforms_core::{
    BridgeSnapshot, BridgeStateMachine, Command, EventClassifier, FormEvent, FormEventKind,
    LoadOutcome, NavigationDecision, Phase,
};
use tracing::{debug, info, trace, warn};

use crate::application::ports::{Acknowledge, AssetLoader, FormListener, FormPeer};
use crate::application::response_router::ResponseRouter;
use crate::domain::config::BridgeConfig;

/// Drives one peer on behalf of one host.
pub struct FormBridge {
    config: BridgeConfig,
    peer: Arc<dyn FormPeer>,
    assets: Arc<dyn AssetLoader>,
    listener: Option<Arc<dyn FormListener>>,
    state: BridgeStateMachine,
    router: ResponseRouter,
    classifier: EventClassifier,
}

impl FormBridge {
    /// Creates an `Unconfigured` bridge with no listener attached.
    pub fn new(config: BridgeConfig, peer: Arc<dyn FormPeer>, assets: Arc<dyn AssetLoader>) -> Self {
        let classifier = config.classifier();
        Self {
            config,
            peer,
            assets,
            listener: None,
            state: BridgeStateMachine::new(),
            router: ResponseRouter::new(),
            classifier,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn state(&self) -> &BridgeStateMachine {
        &self.state
    }

    // ── Listener ──────────────────────────────────────────────────────────────

    /// Attaches the host listener, replacing any previous one.
    pub fn attach_listener(&mut self, listener: Arc<dyn FormListener>) {
        self.listener = Some(listener);
    }

    /// Detaches the listener.  Callbacks are dropped until one is attached.
    pub fn detach_listener(&mut self) -> Option<Arc<dyn FormListener>> {
        self.listener.take()
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    /// Sets the form definition (JSON text passed through verbatim).
    pub fn set_form(&mut self, definition: impl Into<String>) {
        if let Err(e) = self.state.set_form_definition(definition.into()) {
            warn!("ignoring form definition: {e}");
        }
    }

    /// Loads the definition named `name` from the forms asset directory.
    pub fn set_form_named(&mut self, name: &str) {
        let path = self.config.form_asset_path(name);
        match self.assets.load_text(&path) {
            Ok(definition) => self.set_form(definition),
            Err(e) => warn!(form = name, "cannot load form definition: {e}"),
        }
    }

    /// Sets the data the form is populated with during initialisation.
    pub fn set_populate_data(&mut self, data: impl Into<String>) {
        self.state.set_populate_data(data.into());
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Instructs the peer to load the shell document.
    ///
    /// Idempotent: a second call while loading or ready does nothing.
    pub fn load(&mut self) {
        if self.listener.is_none() {
            warn!("load requested with no listener attached; form callbacks will be dropped");
        }
        match self.state.begin_load() {
            Ok(outcome) => self.apply_load(outcome),
            Err(e) => warn!("cannot load form: {e}"),
        }
    }

    /// Loads the shell document again; the next readiness signal replays the
    /// full initialisation, durable customizations included.
    pub fn reload(&mut self) {
        match self.state.reload() {
            Ok(outcome) => self.apply_load(outcome),
            Err(e) => warn!("cannot reload form: {e}"),
        }
    }

    fn apply_load(&mut self, outcome: LoadOutcome) {
        if outcome == LoadOutcome::Started {
            info!(url = %self.config.shell_url, "loading shell document");
            self.peer.load_shell(&self.config.shell_url);
        }
    }

    /// The peer finished loading the shell document.
    pub fn on_shell_ready(&mut self) {
        for cmd in self.state.on_peer_ready() {
            self.inject(&cmd);
        }
    }

    /// Captures the bridge state for the host to persist.
    pub fn snapshot(&self) -> BridgeSnapshot {
        self.state.snapshot()
    }

    /// Rebuilds the bridge state from `snapshot`, requesting a load when the
    /// captured session had requested one.
    pub fn restore(&mut self, snapshot: BridgeSnapshot) {
        if self.state.restore(snapshot) {
            self.load();
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    pub fn set_read_only_mode(&mut self, read_only: bool) {
        if let Some(cmd) = self.state.set_read_only(read_only) {
            self.inject(&cmd);
        }
    }

    /// Asks for the current values; answered through `on_values`.
    pub fn request_values(&mut self) {
        self.submit(Command::get_form_data());
    }

    /// Asks for the validated values; answered through `on_submit`.
    pub fn request_validated_submission(&mut self) {
        self.submit(Command::get_form_data_validated());
    }

    /// Asks for the error report; answered through `on_errors`.
    pub fn request_errors(&mut self) {
        self.submit(Command::get_form_errors());
    }

    /// Asks whether the form is valid; answered through `on_validity_checked`.
    pub fn request_validity(&mut self) {
        self.submit(Command::is_form_valid());
    }

    /// Repopulates a live form, then refreshes the cached values from it.
    pub fn set_populate_data_async(&mut self, data: &str) {
        self.submit(Command::populate_with_data(data));
        self.submit(Command::update_form_data());
    }

    /// Adds the stylesheet at `path` as a durable customization.
    pub fn add_css_file(&mut self, path: &str, override_all_styles: bool) {
        match self.assets.load_text(path) {
            Ok(css) => self.submit(Command::add_css(&css, override_all_styles)),
            Err(e) => warn!(path, "cannot add stylesheet: {e}"),
        }
    }

    /// Adds the script at `path` as a durable customization.
    pub fn add_js_file(&mut self, path: &str) {
        match self.assets.load_text(path) {
            Ok(js) => self.submit(Command::add_js(&js)),
            Err(e) => warn!(path, "cannot add script: {e}"),
        }
    }

    // ── Peer callbacks ────────────────────────────────────────────────────────

    /// The peer raised a blocking dialog with `raw`.
    ///
    /// Returns `true` when it was protocol traffic (and `ack` was called);
    /// `false` means the host should display the dialog itself.
    pub fn on_side_channel_message(&mut self, raw: &str, ack: &mut dyn Acknowledge) -> bool {
        self.router
            .route(raw, &mut self.state, self.listener.as_deref(), ack)
    }

    /// The peer is about to navigate to `url`.
    ///
    /// The returned decision tells the host whether to block the navigation
    /// and whether to open an external intent.
    pub fn on_navigation(&mut self, url: &str) -> NavigationDecision {
        let decision = self.classifier.classify(url);
        match &decision {
            NavigationDecision::Event(event) => self.dispatch_event(event),
            NavigationDecision::External(intent) => {
                debug!(kind = ?intent.kind, target = %intent.target, "external intent");
            }
            NavigationDecision::PassThrough => trace!(url, "navigation passes through"),
        }
        decision
    }

    fn dispatch_event(&mut self, event: &FormEvent) {
        match event.kind {
            // Refresh cached values before the listener sees the focus change.
            FormEventKind::FocusIn => self.submit(Command::update_form_data()),
            FormEventKind::Submit => self.submit(Command::get_form_data_validated()),
            _ => {}
        }
        match &self.listener {
            Some(listener) => listener.on_event(event),
            None => trace!(kind = %event.kind, "no listener attached; dropping event"),
        }
    }

    // ── Injection ─────────────────────────────────────────────────────────────

    fn submit(&mut self, cmd: Command) {
        match self.state.enqueue(cmd) {
            Some(cmd) => self.inject(&cmd),
            None => debug!(phase = ?self.state.phase(), "command queued until the peer is ready"),
        }
    }

    fn inject(&self, cmd: &Command) {
        debug!(kind = ?cmd.kind(), script = cmd.script(), "inject");
        self.peer.inject(cmd.script());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
