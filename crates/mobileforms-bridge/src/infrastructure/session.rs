//! Transcript replay loop.
//!
//! [`run_session`] plays the host's side of one recorded session.  The
//! transcript is fed through a bounded `tokio::sync::mpsc` channel and
//! consumed by a single loop that owns the [`FormBridge`]: one logical event
//! thread, as on a real host, so the bridge is never touched concurrently.
//!
//! A `teardown` record behaves like a host container being destroyed and
//! recreated: the bridge is serialized to its JSON blob, dropped, and a fresh
//! bridge over a fresh peer is restored from that blob.

use std::sync::Arc;

use mobileforms_core::{BridgeSnapshot, ExternalIntent, NavigationDecision, SnapshotError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::bridge_service::FormBridge;
use crate::application::ports::{AssetLoader, FormListener};
use crate::domain::config::BridgeConfig;
use crate::domain::transcript::PeerEvent;
use crate::infrastructure::journal::{Journal, JournalEntry};
use crate::infrastructure::listener::RecordingListener;
use crate::infrastructure::peer::RecordingPeer;

/// Capacity of the event channel between the transcript reader and the loop.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Where the session's form definition comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSource {
    /// A named definition under the configured forms directory.
    Named(String),
    /// Definition text supplied directly.
    Inline(String),
}

/// Host-side setup applied before the first load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub form: FormSource,
    pub populate_data: Option<String>,
    /// Stylesheet asset paths, added as durable customizations.
    pub stylesheets: Vec<String>,
    pub override_styles: bool,
    /// Script asset paths, added as durable customizations.
    pub scripts: Vec<String>,
    pub read_only: bool,
}

impl SessionOptions {
    pub fn new(form: FormSource) -> Self {
        Self {
            form,
            populate_data: None,
            stylesheets: Vec::new(),
            override_styles: false,
            scripts: Vec::new(),
            read_only: false,
        }
    }
}

/// Everything a replayed session produced.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Peer traffic and listener callbacks across every bridge instance.
    pub journal: Vec<JournalEntry>,
    /// Links the host would have opened in the dialer or mail composer.
    pub external_intents: Vec<ExternalIntent>,
    /// Alerts that were not protocol traffic and would be shown to the user.
    pub host_dialogs: Vec<String>,
    /// Number of teardown/restore cycles performed.
    pub teardowns: usize,
    /// State of the last bridge when the transcript ended.
    pub snapshot: BridgeSnapshot,
}

/// Replays `events` against a bridge configured from `options`.
///
/// # Errors
///
/// Returns [`SnapshotError`] if a teardown blob cannot be encoded or decoded.
pub async fn run_session(
    config: BridgeConfig,
    assets: Arc<dyn AssetLoader>,
    options: SessionOptions,
    events: Vec<PeerEvent>,
) -> Result<SessionReport, SnapshotError> {
    let journal = Arc::new(Journal::new());
    let listener: Arc<dyn FormListener> =
        Arc::new(RecordingListener::with_journal(Arc::clone(&journal)));

    let mut bridge = new_bridge(&config, &journal, &assets, &listener);
    configure(&mut bridge, &options);
    bridge.load();

    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let producer = tokio::spawn(async move {
        for event in events {
            if tx.send(event).await.is_err() {
                break;
            }
        }
    });

    let mut external_intents = Vec::new();
    let mut host_dialogs = Vec::new();
    let mut teardowns = 0;

    while let Some(event) = rx.recv().await {
        debug!(?event, "replaying");
        match event {
            PeerEvent::ShellReady => bridge.on_shell_ready(),
            PeerEvent::Alert { message } => {
                let mut acknowledged = false;
                let handled = bridge.on_side_channel_message(&message, &mut || acknowledged = true);
                if handled {
                    debug!(acknowledged, "side-channel request answered");
                } else {
                    info!(message = %message, "showing peer dialog");
                    host_dialogs.push(message);
                }
            }
            PeerEvent::Navigate { url } => {
                if let NavigationDecision::External(intent) = bridge.on_navigation(&url) {
                    info!(target = %intent.target, "opening external intent");
                    external_intents.push(intent);
                }
            }
            PeerEvent::Teardown => {
                let blob = bridge.snapshot().to_json()?;
                info!(bytes = blob.len(), "host teardown; restoring bridge from snapshot");
                bridge = new_bridge(&config, &journal, &assets, &listener);
                bridge.restore(BridgeSnapshot::from_json(&blob)?);
                teardowns += 1;
            }
            PeerEvent::Reload => bridge.reload(),
            PeerEvent::RequestValues => bridge.request_values(),
            PeerEvent::RequestValidatedSubmission => bridge.request_validated_submission(),
            PeerEvent::RequestErrors => bridge.request_errors(),
            PeerEvent::RequestValidity => bridge.request_validity(),
            PeerEvent::SetReadOnly { read_only } => bridge.set_read_only_mode(read_only),
            PeerEvent::PopulateAsync { data } => bridge.set_populate_data_async(&data),
        }
    }

    if let Err(e) = producer.await {
        warn!("transcript reader stopped early: {e}");
    }

    Ok(SessionReport {
        journal: journal.entries(),
        external_intents,
        host_dialogs,
        teardowns,
        snapshot: bridge.snapshot(),
    })
}

fn new_bridge(
    config: &BridgeConfig,
    journal: &Arc<Journal>,
    assets: &Arc<dyn AssetLoader>,
    listener: &Arc<dyn FormListener>,
) -> FormBridge {
    let peer = Arc::new(RecordingPeer::with_journal(Arc::clone(journal)));
    let mut bridge = FormBridge::new(config.clone(), peer, Arc::clone(assets));
    bridge.attach_listener(Arc::clone(listener));
    bridge
}

fn configure(bridge: &mut FormBridge, options: &SessionOptions) {
    match &options.form {
        FormSource::Named(name) => bridge.set_form_named(name),
        FormSource::Inline(definition) => bridge.set_form(definition.clone()),
    }
    if let Some(data) = &options.populate_data {
        bridge.set_populate_data(data.clone());
    }
    for path in &options.stylesheets {
        bridge.add_css_file(path, options.override_styles);
    }
    for path in &options.scripts {
        bridge.add_js_file(path);
    }
    if options.read_only {
        bridge.set_read_only_mode(true);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
