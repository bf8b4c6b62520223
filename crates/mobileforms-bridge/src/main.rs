//! MobileForms bridge: transcript replay entry point.
//!
//! This binary runs the host side of the MobileForms bridge against a
//! recorded peer session.  It loads a form definition, replays every peer
//! signal and host request from a JSON-lines transcript, and prints the
//! resulting stream of shell loads, injected commands and listener callbacks.
//! It is the quickest way to see exactly what a host would send to the peer
//! for a given sequence of events, including across a teardown/restore.
//!
//! # Usage
//!
//! ```text
//! mobileforms-bridge [OPTIONS] --transcript <FILE>
//!
//! Options:
//!   --config        <FILE>  TOML bridge config [default: built-in layout]
//!   --assets        <DIR>   Asset root directory [default: .]
//!   --form          <NAME>  Named form under the forms directory
//!   --form-file     <FILE>  Form definition file (instead of --form)
//!   --populate-file <FILE>  Initial populate data
//!   --css           <PATH>  Durable stylesheet asset (repeatable)
//!   --override-styles       Stylesheets replace the shell's styles
//!   --js            <PATH>  Durable script asset (repeatable)
//!   --read-only             Start in read-only mode
//!   --transcript    <FILE>  JSON-lines session transcript
//!   --snapshot-out  <FILE>  Write the final bridge snapshot here
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                 | Flag           |
//! |--------------------------|----------------|
//! | `MOBILEFORMS_CONFIG`     | `--config`     |
//! | `MOBILEFORMS_ASSETS`     | `--assets`     |
//! | `MOBILEFORMS_FORM`       | `--form`       |
//! | `MOBILEFORMS_TRANSCRIPT` | `--transcript` |
//!
//! Log output goes to stderr and is controlled by `RUST_LOG`; the replayed
//! stream goes to stdout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mobileforms_bridge::application::AssetLoader;
use mobileforms_bridge::domain::{parse_transcript, BridgeConfig};
use mobileforms_bridge::infrastructure::{
    run_session, FormSource, FsAssetLoader, SessionOptions, SessionReport,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// MobileForms host bridge.
///
/// Replays a recorded peer session through the bridge and prints everything
/// the host would have sent to the peer and to its listener.
#[derive(Debug, Parser)]
#[command(
    name = "mobileforms-bridge",
    about = "Replay a MobileForms peer session through the host bridge",
    version
)]
struct Cli {
    /// TOML file with shell URL, forms directory and event scheme settings.
    #[arg(long, env = "MOBILEFORMS_CONFIG")]
    config: Option<PathBuf>,

    /// Root directory that asset identifiers are resolved against.
    #[arg(long, default_value = ".", env = "MOBILEFORMS_ASSETS")]
    assets: PathBuf,

    /// Name of a form definition under the configured forms directory.
    #[arg(long, env = "MOBILEFORMS_FORM", conflicts_with = "form_file")]
    form: Option<String>,

    /// Path of a form definition file, read directly.
    #[arg(long)]
    form_file: Option<PathBuf>,

    /// Path of a JSON file with the initial populate data.
    #[arg(long)]
    populate_file: Option<PathBuf>,

    /// Stylesheet asset added as a durable customization.  Repeatable.
    #[arg(long = "css", value_name = "PATH")]
    stylesheets: Vec<String>,

    /// Make the stylesheets replace the shell's own styles.
    #[arg(long)]
    override_styles: bool,

    /// Script asset added as a durable customization.  Repeatable.
    #[arg(long = "js", value_name = "PATH")]
    scripts: Vec<String>,

    /// Start the form in read-only mode.
    #[arg(long)]
    read_only: bool,

    /// JSON-lines transcript of the session to replay.
    #[arg(long, env = "MOBILEFORMS_TRANSCRIPT")]
    transcript: PathBuf,

    /// Where to write the final bridge snapshot (JSON).
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

impl Cli {
    /// Loads the config file when one was given, otherwise the defaults.
    fn bridge_config(&self) -> anyhow::Result<BridgeConfig> {
        match &self.config {
            Some(path) => BridgeConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display())),
            None => Ok(BridgeConfig::default()),
        }
    }

    /// Builds the host-side session setup from the form and customization
    /// flags.
    ///
    /// # Errors
    ///
    /// Returns an error when neither `--form` nor `--form-file` is given, or
    /// when a referenced file cannot be read.
    fn session_options(&self) -> anyhow::Result<SessionOptions> {
        let form = match (&self.form, &self.form_file) {
            (Some(name), _) => FormSource::Named(name.clone()),
            (None, Some(path)) => FormSource::Inline(read_file(path)?),
            (None, None) => bail!("one of --form or --form-file is required"),
        };
        let populate_data = self.populate_file.as_deref().map(read_file).transpose()?;

        Ok(SessionOptions {
            form,
            populate_data,
            stylesheets: self.stylesheets.clone(),
            override_styles: self.override_styles,
            scripts: self.scripts.clone(),
            read_only: self.read_only,
        })
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_report(report: &SessionReport) {
    for entry in &report.journal {
        println!("{entry}");
    }
    for intent in &report.external_intents {
        println!("open  {}", intent.target);
    }
    for message in &report.host_dialogs {
        println!("show  {message}");
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// A current-thread runtime is enough: the bridge lives on one logical event
/// thread, exactly like on a real host.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.bridge_config()?;
    let options = cli.session_options()?;

    let text = read_file(&cli.transcript)?;
    let events = parse_transcript(&text)
        .with_context(|| format!("invalid transcript {}", cli.transcript.display()))?;

    info!(
        events = events.len(),
        assets = %cli.assets.display(),
        "replaying MobileForms session"
    );

    let assets: Arc<dyn AssetLoader> = Arc::new(FsAssetLoader::new(&cli.assets));
    let report = run_session(config, assets, options, events)
        .await
        .context("session replay failed")?;

    print_report(&report);

    if let Some(path) = &cli.snapshot_out {
        let blob = report
            .snapshot
            .to_json()
            .context("failed to encode final snapshot")?;
        std::fs::write(path, blob)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    info!(teardowns = report.teardowns, "replay finished");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::io::Write;

    use super::*;

    #[test]
    fn test_cli_defaults() {
        // Arrange: only the required transcript argument
        let cli = Cli::parse_from(["mobileforms-bridge", "--transcript", "t.jsonl"]);

        // Assert
        assert_eq!(cli.assets, PathBuf::from("."));
        assert!(cli.stylesheets.is_empty());
        assert!(!cli.read_only);
        assert!(cli.snapshot_out.is_none());
    }

    #[test]
    fn test_cli_repeatable_customizations() {
        let cli = Cli::parse_from([
            "mobileforms-bridge",
            "--transcript",
            "t.jsonl",
            "--css",
            "a.css",
            "--css",
            "b.css",
            "--js",
            "x.js",
            "--override-styles",
        ]);

        assert_eq!(cli.stylesheets, vec!["a.css", "b.css"]);
        assert_eq!(cli.scripts, vec!["x.js"]);
        assert!(cli.override_styles);
    }

    #[test]
    fn test_cli_form_and_form_file_conflict() {
        let result = Cli::try_parse_from([
            "mobileforms-bridge",
            "--transcript",
            "t.jsonl",
            "--form",
            "contact",
            "--form-file",
            "contact.json",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_session_options_named_form() {
        // Arrange
        let cli = Cli::parse_from([
            "mobileforms-bridge",
            "--transcript",
            "t.jsonl",
            "--form",
            "contact",
            "--read-only",
        ]);

        // Act
        let options = cli.session_options().unwrap();

        // Assert
        assert_eq!(options.form, FormSource::Named("contact".to_string()));
        assert!(options.read_only);
        assert!(options.populate_data.is_none());
    }

    #[test]
    fn test_session_options_reads_form_and_populate_files() {
        // Arrange
        let mut form = tempfile::NamedTempFile::new().unwrap();
        write!(form, r#"{{"fields":[]}}"#).unwrap();
        let mut data = tempfile::NamedTempFile::new().unwrap();
        write!(data, r#"{{"a":1}}"#).unwrap();
        let args: Vec<OsString> = vec![
            "mobileforms-bridge".into(),
            "--transcript".into(),
            "t.jsonl".into(),
            "--form-file".into(),
            form.path().into(),
            "--populate-file".into(),
            data.path().into(),
        ];
        let cli = Cli::parse_from(args);

        // Act
        let options = cli.session_options().unwrap();

        // Assert
        assert_eq!(options.form, FormSource::Inline(r#"{"fields":[]}"#.to_string()));
        assert_eq!(options.populate_data.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_session_options_without_form_is_an_error() {
        let cli = Cli {
            config: None,
            assets: PathBuf::from("."),
            form: None,
            form_file: None,
            populate_file: None,
            stylesheets: Vec::new(),
            override_styles: false,
            scripts: Vec::new(),
            read_only: false,
            transcript: PathBuf::from("t.jsonl"),
            snapshot_out: None,
        };

        assert!(cli.session_options().is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::parse_from([
            "mobileforms-bridge",
            "--transcript",
            "t.jsonl",
            "--config",
            "/nonexistent/mobileforms.toml",
        ]);

        assert!(cli.bridge_config().is_err());
    }
}
