//! Outbound commands: the script strings injected into the peer.
//!
//! A [`Command`] is immutable once built.  It carries the exact script text
//! the peer will evaluate plus a [`CommandKind`] that tells the queue whether
//! the command must survive a full reload of the shell document.
//!
//! # Argument encoding
//!
//! JSON documents (form definitions, populate data) are inserted raw because
//! they already are valid script expressions.  Free text (stylesheets, user
//! scripts) is encoded as a JSON string literal, which is also a valid script
//! string literal once the two line-separator code points are escaped.

use serde::{Deserialize, Serialize};

use crate::protocol::response::ResponseTag;

/// Version of the textual command protocol spoken by this crate.
///
/// Bump when a command name or argument layout changes in a way the shipped
/// peer script would not understand.
pub const PROTOCOL_VERSION: u32 = 1;

/// Whether a command is applied once or re-applied after every reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Applied exactly once, then discarded.
    Transient,
    /// A durable customization re-applied on every fresh load of the shell.
    Restorable,
}

/// A fully formatted instruction ready for injection into the peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    script: String,
    kind: CommandKind,
}

impl Command {
    /// Wraps an already formatted script.
    pub fn new(script: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            script: script.into(),
            kind,
        }
    }

    /// Shorthand for a [`CommandKind::Transient`] command.
    pub fn transient(script: impl Into<String>) -> Self {
        Self::new(script, CommandKind::Transient)
    }

    /// Shorthand for a [`CommandKind::Restorable`] command.
    pub fn restorable(script: impl Into<String>) -> Self {
        Self::new(script, CommandKind::Restorable)
    }

    /// The script text handed to the peer.
    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn is_restorable(&self) -> bool {
        self.kind == CommandKind::Restorable
    }

    // ── Initialisation sequence ───────────────────────────────────────────────

    /// `setJsonForm(<definition>)` – hands the form definition to the peer.
    pub fn set_json_form(definition: &str) -> Self {
        Self::transient(format!("setJsonForm({definition})"))
    }

    /// `setJsonPopulateData(<data>)` – initial values applied by `init()`.
    pub fn set_json_populate_data(data: &str) -> Self {
        Self::transient(format!("setJsonPopulateData({data})"))
    }

    /// `init()` – builds the form from the definition and populate data.
    pub fn init() -> Self {
        Self::transient("init()")
    }

    // ── Mode and data ─────────────────────────────────────────────────────────

    pub fn set_read_only(read_only: bool) -> Self {
        Self::transient(format!("setReadOnly({read_only})"))
    }

    /// `populateWithData(<data>)` – overwrites current values on a live form.
    pub fn populate_with_data(data: &str) -> Self {
        Self::transient(format!("populateWithData({data})"))
    }

    // ── Requests answered through the side channel ────────────────────────────

    /// Current values, without validation.  Answered with [`ResponseTag::Values`].
    pub fn get_form_data() -> Self {
        Self::alert_request(ResponseTag::Values, "getFormData()")
    }

    /// Validated snapshot.  Answered with [`ResponseTag::ValuesValidated`].
    pub fn get_form_data_validated() -> Self {
        Self::alert_request(ResponseTag::ValuesValidated, "getFormDataValidated()")
    }

    /// Refreshes the host's cached values.  Answered with [`ResponseTag::UpdateData`].
    pub fn update_form_data() -> Self {
        Self::alert_request(ResponseTag::UpdateData, "getFormData()")
    }

    pub fn get_form_errors() -> Self {
        Self::alert_request(ResponseTag::Errors, "getFormErrors()")
    }

    pub fn is_form_valid() -> Self {
        Self::alert_request(ResponseTag::IsValid, "isFormValid()")
    }

    // ── Durable customizations ────────────────────────────────────────────────

    /// `addCSS("<css>", <override>)` – injects a stylesheet.
    ///
    /// With `override_all_styles` the peer discards the default form styles
    /// before applying `css`.
    pub fn add_css(css: &str, override_all_styles: bool) -> Self {
        Self::restorable(format!(
            "addCSS({}, {override_all_styles})",
            script_string_literal(css)
        ))
    }

    /// `addJS("<js>")` – evaluates a user script inside the form page.
    pub fn add_js(js: &str) -> Self {
        Self::restorable(format!("addJS({})", script_string_literal(js)))
    }

    fn alert_request(tag: ResponseTag, call: &str) -> Self {
        Self::transient(format!("alert(\"{}\" + {call})", tag.prefix()))
    }
}

/// Encodes `text` as a double-quoted script string literal.
///
/// JSON string escaping covers quotes, backslashes and control characters;
/// U+2028 and U+2029 are legal in JSON but terminate a script string literal
/// on older engines, so they are escaped as well.
pub fn script_string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_owned())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
