//! Inbound responses: tagged strings delivered through the peer's `alert()`.
//!
//! The peer cannot return values to the host.  Instead every request command
//! (see [`Command::get_form_data`](crate::Command::get_form_data) and friends)
//! asks the peer to raise an alert whose text is `<prefix><payload>`.  The
//! host intercepts the alert, recognises the prefix, and treats the rest as
//! the response payload.
//!
//! # Prefix table
//!
//! | Tag                | Prefix                | Payload                    |
//! |--------------------|-----------------------|----------------------------|
//! | `ValuesValidated`  | `formDataValidated:`  | validated form data (JSON) |
//! | `Values`           | `formData:`           | current form data (JSON)   |
//! | `UpdateData`       | `updateFormData:`     | current form data (JSON)   |
//! | `Errors`           | `formErrors:`         | error report (JSON)        |
//! | `IsValid`          | `isFormValid:`        | `true` / `false`           |
//!
//! # Match order
//!
//! `formDataValidated:` and `formData:` share the leading text `formData`.
//! [`ResponseTag::MATCH_ORDER`] always lists the validated tag first so a
//! future prefix edit can never let the plain tag shadow it.  Alerts matching
//! no prefix are genuine dialogs raised by the form itself and are not
//! protocol traffic.

/// The closed set of response kinds understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseTag {
    /// Answer to a plain values request.
    Values,
    /// Answer to the validated-snapshot request issued on submit.
    ValuesValidated,
    /// Background refresh of the host's cached values.
    UpdateData,
    /// Error report.
    Errors,
    /// Validity check.
    IsValid,
}

impl ResponseTag {
    /// Every tag, in the order prefixes must be tested.
    pub const MATCH_ORDER: [ResponseTag; 5] = [
        ResponseTag::ValuesValidated,
        ResponseTag::Values,
        ResponseTag::UpdateData,
        ResponseTag::Errors,
        ResponseTag::IsValid,
    ];

    /// The literal prefix the peer puts in front of the payload.
    pub const fn prefix(self) -> &'static str {
        match self {
            ResponseTag::Values => "formData:",
            ResponseTag::ValuesValidated => "formDataValidated:",
            ResponseTag::UpdateData => "updateFormData:",
            ResponseTag::Errors => "formErrors:",
            ResponseTag::IsValid => "isFormValid:",
        }
    }
}

/// A side-channel message with its prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedResponse {
    pub tag: ResponseTag,
    pub payload: String,
}

impl TaggedResponse {
    /// Decodes `raw` against [`ResponseTag::MATCH_ORDER`].
    ///
    /// Only the leading prefix is removed; the payload is returned verbatim
    /// even if it happens to contain a prefix literal itself.
    ///
    /// Returns `None` for text that carries no known prefix.
    pub fn parse(raw: &str) -> Option<Self> {
        ResponseTag::MATCH_ORDER.iter().find_map(|&tag| {
            raw.strip_prefix(tag.prefix()).map(|payload| TaggedResponse {
                tag,
                payload: payload.to_owned(),
            })
        })
    }

    /// Interprets an [`ResponseTag::IsValid`] payload.
    ///
    /// Anything other than `true` (ignoring ASCII case) reads as `false`,
    /// including an empty payload.
    pub fn as_bool(&self) -> bool {
        self.payload.eq_ignore_ascii_case("true")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
