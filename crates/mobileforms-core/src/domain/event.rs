//! Form events reported by the peer through `mobileforms://event` URLs.

use std::fmt;

/// Kind of user interaction that happened inside the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormEventKind {
    /// The user submitted a form that passed validation.
    Submit,
    /// The user tried to submit a form that failed validation.
    SubmitInvalid,
    /// A field gained focus.
    FocusIn,
    /// A field lost focus.
    FocusOut,
    /// A field value changed.
    Change,
    /// A field failed validation.
    ValidateError,
    /// A link inside the form was activated.
    Link,
    /// Any `type` the host does not know about.
    Other,
}

impl FormEventKind {
    /// Maps the `type` and `value` query parameters of an event URL.
    ///
    /// | `type`          | `value`   | Kind            |
    /// |-----------------|-----------|-----------------|
    /// | `submit`        | `valid`   | `Submit`        |
    /// | `submit`        | `invalid` | `SubmitInvalid` |
    /// | `focus`         | any       | `FocusIn`       |
    /// | `focusout`      | any       | `FocusOut`      |
    /// | `change`        | any       | `Change`        |
    /// | `validateerror` | any       | `ValidateError` |
    /// | `link`          | any       | `Link`          |
    /// | anything else   | any       | `Other`         |
    ///
    /// Matching is exact and case-sensitive.  A `submit` with any other value
    /// is `Other`.
    pub fn from_query(event_type: &str, value: &str) -> Self {
        match (event_type, value) {
            ("submit", "valid") => FormEventKind::Submit,
            ("submit", "invalid") => FormEventKind::SubmitInvalid,
            ("focus", _) => FormEventKind::FocusIn,
            ("focusout", _) => FormEventKind::FocusOut,
            ("change", _) => FormEventKind::Change,
            ("validateerror", _) => FormEventKind::ValidateError,
            ("link", _) => FormEventKind::Link,
            _ => FormEventKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormEventKind::Submit => "submit",
            FormEventKind::SubmitInvalid => "submit_invalid",
            FormEventKind::FocusIn => "focus_in",
            FormEventKind::FocusOut => "focus_out",
            FormEventKind::Change => "change",
            FormEventKind::ValidateError => "validate_error",
            FormEventKind::Link => "link",
            FormEventKind::Other => "other",
        }
    }
}

impl fmt::Display for FormEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded form event.  Built, dispatched once, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEvent {
    pub kind: FormEventKind,
    /// Name or id of the form element the event refers to.
    pub element: String,
    /// Current value of that element (or `valid`/`invalid` for submits).
    pub value: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_depends_on_value() {
        assert_eq!(FormEventKind::from_query("submit", "valid"), FormEventKind::Submit);
        assert_eq!(
            FormEventKind::from_query("submit", "invalid"),
            FormEventKind::SubmitInvalid
        );
        assert_eq!(FormEventKind::from_query("submit", ""), FormEventKind::Other);
    }

    #[test]
    fn test_value_independent_types() {
        let cases = [
            ("focus", FormEventKind::FocusIn),
            ("focusout", FormEventKind::FocusOut),
            ("change", FormEventKind::Change),
            ("validateerror", FormEventKind::ValidateError),
            ("link", FormEventKind::Link),
        ];
        for (event_type, expected) in cases {
            assert_eq!(FormEventKind::from_query(event_type, "anything"), expected);
        }
    }

    #[test]
    fn test_unknown_and_differently_cased_types_are_other() {
        assert_eq!(FormEventKind::from_query("blur", "x"), FormEventKind::Other);
        assert_eq!(FormEventKind::from_query("Focus", "x"), FormEventKind::Other);
        assert_eq!(FormEventKind::from_query("", ""), FormEventKind::Other);
    }

    #[test]
    fn test_display_uses_snake_case_names() {
        assert_eq!(FormEventKind::ValidateError.to_string(), "validate_error");
    }
}
