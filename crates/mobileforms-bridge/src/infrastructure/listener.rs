//! Recording host listener.

use std::sync::Arc;

use mobileforms_core::FormEvent;
use tracing::info;

use crate::application::ports::FormListener;
use crate::infrastructure::journal::{Journal, JournalEntry, ListenerCall};

/// A [`FormListener`] that logs every callback and appends it to a
/// [`Journal`].
#[derive(Debug, Default)]
pub struct RecordingListener {
    journal: Arc<Journal>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(journal: Arc<Journal>) -> Self {
        Self { journal }
    }

    pub fn journal(&self) -> &Arc<Journal> {
        &self.journal
    }

    fn record(&self, call: ListenerCall) {
        self.journal.record(JournalEntry::Callback(call));
    }
}

impl FormListener for RecordingListener {
    fn on_submit(&self, validated_data: &str) {
        info!(data = validated_data, "form submitted");
        self.record(ListenerCall::Submit(validated_data.to_owned()));
    }

    fn on_values(&self, current_data: &str) {
        info!(data = current_data, "form values");
        self.record(ListenerCall::Values(current_data.to_owned()));
    }

    fn on_event(&self, event: &FormEvent) {
        info!(kind = %event.kind, element = %event.element, value = %event.value, "form event");
        self.record(ListenerCall::Event(event.clone()));
    }

    fn on_errors(&self, errors: &str) {
        info!(errors, "form errors");
        self.record(ListenerCall::Errors(errors.to_owned()));
    }

    fn on_validity_checked(&self, is_valid: bool) {
        info!(is_valid, "form validity");
        self.record(ListenerCall::Validity(is_valid));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_callback_is_recorded() {
        // Arrange
        let listener = RecordingListener::new();

        // Act
        listener.on_values("{}");
        listener.on_errors("[]");
        listener.on_validity_checked(false);
        listener.on_submit(r#"{"ok":true}"#);

        // Assert
        assert_eq!(
            listener.journal().callbacks(),
            vec![
                ListenerCall::Values("{}".into()),
                ListenerCall::Errors("[]".into()),
                ListenerCall::Validity(false),
                ListenerCall::Submit(r#"{"ok":true}"#.into()),
            ]
        );
    }
}
