//! Side-channel demultiplexer.
//!
//! Every alert the peer raises passes through [`ResponseRouter::route`].
//! Alerts carrying a known prefix are protocol traffic: they are decoded,
//! dispatched and acknowledged.  Anything else is a genuine dialog raised by
//! the form and is handed back to the host (`route` returns `false`) so it
//! can be shown to the user.
//!
//! | Tag               | Effect                                        |
//! |-------------------|-----------------------------------------------|
//! | `ValuesValidated` | `listener.on_submit(payload)`                 |
//! | `Values`          | `listener.on_values(payload)`                 |
//! | `UpdateData`      | replaces the cached populate data (no callback) |
//! | `Errors`          | `listener.on_errors(payload)`                 |
//! | `IsValid`         | `listener.on_validity_checked(payload == true)` |
//!
//! With no listener attached, callbacks are dropped, never queued.

use mobileforms_core::{BridgeStateMachine, ResponseTag, TaggedResponse};
use tracing::{debug, trace};

use crate::application::ports::{Acknowledge, FormListener};

/// Routes tagged side-channel messages.  Stateless apart from the prefix
/// table it reads from [`ResponseTag::MATCH_ORDER`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseRouter;

impl ResponseRouter {
    pub fn new() -> Self {
        Self
    }

    /// Handles one side-channel message.
    ///
    /// Returns `true` when `raw` was protocol traffic; `ack` has then been
    /// called exactly once.  Returns `false` without touching `ack`
    /// otherwise.
    pub fn route(
        &self,
        raw: &str,
        state: &mut BridgeStateMachine,
        listener: Option<&dyn FormListener>,
        ack: &mut dyn Acknowledge,
    ) -> bool {
        let Some(response) = TaggedResponse::parse(raw) else {
            return false;
        };
        debug!(tag = ?response.tag, "side-channel response");
        self.dispatch(response, state, listener);
        ack.acknowledge();
        true
    }

    fn dispatch(
        &self,
        response: TaggedResponse,
        state: &mut BridgeStateMachine,
        listener: Option<&dyn FormListener>,
    ) {
        if response.tag == ResponseTag::UpdateData {
            state.record_current_values(response.payload);
            return;
        }
        let Some(listener) = listener else {
            trace!(tag = ?response.tag, "no listener attached; dropping response");
            return;
        };
        match response.tag {
            ResponseTag::ValuesValidated => listener.on_submit(&response.payload),
            ResponseTag::Values => listener.on_values(&response.payload),
            ResponseTag::Errors => listener.on_errors(&response.payload),
            ResponseTag::IsValid => listener.on_validity_checked(response.as_bool()),
            ResponseTag::UpdateData => {}
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use mobileforms_core::FormEvent;

    use super::*;

    #[derive(Default)]
    struct Calls(Mutex<Vec<String>>);

    impl Calls {
        fn push(&self, s: String) {
            self.0.lock().unwrap().push(s);
        }
        fn all(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl FormListener for Calls {
        fn on_submit(&self, data: &str) {
            self.push(format!("submit {data}"));
        }
        fn on_values(&self, data: &str) {
            self.push(format!("values {data}"));
        }
        fn on_event(&self, event: &FormEvent) {
            self.push(format!("event {}", event.kind));
        }
        fn on_errors(&self, errors: &str) {
            self.push(format!("errors {errors}"));
        }
        fn on_validity_checked(&self, is_valid: bool) {
            self.push(format!("valid {is_valid}"));
        }
    }

    fn route(raw: &str, state: &mut BridgeStateMachine, listener: Option<&Calls>) -> (bool, u32) {
        let mut acks = 0;
        let handled = ResponseRouter::new().route(
            raw,
            state,
            listener.map(|l| l as &dyn FormListener),
            &mut || acks += 1,
        );
        (handled, acks)
    }

    #[test]
    fn test_values_reach_on_values_and_are_acknowledged() {
        // Arrange
        let mut state = BridgeStateMachine::new();
        let calls = Calls::default();

        // Act
        let (handled, acks) = route(r#"formData:{"a":1}"#, &mut state, Some(&calls));

        // Assert
        assert!(handled);
        assert_eq!(acks, 1);
        assert_eq!(calls.all(), vec![r#"values {"a":1}"#]);
    }

    #[test]
    fn test_validated_values_reach_on_submit() {
        let mut state = BridgeStateMachine::new();
        let calls = Calls::default();

        route(r#"formDataValidated:{"a":1}"#, &mut state, Some(&calls));

        assert_eq!(calls.all(), vec![r#"submit {"a":1}"#]);
    }

    #[test]
    fn test_errors_and_validity_callbacks() {
        let mut state = BridgeStateMachine::new();
        let calls = Calls::default();

        route("formErrors:[]", &mut state, Some(&calls));
        route("isFormValid:TRUE", &mut state, Some(&calls));
        route("isFormValid:no", &mut state, Some(&calls));

        assert_eq!(calls.all(), vec!["errors []", "valid true", "valid false"]);
    }

    #[test]
    fn test_update_data_replaces_cached_values_without_callback() {
        // Arrange
        let mut state = BridgeStateMachine::new();
        state.set_populate_data(r#"{"a":0}"#.to_string());
        let calls = Calls::default();

        // Act
        let (handled, acks) = route(r#"updateFormData:{"a":2}"#, &mut state, Some(&calls));

        // Assert
        assert!(handled);
        assert_eq!(acks, 1);
        assert!(calls.all().is_empty());
        assert_eq!(state.populate_data(), Some(r#"{"a":2}"#));
    }

    #[test]
    fn test_unmatched_alert_is_not_handled_nor_acknowledged() {
        let mut state = BridgeStateMachine::new();
        let calls = Calls::default();

        let (handled, acks) = route("Please fill in your name", &mut state, Some(&calls));

        assert!(!handled);
        assert_eq!(acks, 0);
        assert!(calls.all().is_empty());
    }

    #[test]
    fn test_without_listener_response_is_dropped_but_acknowledged() {
        let mut state = BridgeStateMachine::new();

        let (handled, acks) = route("formErrors:[]", &mut state, None);

        assert!(handled);
        assert_eq!(acks, 1);
    }
}
