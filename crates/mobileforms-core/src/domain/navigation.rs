//! Classification of navigations intercepted from the peer.
//!
//! The peer reports user interaction by navigating to a private URL:
//!
//! ```text
//! mobileforms://event?element=email&value=a%40b.c&type=change
//! ```
//!
//! The host intercepts every navigation the peer attempts and asks
//! [`EventClassifier::classify`] what it is:
//!
//! - a form event (private scheme + host) → [`NavigationDecision::Event`]
//! - a `tel:` or `mailto:` link → [`NavigationDecision::External`], to be
//!   handed to the platform dialer or mail composer
//! - anything else → [`NavigationDecision::PassThrough`], the peer navigates
//!   normally
//!
//! Classification is a pure function of the URL text and the classifier's
//! configured scheme/host pair.

use url::Url;

use crate::domain::event::{FormEvent, FormEventKind};

/// Scheme of event URLs emitted by the shipped peer script.
pub const DEFAULT_EVENT_SCHEME: &str = "mobileforms";
/// Host of event URLs emitted by the shipped peer script.
pub const DEFAULT_EVENT_HOST: &str = "event";

const TEL_PREFIX: &str = "tel:";
const MAIL_PREFIX: &str = "mailto:";

const QUERY_ELEMENT: &str = "element";
const QUERY_VALUE: &str = "value";
const QUERY_TYPE: &str = "type";

/// Which platform handler an external link is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Tel,
    Mail,
}

/// A link the host should open outside the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIntent {
    pub kind: IntentKind,
    /// The full original URL, e.g. `tel:+34600000000`.
    pub target: String,
}

/// What the host must do with an intercepted navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// A form event; the navigation is consumed.
    Event(FormEvent),
    /// A telephone or mail link; the navigation is consumed.
    External(ExternalIntent),
    /// Not ours; the peer handles the navigation itself.
    PassThrough,
}

impl NavigationDecision {
    /// `true` when the peer must not perform the navigation itself.
    pub fn is_consumed(&self) -> bool {
        !matches!(self, NavigationDecision::PassThrough)
    }
}

/// Decodes intercepted navigations for one scheme/host pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventClassifier {
    scheme: String,
    host: String,
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_SCHEME, DEFAULT_EVENT_HOST)
    }
}

impl EventClassifier {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Classifies `raw_url`.
    ///
    /// Event query parameters are percent-decoded (`+` reads as a space).
    /// A missing parameter decodes to the empty string; when a key repeats,
    /// the first occurrence wins.
    pub fn classify(&self, raw_url: &str) -> NavigationDecision {
        if let Some(event) = self.parse_event(raw_url) {
            return NavigationDecision::Event(event);
        }
        if raw_url.starts_with(TEL_PREFIX) {
            return NavigationDecision::External(ExternalIntent {
                kind: IntentKind::Tel,
                target: raw_url.to_owned(),
            });
        }
        if raw_url.starts_with(MAIL_PREFIX) {
            return NavigationDecision::External(ExternalIntent {
                kind: IntentKind::Mail,
                target: raw_url.to_owned(),
            });
        }
        NavigationDecision::PassThrough
    }

    fn parse_event(&self, raw_url: &str) -> Option<FormEvent> {
        let url = Url::parse(raw_url).ok()?;
        let ours = url.scheme().eq_ignore_ascii_case(&self.scheme)
            && url.host_str() == Some(self.host.as_str());
        if !ours {
            return None;
        }

        let mut element = None;
        let mut value = None;
        let mut event_type = None;
        for (key, val) in url.query_pairs() {
            let slot = match key.as_ref() {
                QUERY_ELEMENT => &mut element,
                QUERY_VALUE => &mut value,
                QUERY_TYPE => &mut event_type,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(val.into_owned());
            }
        }

        let value = value.unwrap_or_default();
        let kind = FormEventKind::from_query(event_type.as_deref().unwrap_or_default(), &value);
        Some(FormEvent {
            kind,
            element: element.unwrap_or_default(),
            value,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
