use serde::{Deserialize, Serialize};
use std::fmt;

use crate::capabilities::SubmitOutcome;
use crate::config::AppConfig;
use crate::model::{Field, Language, PickedImage, TextField};

// --- Session token: redacted in Debug output ---

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn into_secret(self) -> secrecy::SecretString {
        secrecy::SecretString::new(self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

// --- Event enum: large variants boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Setup
    Configure(Box<AppConfig>),
    LanguageChanged {
        language: Language,
    },
    SessionChanged {
        token: Option<SessionToken>,
    },

    // Pickers
    PickerOpened {
        field: Field,
    },
    PickerClosed,
    OptionSelected {
        field: Field,
        display_value: String,
    },

    // Free text
    TextChanged {
        field: TextField,
        value: String,
    },

    // Media
    ImagesPicked(Vec<PickedImage>),
    ImageRemoved {
        index: usize,
    },
    MediaPermissionDenied,

    // Submission
    SubmitRequested,
    SubmitCompleted(Box<SubmitOutcome>),
    ResetForm,

    // Transient UI
    DismissToast,
    DismissError,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::LanguageChanged { .. } => "language_changed",
            Self::SessionChanged { .. } => "session_changed",
            Self::PickerOpened { .. } => "picker_opened",
            Self::PickerClosed => "picker_closed",
            Self::OptionSelected { .. } => "option_selected",
            Self::TextChanged { .. } => "text_changed",
            Self::ImagesPicked(_) => "images_picked",
            Self::ImageRemoved { .. } => "image_removed",
            Self::MediaPermissionDenied => "media_permission_denied",
            Self::SubmitRequested => "submit_requested",
            Self::SubmitCompleted(_) => "submit_completed",
            Self::ResetForm => "reset_form",
            Self::DismissToast => "dismiss_toast",
            Self::DismissError => "dismiss_error",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::LanguageChanged { .. }
                | Self::PickerOpened { .. }
                | Self::PickerClosed
                | Self::OptionSelected { .. }
                | Self::TextChanged { .. }
                | Self::ImagesPicked(_)
                | Self::ImageRemoved { .. }
                | Self::SubmitRequested
                | Self::ResetForm
                | Self::DismissToast
                | Self::DismissError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("super_secret");
        assert_eq!(format!("{token:?}"), "[REDACTED]");
        let event = Event::SessionChanged { token: Some(token) };
        assert!(!format!("{event:?}").contains("super_secret"));
    }

    #[test]
    fn event_serializes_with_field_names() {
        let event = Event::OptionSelected {
            field: Field::ExteriorColor,
            display_value: "أبيض".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("exterior_color"));
        assert_eq!(serde_json::from_str::<Event>(&json).unwrap(), event);
    }

    #[test]
    fn submit_completed_is_not_user_initiated() {
        let event = Event::SubmitCompleted(Box::new(SubmitOutcome::from_status(201, b"")));
        assert!(!event.is_user_initiated());
        assert_eq!(event.name(), "submit_completed");
    }

    #[test]
    fn event_size_is_reasonable() {
        let size = std::mem::size_of::<Event>();
        assert!(size <= 64, "Event enum is {size} bytes, box more variants");
    }
}
