//! Application state definitions

use super::forms::RegistrationForm;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// Registration wizard
    #[default]
    Wizard,
    /// Account created, email confirmation pending
    VerifyEmail,
    /// Account created and usable
    Welcome,
}

impl View {
    pub fn is_form_view(&self) -> bool {
        matches!(self, Self::Wizard)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Wizard => "Create your account",
            Self::VerifyEmail => "Check your inbox",
            Self::Welcome => "Welcome",
        }
    }
}

/// A navigation scheduled to happen after a delay
#[derive(Debug, Clone)]
pub struct PendingRedirect {
    pub view: View,
    pub due: Instant,
}

impl PendingRedirect {
    pub fn after(view: View, delay: Duration) -> Self {
        Self {
            view,
            due: Instant::now() + delay,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub pending_redirect: Option<PendingRedirect>,

    // Registration
    pub form: RegistrationForm,
    /// Challenge the user must type to get a verification token
    pub challenge_code: Option<String>,
    /// Email the account was registered with
    pub registered_email: Option<String>,
    /// Message returned by the server on success
    pub outcome_message: Option<String>,

    // UI state
    pub status_message: Option<String>,
    error_queue: VecDeque<String>,
}

impl AppState {
    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: String) {
        tracing::warn!("{message}");
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    /// Error currently shown in the dialog
    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    /// Number of errors waiting, including the one shown
    pub fn queued_errors(&self) -> usize {
        self.error_queue.len()
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    /// Replace the wizard with a fresh, empty draft
    pub fn reset_form(&mut self) {
        self.form = RegistrationForm::new();
        self.challenge_code = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_is_wizard() {
        let state = AppState::default();
        assert_eq!(state.current_view, View::Wizard);
        assert!(state.current_view.is_form_view());
        assert!(!View::Welcome.is_form_view());
    }

    #[test]
    fn test_error_queue_is_fifo() {
        let mut state = AppState::default();
        assert!(!state.has_errors());
        state.push_error("first".to_string());
        state.push_error("second".to_string());
        assert_eq!(state.current_error(), Some("first"));
        assert_eq!(state.queued_errors(), 2);
        state.dismiss_error();
        assert_eq!(state.current_error(), Some("second"));
        state.dismiss_error();
        assert!(!state.has_errors());
        state.dismiss_error();
    }

    #[test]
    fn test_redirect_due() {
        let redirect = PendingRedirect::after(View::Welcome, Duration::from_millis(50));
        assert!(!redirect.is_due(Instant::now()));
        assert!(redirect.is_due(Instant::now() + Duration::from_millis(60)));
    }

    #[test]
    fn test_reset_form_discards_draft() {
        let mut state = AppState::default();
        state.form.input_char('x');
        state.challenge_code = Some("ABC123".to_string());
        let old_id = state.form.wizard.draft().id();
        state.reset_form();
        assert_ne!(state.form.wizard.draft().id(), old_id);
        assert!(state.challenge_code.is_none());
    }
}
