//! Application state and core logic

use crate::api::{
    HttpApiClient, LocalChallenge, RegistrationApi, SubmissionAdapter, SubmissionOutcome,
    VerificationError, VerificationProvider,
};
use crate::config::StorefrontConfig;
use crate::state::{
    Advance, AppState, ErrorMap, FieldId, Form, FormButton, PendingRedirect, View, WizardStep,
};
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Sends finished drafts to the storefront
    submission: SubmissionAdapter,
    /// Issues verification challenges and tokens
    verifier: Box<dyn VerificationProvider>,
    /// Pause between a successful submission and leaving the wizard
    redirect_delay: Duration,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance talking to the configured storefront
    pub async fn new(config: StorefrontConfig) -> Result<Self> {
        let api = HttpApiClient::new(&config)?;
        let verifier = LocalChallenge::new(config.verification_ttl());
        Ok(Self::with_services(&config, Box::new(api), Box::new(verifier)).await)
    }

    /// Create an App with explicit services
    pub async fn with_services(
        config: &StorefrontConfig,
        api: Box<dyn RegistrationApi>,
        verifier: Box<dyn VerificationProvider>,
    ) -> Self {
        let mut app = Self {
            state: AppState::default(),
            submission: SubmissionAdapter::new(api),
            verifier,
            redirect_delay: config.redirect_delay(),
            quit: false,
        };
        app.load_challenge().await;
        app
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    async fn load_challenge(&mut self) {
        let result = self.verifier.load().await;
        match result {
            Ok(challenge) => self.state.challenge_code = Some(challenge.code),
            Err(e) => {
                self.state.challenge_code = None;
                self.push_error(format!("Failed to load verification: {e}"));
            }
        }
    }

    /// Time-driven updates: verification expiry and delayed redirects
    pub async fn tick(&mut self) {
        if let Some(redirect) = &self.state.pending_redirect {
            if redirect.is_due(Instant::now()) {
                if let Some(redirect) = self.state.pending_redirect.take() {
                    self.state.reset_form();
                    self.navigate(redirect.view);
                }
            }
            return;
        }

        if self.state.current_view.is_form_view()
            && self
                .state
                .form
                .wizard
                .draft_mut()
                .expire_verification(Utc::now())
        {
            tracing::info!("Verification token expired, issuing a new challenge");
            self.verifier.reset();
            self.load_challenge().await;
            self.state.status_message = Some("Verification expired, enter the new code".to_string());
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Leaving the wizard, nothing to do until the redirect runs
        if self.state.pending_redirect.is_some() {
            return Ok(());
        }

        self.state.status_message = None;

        match self.state.current_view {
            View::Wizard => self.handle_wizard_key(key).await?,
            View::VerifyEmail | View::Welcome => self.handle_outcome_key(key).await?,
        }
        Ok(())
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        tracing::debug!(from = ?self.state.current_view, to = ?view, "Navigate");
        self.state.current_view = view;
    }

    async fn handle_wizard_key(&mut self, key: KeyEvent) -> Result<()> {
        let on_buttons = self.state.form.is_buttons_row_active();
        let active = self.state.form.active_field_id();
        let control = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Tab => self.state.form.next_field(),
            KeyCode::BackTab => self.state.form.prev_field(),
            // Keyboard shortcuts (work from anywhere)
            KeyCode::Char('s') if control => self.advance().await,
            KeyCode::Char('n') if key.modifiers.contains(crate::platform::SHORTCUT_MODIFIER) => {
                self.advance().await
            }
            KeyCode::Esc => self.retreat(),
            KeyCode::Left | KeyCode::Right if on_buttons => self.state.form.toggle_button(),
            KeyCode::Enter if on_buttons => match self.state.form.selected_button {
                FormButton::Back => self.retreat(),
                FormButton::Next => self.advance().await,
            },
            KeyCode::Enter if active == Some(FieldId::Verification) => {
                self.redeem_verification().await
            }
            KeyCode::Enter => self.state.form.next_field(),
            KeyCode::Left => self.state.form.cycle(false),
            KeyCode::Right => self.state.form.cycle(true),
            KeyCode::Char(c) if !control => self.state.form.input_char(c),
            KeyCode::Backspace => self.state.form.backspace(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_outcome_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('n') => self.start_new_registration().await,
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    /// Validate the current step and move forward, submitting at the end
    async fn advance(&mut self) {
        match self.state.form.wizard.advance() {
            Advance::Moved(step) => {
                self.state.form.reset_focus();
                tracing::debug!(step = step.number(), "Moved to {}", step.title());
            }
            Advance::Blocked(errors) => {
                self.focus_first_error(&errors);
                self.state.status_message = Some(format!(
                    "Please correct {} field(s) before continuing",
                    errors.len()
                ));
            }
            Advance::Submit => self.submit().await,
            Advance::InFlight => {
                self.state.status_message = Some("Registration already in progress".to_string());
            }
        }
    }

    fn retreat(&mut self) {
        if self.state.form.wizard.retreat() {
            self.state.form.reset_focus();
        }
    }

    async fn submit(&mut self) {
        let email = self.state.form.wizard.draft().value(FieldId::Email);
        let result = self.submission.run(&mut self.state.form.wizard).await;
        match result {
            Ok(outcome) => {
                let (view, message) = match outcome {
                    SubmissionOutcome::RequiresVerification { message } => {
                        (View::VerifyEmail, message)
                    }
                    SubmissionOutcome::Ready { message } => (View::Welcome, message),
                };
                self.state.registered_email = Some(email);
                self.state.outcome_message = message;
                self.state.status_message = Some("Account created, redirecting...".to_string());
                self.state.pending_redirect = Some(PendingRedirect::after(view, self.redirect_delay));
            }
            Err(e) => {
                let errors = e.field_errors();
                self.focus_first_error(&errors);
                if let Some(step) = errors.keys().map(|id| WizardStep::owning(*id)).min() {
                    if step != self.state.form.wizard.current_step() {
                        self.state.status_message = Some(format!(
                            "Go back to step {} ({}) to fix the highlighted fields",
                            step.number(),
                            step.title()
                        ));
                    }
                }
            }
        }
    }

    /// Put the cursor on the first invalid field of the current step
    fn focus_first_error(&mut self, errors: &ErrorMap) {
        if let Some(first) = self
            .state
            .form
            .field_ids()
            .into_iter()
            .find(|id| errors.contains_key(id))
        {
            self.state.form.focus(first);
        }
    }

    async fn redeem_verification(&mut self) {
        let answer = self.state.form.wizard.draft().value(FieldId::Verification);
        let result = self.verifier.redeem(&answer).await;
        match result {
            Ok(token) => {
                self.state.form.wizard.draft_mut().set_verification_token(token);
                self.state.status_message = Some("Verified".to_string());
            }
            Err(VerificationError::Rejected) => {
                let draft = self.state.form.wizard.draft_mut();
                draft.set_field(FieldId::Verification, "");
                draft.merge_server_errors(ErrorMap::from([(
                    FieldId::Verification,
                    VerificationError::Rejected.to_string(),
                )]));
                self.load_challenge().await;
            }
            Err(e) => {
                self.push_error(e.to_string());
                self.load_challenge().await;
            }
        }
    }

    async fn start_new_registration(&mut self) {
        self.state.reset_form();
        self.state.registered_email = None;
        self.state.outcome_message = None;
        self.navigate(View::Wizard);
        self.load_challenge().await;
    }
}
