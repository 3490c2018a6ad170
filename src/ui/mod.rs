//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod outcome;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    match &app.state.current_view {
        View::Wizard => forms::draw_registration(frame, main_area, app),
        View::VerifyEmail | View::Welcome => outcome::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Error dialog on top of everything
    if let Some(message) = app.state.current_error() {
        components::render_error_dialog(frame, message, app.state.queued_errors());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        Challenge, MockRegistrationApi, MockVerificationProvider, VerificationProvider,
    };
    use crate::config::StorefrontConfig;
    use ratatui::{backend::TestBackend, Terminal};

    async fn app() -> App {
        let mut verifier = MockVerificationProvider::new();
        verifier.expect_load().returning(|| {
            Ok(Challenge {
                code: "XYZ789".to_string(),
            })
        });
        let verifier: Box<dyn VerificationProvider> = Box::new(verifier);
        App::with_services(
            &StorefrontConfig::default(),
            Box::new(MockRegistrationApi::new()),
            verifier,
        )
        .await
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_first_step_renders() {
        let app = app().await;
        let screen = render(&app);
        assert!(screen.contains("Step 1 of 4"));
        assert!(screen.contains("Email"));
        assert!(screen.contains("Next"));
    }

    #[tokio::test]
    async fn test_field_error_is_shown() {
        let mut app = app().await;
        app.state.form.wizard.advance();
        let screen = render(&app);
        assert!(screen.contains("required"));
    }

    #[tokio::test]
    async fn test_error_dialog_overlays() {
        let mut app = app().await;
        app.push_error("Server down");
        let screen = render(&app);
        assert!(screen.contains("Server down"));
        assert!(screen.contains("dismiss"));
    }

    #[tokio::test]
    async fn test_outcome_view_names_email() {
        let mut app = app().await;
        app.state.registered_email = Some("amira@shop.tn".to_string());
        app.state.current_view = View::VerifyEmail;
        let screen = render(&app);
        assert!(screen.contains("amira@shop.tn"));
    }
}
