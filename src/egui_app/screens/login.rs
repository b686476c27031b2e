//! Login form with the collapsible password-reset panel.

use std::time::Duration;

use crate::egui_app::auth::{AuthError, AuthService, RESET_EMAIL_REQUIRED};
use crate::egui_app::runtime::{Dispatcher, Pending};
use crate::egui_app::types::SessionUser;

pub struct LoginScreen {
    auth: AuthService,
    pub email: String,
    pub password: String,
    /// Shown above the form; also carries the re-authentication notice
    pub error: Option<String>,
    pub reset_open: bool,
    pub reset_email: String,
    pub reset_message: Option<String>,
    login: Pending<Result<SessionUser, AuthError>>,
    reset: Pending<&'static str>,
}

impl LoginScreen {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            email: String::new(),
            password: String::new(),
            error: None,
            reset_open: false,
            reset_email: String::new(),
            reset_message: None,
            login: Pending::idle(),
            reset: Pending::idle(),
        }
    }

    /// Open with a notice, e.g. after an inactivity logout.
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.error = Some(notice.into());
        self
    }

    pub fn submitting(&self) -> bool {
        self.login.is_busy()
    }

    pub fn reset_busy(&self) -> bool {
        self.reset.is_busy()
    }

    /// Ignored while a login is in flight.
    pub fn submit(&mut self, dispatcher: &Dispatcher) {
        if self.submitting() {
            return;
        }
        self.error = None;
        let auth = self.auth.clone();
        let email = self.email.trim().to_lowercase();
        let password = self.password.clone();
        self.login
            .start(dispatcher.spawn(async move { auth.login(&email, &password).await }));
    }

    pub fn toggle_reset(&mut self) {
        self.reset_open = !self.reset_open;
        self.reset_message = None;
    }

    pub fn request_reset(&mut self, dispatcher: &Dispatcher) {
        if self.reset_busy() {
            return;
        }
        if self.reset_email.trim().is_empty() {
            self.reset_message = Some(RESET_EMAIL_REQUIRED.to_string());
            return;
        }
        self.reset_message = None;
        let auth = self.auth.clone();
        let email = self.reset_email.clone();
        self.reset
            .start(dispatcher.spawn(async move { auth.password_reset(&email).await }));
    }

    /// The signed-in user once a login succeeds.
    pub fn poll(&mut self) -> Option<SessionUser> {
        if let Some(message) = self.reset.poll() {
            self.reset_message = Some(message.to_string());
        }
        let result = self.login.poll()?;
        self.finish(result)
    }

    pub fn wait(&mut self, timeout: Duration) -> Option<SessionUser> {
        if self.reset.is_busy() {
            if let Some(message) = self.reset.wait(timeout) {
                self.reset_message = Some(message.to_string());
            }
            return None;
        }
        let result = self.login.wait(timeout)?;
        self.finish(result)
    }

    fn finish(&mut self, result: Result<SessionUser, AuthError>) -> Option<SessionUser> {
        match result {
            Ok(user) => {
                self.password.clear();
                Some(user)
            }
            Err(e) => {
                self.error = Some(e.user_message());
                None
            }
        }
    }
}
