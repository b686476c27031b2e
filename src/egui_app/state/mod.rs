use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::egui_app::auth::{AuthService, AuthState, SESSION_EXPIRED_BY_INACTIVITY};
use crate::egui_app::config::Config;
use crate::egui_app::http::HttpClient;
use crate::egui_app::inactivity::InactivityTimer;
use crate::egui_app::runtime::{Dispatcher, Pending};
use crate::egui_app::screens::{
    ChecklistScreen, DocumentsScreen, DpoScreen, HomeScreen, LoginScreen, ProfileScreen,
    UsersScreen,
};
use crate::egui_app::token_store::TokenStore;
use crate::egui_app::types::{AppView, SessionUser};

/// Central application state shared across egui views.
///
/// Screens are created when navigated to and dropped on logout, so every
/// visit starts from a fresh fetch.
pub struct AppState {
    pub config: Config,
    client: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenStore>,
    auth: AuthService,
    pub dispatcher: Dispatcher,
    pub auth_state: AuthState,
    pub current_view: AppView,
    inactivity: InactivityTimer,
    bootstrap: Pending<Option<SessionUser>>,
    logout: Pending<()>,

    pub home: HomeScreen,
    pub login: LoginScreen,
    pub checklist: Option<ChecklistScreen>,
    pub users: Option<UsersScreen>,
    pub documents: Option<DocumentsScreen>,
    pub dpo: Option<DpoScreen>,
    pub profile: Option<ProfileScreen>,
}

impl AppState {
    /// Resumes a stored session in the background when tokens exist.
    pub fn new(
        config: Config,
        client: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenStore>,
        dispatcher: Dispatcher,
    ) -> Self {
        let auth = AuthService::new(Arc::clone(&client), Arc::clone(&tokens));
        let inactivity = InactivityTimer::new(config.app().inactivity_timeout, Instant::now());
        let mut state = Self {
            login: LoginScreen::new(auth.clone()),
            config,
            client,
            tokens,
            auth,
            dispatcher,
            auth_state: AuthState::new(),
            current_view: AppView::Login,
            inactivity,
            bootstrap: Pending::idle(),
            logout: Pending::idle(),
            home: HomeScreen,
            checklist: None,
            users: None,
            documents: None,
            dpo: None,
            profile: None,
        };

        if state.tokens.has_tokens() {
            tracing::info!("[AUTH] Stored tokens found, resuming session");
            state.auth_state.loading = true;
            let auth = state.auth.clone();
            state
                .bootstrap
                .start(state.dispatcher.spawn(async move { auth.bootstrap().await }));
        }
        state
    }

    pub fn can_manage(&self) -> bool {
        self.auth_state.can_manage()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.auth_state.user.as_ref()
    }

    /// Switch screens. Views behind the session fall back to the login screen.
    pub fn navigate(&mut self, view: AppView) {
        if view.requires_session() && !self.auth_state.authenticated() {
            self.current_view = AppView::Login;
            return;
        }
        tracing::debug!("[NAV] {:?} -> {:?}", self.current_view, view);
        let page_size = self.config.app().page_size;
        match view {
            AppView::Login | AppView::Home => {}
            AppView::Checklist => {
                let mut screen = ChecklistScreen::new(Arc::clone(&self.client), page_size);
                screen.load(&self.dispatcher);
                self.checklist = Some(screen);
            }
            AppView::Users => {
                let mut screen = UsersScreen::new(Arc::clone(&self.client), page_size);
                screen.open(&self.dispatcher);
                self.users = Some(screen);
            }
            AppView::Documents => {
                let mut screen = DocumentsScreen::new(
                    Arc::clone(&self.client),
                    self.config.app().api_url.clone(),
                    page_size,
                );
                screen.open(&self.dispatcher);
                self.documents = Some(screen);
            }
            AppView::Dpo => {
                let mut screen = DpoScreen::new(Arc::clone(&self.client), self.config.clone());
                screen.load(&self.dispatcher);
                self.dpo = Some(screen);
            }
            AppView::Profile => {
                let mut screen =
                    ProfileScreen::new(Arc::clone(&self.client), Arc::clone(&self.tokens));
                screen.load(&self.dispatcher);
                self.profile = Some(screen);
            }
        }
        self.current_view = view;
    }

    fn sign_in(&mut self, user: SessionUser, now: Instant) {
        tracing::info!("[AUTH] Signed in as {}", user.email);
        self.auth_state.user = Some(user);
        self.auth_state.loading = false;
        self.auth_state.clear_error();
        self.inactivity.reset(now);
        self.navigate(AppView::Home);
    }

    /// End the session. `notice` is shown on the login screen.
    pub fn logout(&mut self, notice: Option<&str>) {
        let auth = self.auth.clone();
        self.logout
            .start(self.dispatcher.spawn(async move { auth.logout().await }));

        self.auth_state = AuthState::new();
        self.checklist = None;
        self.users = None;
        self.documents = None;
        self.dpo = None;
        self.profile = None;
        self.login = match notice {
            Some(notice) => LoginScreen::new(self.auth.clone()).with_notice(notice),
            None => LoginScreen::new(self.auth.clone()),
        };
        self.current_view = AppView::Login;
    }

    /// Register user input. Returns whether the inactivity deadline moved.
    pub fn touch(&mut self, now: Instant) -> bool {
        self.auth_state.authenticated() && self.inactivity.touch(now)
    }

    /// Apply finished requests and timers. Returns whether a repaint is needed.
    pub fn update(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(resumed) = self.bootstrap.poll() {
            changed = true;
            self.auth_state.loading = false;
            match resumed {
                Some(user) => self.sign_in(user, now),
                None => tracing::info!("[AUTH] No session to resume"),
            }
        }
        if self.logout.poll().is_some() {
            tracing::debug!("[AUTH] Server logout finished");
        }

        if self.current_view == AppView::Login {
            if let Some(user) = self.login.poll() {
                self.sign_in(user, now);
                return true;
            }
            return changed;
        }

        if self.auth_state.authenticated() && self.inactivity.is_expired(now) {
            tracing::info!("[AUTH] Session expired by inactivity");
            self.logout(Some(SESSION_EXPIRED_BY_INACTIVITY));
            return true;
        }

        changed |= match self.current_view {
            AppView::Login | AppView::Home => false,
            AppView::Checklist => self
                .checklist
                .as_mut()
                .is_some_and(|s| s.poll(&self.dispatcher, now)),
            AppView::Users => self
                .users
                .as_mut()
                .is_some_and(|s| s.poll(&self.dispatcher, now)),
            AppView::Documents => self
                .documents
                .as_mut()
                .is_some_and(|s| s.poll(&self.dispatcher, now)),
            AppView::Dpo => self.dpo.as_mut().is_some_and(DpoScreen::poll),
            AppView::Profile => self.poll_profile(now),
        };
        changed
    }

    fn poll_profile(&mut self, now: Instant) -> bool {
        let Some(profile) = self.profile.as_mut() else {
            return false;
        };
        let changed = profile.poll(now);
        if let Some(record) = profile.take_updated_user() {
            self.auth_state.user = Some(record.into());
        }
        if profile.logout_due(now) {
            self.logout(None);
            return true;
        }
        changed
    }

    /// How long the frame loop may sleep before a timer needs attention.
    pub fn repaint_after(&self, now: Instant) -> Option<Duration> {
        let flash = match self.current_view {
            AppView::Checklist => self.checklist.as_ref().and_then(|s| s.flash.next_deadline()),
            AppView::Users => self.users.as_ref().and_then(|s| s.flash.next_deadline()),
            AppView::Documents => self.documents.as_ref().and_then(|s| s.flash.next_deadline()),
            AppView::Profile => self.profile.as_ref().and_then(|s| {
                [s.flash.next_deadline(), s.logout_deadline()]
                    .into_iter()
                    .flatten()
                    .min()
            }),
            _ => None,
        };
        let session = self
            .auth_state
            .authenticated()
            .then(|| self.inactivity.deadline());
        [flash, session]
            .into_iter()
            .flatten()
            .min()
            .map(|at| at.saturating_duration_since(now))
    }
}
