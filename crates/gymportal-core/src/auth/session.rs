//! The session service: who is signed in, and the operations that change it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::store::SessionStore;
use crate::api::{ApiClient, ApiError, UnauthorizedPolicy};
use crate::guard::{landing_for, HOME_PATH};
use crate::models::UserProfile;
use crate::navigation::Navigator;
use crate::notify::Notifier;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Signed in successfully!";
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid login credentials";
const SESSION_SAVE_FAILED_MESSAGE: &str = "Signed in, but the session could not be saved";

/// Observable auth state.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    pub user: Option<UserProfile>,
    pub is_admin: bool,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl Default for AuthSnapshot {
    /// Before the first `initialize` finishes.
    fn default() -> Self {
        Self {
            user: None,
            is_admin: false,
            is_authenticated: false,
            loading: true,
        }
    }
}

impl AuthSnapshot {
    pub fn signed_out() -> Self {
        Self {
            loading: false,
            ..Self::default()
        }
    }

    pub fn signed_in(user: UserProfile) -> Self {
        Self {
            is_admin: user.is_admin,
            is_authenticated: true,
            loading: false,
            user: Some(user),
        }
    }
}

/// Auth context handed to every page.
///
/// Clones share state. Changes are published on a watch channel so the
/// front end can re-run its guards whenever the session moves.
#[derive(Clone)]
pub struct SessionService {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    state: Arc<watch::Sender<AuthSnapshot>>,
}

impl SessionService {
    pub fn new(
        api: ApiClient,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());
        Self {
            api,
            store,
            navigator,
            notifier,
            state: Arc::new(state),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_modify(|s| s.loading = loading);
    }

    fn publish(&self, snapshot: AuthSnapshot) {
        self.state.send_replace(snapshot);
    }

    /// Forget in-memory state, as a page load does. Call `initialize` next.
    pub fn reset(&self) {
        self.publish(AuthSnapshot::default());
    }

    /// Verify the stored token and settle the session state.
    pub async fn initialize(&self) -> AuthSnapshot {
        self.set_loading(true);

        let next = match self.store.load_token() {
            None => {
                debug!("No stored session");
                AuthSnapshot::signed_out()
            }
            Some(_) => match self.api.fetch_profile(UnauthorizedPolicy::ClearOnly).await {
                Ok(user) => {
                    info!(user_id = %user.id, is_admin = user.is_admin, "Session restored");
                    AuthSnapshot::signed_in(user)
                }
                Err(e) => {
                    warn!(error = %e, "Stored session is not usable; signing out");
                    self.store.clear();
                    AuthSnapshot::signed_out()
                }
            },
        };

        self.publish(next.clone());
        next
    }

    /// Sign in, persist the session and load the landing page.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        self.set_loading(true);

        let outcome = match self.api.login(email, password).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.notifier.error(LOGIN_FAILED_MESSAGE);
                self.set_loading(false);
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&outcome.token, &outcome.user) {
            warn!(error = %e, "Failed to save session");
            self.notifier.error(SESSION_SAVE_FAILED_MESSAGE);
        }

        let user = outcome.user;
        info!(user_id = %user.id, is_admin = user.is_admin, "Logged in");
        self.publish(AuthSnapshot::signed_in(user.clone()));
        self.notifier.success(LOGIN_SUCCESS_MESSAGE);
        self.navigator.assign(landing_for(user.is_admin));
        Ok(user)
    }

    pub fn sign_out(&self) {
        self.store.clear();
        self.publish(AuthSnapshot::signed_out());
        info!("Signed out");
        self.navigator.push(HOME_PATH);
    }

    /// Replace the cached profile after an edit. The token is not touched,
    /// and neither is the admin flag established at sign-in. Ignored when
    /// signed out, so a profile is never stored without a token.
    pub fn update_user_data(&self, profile: UserProfile) {
        if !self.is_authenticated() {
            warn!(user_id = %profile.id, "Ignoring profile update without a session");
            return;
        }
        if let Err(e) = self.store.save_profile(&profile) {
            warn!(error = %e, "Failed to save updated profile");
        }
        self.state.send_modify(|s| s.user = Some(profile));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StoredBearer;
    use crate::auth::{MemorySessionStore, StoredSession};
    use crate::config::Config;
    use crate::navigation::History;
    use crate::notify::Toasts;

    fn service(api_url: &str, store: Arc<MemorySessionStore>) -> (SessionService, Arc<History>, Arc<Toasts>) {
        let history = Arc::new(History::new("/"));
        let toasts = Arc::new(Toasts::new());
        let config = Config {
            api_url: api_url.to_string(),
            ..Config::default()
        };
        let api = ApiClient::new(&config, Arc::new(StoredBearer::new(store.clone())), history.clone()).unwrap();
        (SessionService::new(api, store, history.clone(), toasts.clone()), history, toasts)
    }

    #[test]
    fn test_initial_state_is_loading_and_signed_out() {
        let (session, _, _) = service("http://localhost:3001/api", Arc::new(MemorySessionStore::new()));
        let snapshot = session.snapshot();
        assert!(snapshot.loading);
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_none());
    }

    #[tokio::test]
    async fn test_initialize_without_token_skips_network() {
        // Nothing listens on this port; a request would fail the test.
        let (session, history, _) = service("http://127.0.0.1:9/api", Arc::new(MemorySessionStore::new()));
        let mut changes = session.subscribe();

        let snapshot = session.initialize().await;
        assert_eq!(snapshot, AuthSnapshot::signed_out());
        assert!(changes.has_changed().unwrap());
        assert!(!changes.borrow_and_update().loading);
        assert!(history.log().is_empty());
    }

    #[tokio::test]
    async fn test_reset_returns_to_loading() {
        let (session, _, _) = service("http://127.0.0.1:9/api", Arc::new(MemorySessionStore::new()));
        session.initialize().await;
        assert!(!session.is_loading());
        session.reset();
        assert_eq!(session.snapshot(), AuthSnapshot::default());
    }

    fn profile() -> UserProfile {
        serde_json::from_value::<crate::models::ApiUser>(serde_json::json!({"id": "u-1", "email": "ana@olimpo.gym"}))
            .unwrap()
            .into_profile()
    }

    #[tokio::test]
    async fn test_unreachable_api_clears_stored_session() {
        // Nothing listens on this port.
        let store = Arc::new(MemorySessionStore::with_token("tok"));
        let (session, history, _) = service("http://127.0.0.1:9/api", store.clone());

        let snapshot = session.initialize().await;
        assert_eq!(snapshot, AuthSnapshot::signed_out());
        assert!(!session.is_loading());
        assert_eq!(store.load(), StoredSession::default());
        assert!(history.log().is_empty());
    }

    #[tokio::test]
    async fn test_update_user_data_ignored_when_signed_out() {
        let store = Arc::new(MemorySessionStore::new());
        let (session, _, _) = service("http://127.0.0.1:9/api", store.clone());
        session.initialize().await;

        session.update_user_data(profile());
        assert!(session.user().is_none());
        assert_eq!(store.load(), StoredSession::default());
    }

    #[tokio::test]
    async fn test_sign_out_without_session_goes_home() {
        let (session, history, _) = service("http://localhost:3001/api", Arc::new(MemorySessionStore::new()));
        history.push("/dashboard");
        session.sign_out();
        assert_eq!(history.current_path(), "/");
        assert_eq!(session.snapshot(), AuthSnapshot::signed_out());
    }
}
