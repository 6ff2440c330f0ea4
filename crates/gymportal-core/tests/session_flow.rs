//! End-to-end session lifecycle against a mock backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gymportal_core::api::{ApiClient, StoredBearer};
use gymportal_core::auth::{FileSessionStore, SessionService, SessionStore, StoredSession};
use gymportal_core::config::Config;
use gymportal_core::guard::{EdgeGuard, EdgeOutcome, GuardState, PageGuard, RouteTable};
use gymportal_core::models::UserProfile;
use gymportal_core::navigation::{History, NavigationKind, Navigator};
use gymportal_core::notify::{ToastKind, Toasts};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// File store that counts how many `clear` calls actually removed a token.
struct CountingStore {
    inner: FileSessionStore,
    effective_clears: AtomicUsize,
}

impl SessionStore for CountingStore {
    fn save(&self, token: &str, profile: &UserProfile) -> anyhow::Result<()> {
        self.inner.save(token, profile)
    }

    fn load(&self) -> StoredSession {
        self.inner.load()
    }

    fn load_token(&self) -> Option<String> {
        self.inner.load_token()
    }

    fn save_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        self.inner.save_profile(profile)
    }

    fn clear(&self) -> bool {
        let removed = self.inner.clear();
        if removed {
            self.effective_clears.fetch_add(1, Ordering::SeqCst);
        }
        removed
    }
}

struct Harness {
    _dir: TempDir,
    server: MockServer,
    store: Arc<CountingStore>,
    history: Arc<History>,
    toasts: Arc<Toasts>,
    api: ApiClient,
    session: SessionService,
}

impl Harness {
    async fn start(start_path: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        let store = Arc::new(CountingStore {
            inner: FileSessionStore::new(dir.path().to_path_buf()),
            effective_clears: AtomicUsize::new(0),
        });
        let history = Arc::new(History::new(start_path));
        let toasts = Arc::new(Toasts::new());
        let config = Config {
            api_url: format!("{}/api", server.uri()),
            ..Config::default()
        };
        let api = ApiClient::new(&config, Arc::new(StoredBearer::new(store.clone())), history.clone()).unwrap();
        let session = SessionService::new(api.clone(), store.clone(), history.clone(), toasts.clone());
        Self {
            _dir: dir,
            server,
            store,
            history,
            toasts,
            api,
            session,
        }
    }

    fn clears(&self) -> usize {
        self.store.effective_clears.load(Ordering::SeqCst)
    }
}

fn api_user(is_admin: bool) -> Value {
    json!({
        "id": "u-7",
        "email": "ana@olimpo.gym",
        "first_name": "Ana",
        "last_name": "Paz",
        "phone": "3764000000",
        "is_admin": is_admin
    })
}

async fn mock_login(server: &MockServer, is_admin: bool) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ana@olimpo.gym", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": api_user(is_admin),
            "token": {"access_token": "tok-1"}
        })))
        .mount(server)
        .await;
}

fn sample_profile() -> UserProfile {
    serde_json::from_value::<gymportal_core::models::ApiUser>(api_user(false))
        .unwrap()
        .into_profile()
}

#[tokio::test]
async fn no_token_denies_protected_pages_and_lands_on_login() {
    let h = Harness::start("/dashboard").await;
    let routes = RouteTable::default();

    // Edge: no cookie on a protected path.
    let edge = EdgeGuard::new(routes.clone());
    assert_eq!(
        edge.check("/dashboard", h.store.load_token().as_deref()),
        EdgeOutcome::Redirect("/login".to_string())
    );

    // Page: never renders while checking or after denial.
    for protected in ["/dashboard", "/admin/memberships"] {
        let history = History::new(protected);
        let mut guard = PageGuard::for_path(&routes, protected);
        assert_eq!(guard.evaluate(&h.session.snapshot(), &history), GuardState::Checking);
        assert!(!guard.can_render());
    }

    h.session.initialize().await;
    let mut guard = PageGuard::for_path(&routes, "/dashboard");
    assert_eq!(guard.evaluate(&h.session.snapshot(), h.history.as_ref()), GuardState::Denied);
    assert!(!guard.can_render());
    assert_eq!(h.history.current_path(), "/login");
}

#[tokio::test]
async fn login_then_sign_out_leaves_store_empty() {
    let h = Harness::start("/login").await;
    mock_login(&h.server, false).await;

    let user = h.session.login("ana@olimpo.gym", "secret").await.unwrap();
    assert_eq!(user.full_name.as_deref(), Some("Ana Paz"));
    assert_eq!(h.store.load_token().as_deref(), Some("tok-1"));
    assert!(h.session.is_authenticated());

    h.session.sign_out();
    assert_eq!(h.store.load(), StoredSession::default());
    assert!(!h.session.is_authenticated());
    assert!(h.session.user().is_none());
    let last = h.history.log().pop().unwrap();
    assert_eq!((last.kind, last.path.as_str()), (NavigationKind::Push, "/"));
}

#[tokio::test]
async fn login_lands_admins_on_admin_and_members_on_dashboard() {
    for (is_admin, landing) in [(true, "/admin"), (false, "/dashboard")] {
        let h = Harness::start("/login").await;
        mock_login(&h.server, is_admin).await;

        h.session.login("ana@olimpo.gym", "secret").await.unwrap();

        let last = h.history.log().pop().unwrap();
        assert_eq!(last.kind, NavigationKind::Assign);
        assert_eq!(last.path, landing);
        assert!(h.history.take_reload());
        assert_eq!(h.session.is_admin(), is_admin);
        assert!(!h.session.is_loading());
        assert_eq!(h.toasts.latest().map(|t| t.kind), Some(ToastKind::Success));
    }
}

#[tokio::test]
async fn failed_login_toasts_and_returns_error() {
    let h = Harness::start("/login").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Bad credentials"})))
        .mount(&h.server)
        .await;

    let err = h.session.login("ana@olimpo.gym", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(h.toasts.messages(), vec!["Invalid login credentials".to_string()]);
    assert!(!h.session.is_loading());
    assert!(!h.session.is_authenticated());
    assert!(h.history.log().is_empty());
}

#[tokio::test]
async fn login_without_token_in_response_fails() {
    let h = Harness::start("/login").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": api_user(false)})))
        .mount(&h.server)
        .await;

    let err = h.session.login("ana@olimpo.gym", "secret").await.unwrap_err();
    assert!(err.to_string().contains("no authentication token"));
    assert!(h.store.load_token().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_unauthorized_responses_clear_once_and_redirect_once() {
    let h = Harness::start("/admin/dashboard").await;
    h.store.save("stale", &sample_profile()).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let calls = (0..8).map(|_| {
        let api = h.api.clone();
        tokio::spawn(async move { api.get_json("/dashboard/stats").await })
    });
    for result in futures::future::join_all(calls).await {
        assert!(result.unwrap().unwrap_err().is_unauthorized());
    }

    assert_eq!(h.clears(), 1);
    assert_eq!(h.history.count_to("/login"), 1);
    assert!(h.store.load_token().is_none());
}

#[tokio::test]
async fn update_user_data_keeps_token() {
    let h = Harness::start("/login").await;
    mock_login(&h.server, false).await;
    h.session.login("ana@olimpo.gym", "secret").await.unwrap();

    let mut edited = h.session.user().unwrap();
    edited.full_name = Some("Ana María Paz".to_string());
    edited.phone = "3764111111".to_string();
    h.session.update_user_data(edited.clone());

    assert_eq!(h.session.user(), Some(edited.clone()));
    let stored = h.store.load();
    assert_eq!(stored.token.as_deref(), Some("tok-1"));
    assert_eq!(stored.profile, Some(edited));
}

#[tokio::test]
async fn file_store_round_trip_is_byte_stable() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().to_path_buf());
    let profile = sample_profile();

    store.save("abc", &profile).unwrap();
    let first = std::fs::read(dir.path().join("user_data.json")).unwrap();
    let loaded = store.load();
    assert_eq!(loaded.token.as_deref(), Some("abc"));
    assert_eq!(loaded.profile.as_ref(), Some(&profile));

    store.save("abc", loaded.profile.as_ref().unwrap()).unwrap();
    let second = std::fs::read(dir.path().join("user_data.json")).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn stale_token_at_startup_signs_out_with_one_redirect() {
    let h = Harness::start("/dashboard").await;
    h.store.save("stale", &sample_profile()).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let snapshot = h.session.initialize().await;
    assert!(!snapshot.loading);
    assert!(!snapshot.is_authenticated);
    assert_eq!(h.store.load(), StoredSession::default());
    assert_eq!(h.clears(), 1);
    // The check itself never navigates.
    assert!(h.history.log().is_empty());

    let mut guard = PageGuard::for_path(&RouteTable::default(), "/dashboard");
    for _ in 0..3 {
        guard.evaluate(&h.session.snapshot(), h.history.as_ref());
    }
    assert_eq!(h.history.count_to("/login"), 1);
}

#[tokio::test]
async fn profile_without_user_signs_out() {
    let h = Harness::start("/dashboard").await;
    h.store.save("tok-1", &sample_profile()).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&h.server)
        .await;

    let snapshot = h.session.initialize().await;
    assert!(!snapshot.loading);
    assert!(!snapshot.is_authenticated);
    assert!(snapshot.user.is_none());
    assert_eq!(h.store.load(), StoredSession::default());
    assert_eq!(h.clears(), 1);
    assert!(h.history.log().is_empty());
}

#[tokio::test]
async fn rejected_login_keeps_existing_session() {
    let h = Harness::start("/login").await;
    h.store.save("tok-1", &sample_profile()).unwrap();
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&h.server)
        .await;

    assert!(h.session.login("ana@olimpo.gym", "wrong").await.is_err());
    assert_eq!(h.store.load_token().as_deref(), Some("tok-1"));
    assert_eq!(h.clears(), 0);
    assert!(h.history.log().is_empty());
}

#[tokio::test]
async fn restored_session_allows_member_pages() {
    let h = Harness::start("/dashboard").await;
    h.store.save("tok-1", &sample_profile()).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": api_user(false)})))
        .mount(&h.server)
        .await;

    let snapshot = h.session.initialize().await;
    assert!(snapshot.is_authenticated);
    assert_eq!(snapshot.user.as_ref().map(|u| u.email.as_str()), Some("ana@olimpo.gym"));

    let routes = RouteTable::default();
    let mut member_page = PageGuard::for_path(&routes, "/dashboard/profile");
    assert_eq!(member_page.evaluate(&snapshot, h.history.as_ref()), GuardState::Allowed);

    let mut admin_page = PageGuard::for_path(&routes, "/admin/notifications");
    assert_eq!(admin_page.evaluate(&snapshot, h.history.as_ref()), GuardState::Denied);
    assert_eq!(h.history.current_path(), "/dashboard");
}
