//! Application state for the gym portal TUI.
//!
//! The [`App`] owns the core services, the mounted page and its data.
//! Page data is fetched on background tasks; results come back over an
//! mpsc channel tagged with the mount that asked for them, so a response
//! that arrives after the user left the page is dropped.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use gymportal_core::api::{ApiClient, ApiError, StoredBearer};
use gymportal_core::auth::{self, AuthSnapshot, SessionService, SessionStore, LOGIN_FAILED_MESSAGE};
use gymportal_core::config::Config;
use gymportal_core::guard::{EdgeGuard, EdgeOutcome, GuardState, Mount, MountTicket, PageGuard, HOME_PATH, LOGIN_PATH};
use gymportal_core::models::{
    categories, prefill_message, AdminUser, BlogPost, Cart, DailyAttendance, DashboardStats, Membership,
    MembershipStatus, Notification, Product, RevenuePoint, UserProfile, PLANS,
};
use gymportal_core::navigation::{strip_query, History, Navigator};
use gymportal_core::notify::{Notifier, Toasts};

use crate::form::Form;
use crate::route::Page;
use crate::screens::{self, NotificationKind};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background results channel
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Seconds a toast stays in the status bar
pub const TOAST_TTL_SECS: i64 = 4;

/// Edge redirects followed for one navigation before giving up
const MAX_EDGE_REDIRECTS: usize = 4;

/// Rows moved by PageUp/PageDown
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Maximum length of a search query
pub const MAX_SEARCH_LEN: usize = 64;

pub const BLOG_PATH: &str = "/blog";
pub const ADMIN_MEMBERSHIPS_PATH: &str = "/admin/memberships";

/// Shortcuts listed on the home page.
pub const HOME_SHORTCUTS: [(&str, &str); 5] = [
    ("See our classes", "/classes"),
    ("Membership plans", "/memberships"),
    ("Visit the shop", "/shop"),
    ("Read the blog", "/blog"),
    ("Talk to us", "/contact"),
];

/// Entries of the admin menu.
pub const ADMIN_LINKS: [(&str, &str); 3] = [
    ("Dashboard", "/admin/dashboard"),
    ("Memberships", "/admin/memberships"),
    ("Notifications", "/admin/notifications"),
];

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    /// A form has the keyboard.
    Editing,
    ShowingMenu,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Outcome of a background task.
#[derive(Debug)]
pub enum Loaded {
    Posts(Vec<BlogPost>),
    Post(BlogPost),
    Products(Vec<Product>),
    MyMemberships(Vec<Membership>),
    Memberships(Vec<Membership>),
    Membership(Membership),
    Users(Vec<AdminUser>),
    Stats(DashboardStats),
    Revenue(Vec<RevenuePoint>),
    DailyAttendance(Vec<DailyAttendance>),
    Renewed,
    AutoRenewSet { id: String, auto_renew: bool },
    ExpiredChecked,
    MembershipSaved(&'static str),
    ProfileSaved(UserProfile),
    NotificationSent,
    LoginFinished { email: String, ok: bool },
    Failed { fallback: &'static str, error: ApiError },
}

/// A result plus the mount it belongs to. Untagged results are always applied.
#[derive(Debug)]
struct Delivery {
    ticket: Option<MountTicket>,
    result: Loaded,
}

async fn deliver(tx: mpsc::Sender<Delivery>, delivery: Delivery) {
    if tx.send(delivery).await.is_err() {
        debug!("Results channel closed");
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Step a category filter: none, then each category in turn, then none.
fn next_category(current: Option<&str>, all: &[String]) -> Option<String> {
    match current {
        None => all.first().cloned(),
        Some(c) => all
            .iter()
            .position(|x| x == c)
            .and_then(|i| all.get(i + 1))
            .cloned(),
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionService,
    pub api: ApiClient,
    store: Arc<dyn SessionStore>,
    pub history: Arc<History>,
    pub toasts: Arc<Toasts>,
    edge: EdgeGuard,
    session_changes: watch::Receiver<AuthSnapshot>,

    // Mounted page
    pub state: AppState,
    pub page: Page,
    /// Location the page was mounted for, query included.
    pub location: String,
    pub guard: PageGuard,
    mount: Mount,
    pending: usize,

    // Page-local UI state
    pub selection: usize,
    pub search_query: String,
    pub form: Form,
    /// Link produced by the contact or WhatsApp forms.
    pub link: Option<String>,

    // Page data
    pub posts: Vec<BlogPost>,
    pub post: Option<BlogPost>,
    pub blog_category: Option<String>,
    pub products: Vec<Product>,
    pub product_category: Option<String>,
    pub cart: Cart,
    pub my_memberships: Vec<Membership>,
    pub memberships: Vec<Membership>,
    pub status_filter: Option<MembershipStatus>,
    pub editing: Option<Membership>,
    pub users: Vec<AdminUser>,
    pub stats: Option<DashboardStats>,
    pub revenue: Vec<RevenuePoint>,
    pub daily_attendance: Vec<DailyAttendance>,
    pub notification_kind: NotificationKind,
    pub recipients: BTreeSet<String>,

    tx: mpsc::Sender<Delivery>,
    rx: mpsc::Receiver<Delivery>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let store = auth::store_for(&config)?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        let history = Arc::new(History::new(HOME_PATH));
        let toasts = Arc::new(Toasts::new());
        let api = ApiClient::new(&config, Arc::new(StoredBearer::new(store.clone())), history.clone())?;
        let session = SessionService::new(api.clone(), store.clone(), history.clone(), toasts.clone());
        let session_changes = session.subscribe();
        let edge = EdgeGuard::new(config.routes.clone());
        let guard = PageGuard::for_path(&config.routes, HOME_PATH);
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            session,
            api,
            store,
            history,
            toasts,
            edge,
            session_changes,
            state: AppState::Normal,
            page: Page::Home,
            location: String::new(),
            guard,
            mount: Mount::new(),
            pending: 0,
            selection: 0,
            search_query: String::new(),
            form: Form::default(),
            link: None,
            posts: Vec::new(),
            post: None,
            blog_category: None,
            products: Vec::new(),
            product_category: None,
            cart: Cart::default(),
            my_memberships: Vec::new(),
            memberships: Vec::new(),
            status_filter: None,
            editing: None,
            users: Vec::new(),
            stats: None,
            revenue: Vec::new(),
            daily_attendance: Vec::new(),
            notification_kind: NotificationKind::Email,
            recipients: BTreeSet::new(),
            tx,
            rx,
        })
    }

    /// First page load: check the stored session and mount the start page.
    pub fn start(&mut self) {
        self.begin_page_load();
        self.mount_location(self.history.current_path());
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0 || self.session.is_loading()
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// What a full page load does: forget in-memory state and re-run the
    /// session check.
    fn begin_page_load(&mut self) {
        info!(location = %self.history.current_path(), "Page load");
        self.session.reset();
        self.cart.clear();
        let session = self.session.clone();
        tokio::spawn(async move {
            session.initialize().await;
        });
    }

    /// Bring the mounted page in line with the current location.
    pub fn reconcile_location(&mut self) {
        let reload = self.history.take_reload();
        if reload {
            self.begin_page_load();
        }
        let location = self.history.current_path();
        if reload || location != self.location {
            self.mount_location(location);
        }
    }

    /// Run the edge check for `location`, then mount what it settles on.
    fn mount_location(&mut self, mut location: String) {
        for _ in 0..MAX_EDGE_REDIRECTS {
            let token = self.store.load_token();
            match self.edge.check(strip_query(&location), token.as_deref()) {
                EdgeOutcome::Continue => break,
                EdgeOutcome::Redirect(to) => {
                    info!(from = %location, to = %to, "Edge redirect");
                    self.history.replace(&to);
                    location = to;
                }
            }
        }
        self.mount_page(location);
    }

    fn mount_page(&mut self, location: String) {
        self.mount.unmount();
        let path = strip_query(&location).to_string();
        self.page = Page::from_path(&path);
        self.guard = PageGuard::for_path(&self.config.routes, &path);
        self.location = location;
        self.mount.mount();
        self.reset_page_state();
        debug!(path = %path, page = ?self.page, access = ?self.guard.access(), "Mounted page");
        self.evaluate_guard();
    }

    fn reset_page_state(&mut self) {
        self.pending = 0;
        self.selection = 0;
        self.search_query.clear();
        self.form = Form::default();
        self.link = None;
        self.post = None;
        self.editing = None;
        self.recipients.clear();
        if matches!(self.state, AppState::Editing | AppState::Searching) {
            self.state = AppState::Normal;
        }
    }

    /// Re-run the page guard; starts the page once it is allowed.
    fn evaluate_guard(&mut self) {
        let before = self.guard.state();
        let snapshot = self.session.snapshot();
        let after = self.guard.evaluate(&snapshot, self.history.as_ref());
        if before == GuardState::Checking && after == GuardState::Allowed {
            self.on_page_allowed(&snapshot);
        }
    }

    fn check_session_changes(&mut self) {
        if self.session_changes.has_changed().unwrap_or(false) {
            let _ = self.session_changes.borrow_and_update();
            self.evaluate_guard();
        }
    }

    /// Start the page: seed its form and fire its fetches.
    fn on_page_allowed(&mut self, snapshot: &AuthSnapshot) {
        match self.page.clone() {
            Page::Login => {
                let (email, password) = self.config.login_prefill();
                self.form = screens::login_form(&email, &password);
                self.state = AppState::Editing;
            }
            Page::Contact => {
                self.form = screens::contact_form(prefill_message(&self.location));
            }
            Page::Profile => {
                if let Some(user) = &snapshot.user {
                    self.form = screens::profile_form(user);
                }
            }
            Page::Blog => {
                self.spawn_request("Could not load the blog", |api| async move {
                    api.fetch_posts().await.map(Loaded::Posts)
                });
            }
            Page::BlogPost(id) => {
                self.spawn_request("Could not load the post", move |api| async move {
                    api.fetch_post(&id).await.map(Loaded::Post)
                });
            }
            Page::Shop => {
                self.spawn_request("Could not load products", |api| async move {
                    api.fetch_products().await.map(Loaded::Products)
                });
            }
            Page::Dashboard => {
                if let Some(user_id) = snapshot.user.as_ref().map(|u| u.id.clone()) {
                    self.spawn_request("Could not load your memberships", move |api| async move {
                        api.fetch_user_memberships(&user_id).await.map(Loaded::MyMemberships)
                    });
                }
            }
            Page::AdminDashboard => {
                self.spawn_request("Could not load statistics", |api| async move {
                    api.fetch_dashboard_stats().await.map(Loaded::Stats)
                });
                self.spawn_request("Could not load revenue", |api| async move {
                    api.fetch_revenue().await.map(Loaded::Revenue)
                });
                self.spawn_request("Could not load attendance", |api| async move {
                    api.fetch_daily_attendance().await.map(Loaded::DailyAttendance)
                });
            }
            Page::AdminMemberships => self.fetch_memberships(),
            Page::AdminMembershipCreate => {
                self.form = screens::create_membership_form(&self.users, today());
                self.fetch_users();
            }
            Page::AdminMembershipEdit(id) => {
                self.spawn_request("Could not load the membership", move |api| async move {
                    api.fetch_membership(&id).await.map(Loaded::Membership)
                });
            }
            Page::AdminNotifications => {
                self.form = screens::notification_form(self.notification_kind, &self.users, today());
                self.fetch_users();
            }
            Page::Home | Page::Classes | Page::Memberships | Page::Location | Page::Admin | Page::NotFound => {}
        }
    }

    // ========================================================================
    // Background tasks
    // ========================================================================

    /// Run `request` off the UI thread on behalf of the mounted page.
    fn spawn_request<F, Fut>(&mut self, fallback: &'static str, request: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Loaded, ApiError>> + Send + 'static,
    {
        let Some(ticket) = self.mount.ticket() else {
            return;
        };
        self.pending += 1;
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match request(api).await {
                Ok(loaded) => loaded,
                Err(error) => Loaded::Failed { fallback, error },
            };
            deliver(tx, Delivery { ticket: Some(ticket), result }).await;
        });
    }

    fn fetch_users(&mut self) {
        self.spawn_request("Could not load users", |api| async move {
            api.fetch_users().await.map(Loaded::Users)
        });
    }

    fn fetch_memberships(&mut self) {
        self.spawn_request("Could not load memberships", |api| async move {
            api.fetch_memberships().await.map(Loaded::Memberships)
        });
    }

    /// Apply finished background work, then follow any navigation it caused.
    pub fn check_background_tasks(&mut self) {
        let mut deliveries = Vec::new();
        while let Ok(delivery) = self.rx.try_recv() {
            deliveries.push(delivery);
        }

        for delivery in deliveries {
            if let Some(ticket) = delivery.ticket {
                if !self.mount.accepts(ticket) {
                    debug!(?ticket, "Dropping result for a page that is no longer mounted");
                    continue;
                }
                self.pending = self.pending.saturating_sub(1);
            }
            self.apply(delivery.result);
        }

        self.reconcile_location();
        self.check_session_changes();
    }

    fn apply(&mut self, result: Loaded) {
        match result {
            Loaded::Posts(posts) => {
                debug!(count = posts.len(), "Loaded posts");
                self.posts = posts;
            }
            Loaded::Post(post) => self.post = Some(post),
            Loaded::Products(products) => self.products = products,
            Loaded::MyMemberships(memberships) => self.my_memberships = memberships,
            Loaded::Memberships(memberships) => {
                self.memberships = memberships;
                self.clamp_selection();
            }
            Loaded::Membership(membership) => {
                self.form = screens::edit_membership_form(&membership);
                self.editing = Some(membership);
            }
            Loaded::Users(users) => {
                self.users = users;
                match self.page {
                    Page::AdminMembershipCreate => {
                        self.form.set_options("user", screens::user_options(&self.users));
                    }
                    Page::AdminNotifications => {
                        self.form.set_options("email", screens::recipient_options(&self.users));
                    }
                    _ => {}
                }
            }
            Loaded::Stats(stats) => self.stats = Some(stats),
            Loaded::Revenue(revenue) => self.revenue = revenue,
            Loaded::DailyAttendance(daily) => self.daily_attendance = daily,
            Loaded::Renewed => {
                self.toasts.success("Membership renewed");
                self.fetch_memberships();
            }
            Loaded::AutoRenewSet { id, auto_renew } => {
                if let Some(m) = self.memberships.iter_mut().find(|m| m.id == id) {
                    m.auto_renew = auto_renew;
                }
                self.toasts.success(if auto_renew { "Auto-renew enabled" } else { "Auto-renew disabled" });
            }
            Loaded::ExpiredChecked => {
                self.toasts.success("Expired memberships updated");
                self.fetch_memberships();
            }
            Loaded::MembershipSaved(message) => {
                self.form.submitting = false;
                self.toasts.success(message);
                self.history.push(ADMIN_MEMBERSHIPS_PATH);
            }
            Loaded::ProfileSaved(profile) => {
                self.session.update_user_data(profile);
                self.form.submitting = false;
                screens::clear_passwords(&mut self.form);
                self.toasts.success("Profile updated");
            }
            Loaded::NotificationSent => {
                self.toasts.success("Notification sent");
                self.recipients.clear();
                self.form = screens::notification_form(self.notification_kind, &self.users, today());
            }
            Loaded::LoginFinished { email, ok } => self.finish_login(email, ok),
            Loaded::Failed { fallback, error } => self.handle_failure(fallback, error),
        }
    }

    fn handle_failure(&mut self, fallback: &'static str, error: ApiError) {
        self.form.submitting = false;
        if error.is_unauthorized() {
            // The client already ended the session.
            debug!(error = %error, "Request rejected as unauthorized");
            return;
        }
        if matches!(self.page, Page::BlogPost(_)) && error.is_not_found() {
            self.toasts.error("Post not found");
            self.history.push(BLOG_PATH);
            return;
        }
        warn!(error = %error, page = ?self.page, "Request failed");
        self.toasts.error(&error.user_message(fallback));
    }

    // ========================================================================
    // Session actions
    // ========================================================================

    pub fn open_login(&mut self) {
        self.history.push(LOGIN_PATH);
    }

    pub fn submit_login(&mut self) {
        if let Some(label) = self.form.missing_required() {
            self.form.error = Some(format!("{} is required", label));
            return;
        }
        let email = self.form.text("email");
        let password = self.form.text("password");
        self.form.submitting = true;
        self.form.error = None;

        let session = self.session.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let ok = session.login(&email, &password).await.is_ok();
            deliver(tx, Delivery { ticket: None, result: Loaded::LoginFinished { email, ok } }).await;
        });
    }

    fn finish_login(&mut self, email: String, ok: bool) {
        if ok {
            self.config.last_email = Some(email);
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }
            return;
        }
        if self.page == Page::Login {
            self.form.submitting = false;
            self.form.error = Some(LOGIN_FAILED_MESSAGE.to_string());
            self.form.set_text("password", "");
        }
    }

    pub fn sign_out(&mut self) {
        if !self.session.is_authenticated() && self.store.load_token().is_none() {
            self.toasts.info("Not signed in");
            return;
        }
        self.session.sign_out();
        self.toasts.info("Signed out");
    }

    // ========================================================================
    // Lists and selection
    // ========================================================================

    pub fn filtered_posts(&self) -> Vec<&BlogPost> {
        self.posts
            .iter()
            .filter(|p| p.in_category(self.blog_category.as_deref()))
            .filter(|p| p.matches_search(&self.search_query))
            .collect()
    }

    pub fn blog_categories(&self) -> Vec<String> {
        categories(&self.posts)
    }

    pub fn product_categories(&self) -> Vec<String> {
        let set: BTreeSet<String> = self.products.iter().filter_map(|p| p.category.clone()).collect();
        set.into_iter().collect()
    }

    pub fn filtered_products(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| self.product_category.is_none() || p.category == self.product_category)
            .filter(|p| {
                self.search_query.is_empty()
                    || p.name.to_lowercase().contains(&self.search_query.to_lowercase())
            })
            .collect()
    }

    pub fn filtered_memberships(&self) -> Vec<&Membership> {
        self.memberships
            .iter()
            .filter(|m| self.status_filter.map_or(true, |s| m.status_kind() == Some(s)))
            .filter(|m| m.matches_search(&self.search_query))
            .collect()
    }

    /// Rows in the mounted page's selectable list.
    pub fn list_len(&self) -> usize {
        match self.page {
            Page::Home => HOME_SHORTCUTS.len(),
            Page::Blog => self.filtered_posts().len(),
            Page::Shop => self.filtered_products().len(),
            Page::Memberships => PLANS.len(),
            Page::Admin => ADMIN_LINKS.len(),
            Page::AdminMemberships => self.filtered_memberships().len(),
            Page::AdminNotifications => self.users.len(),
            _ => 0,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.list_len();
        if len == 0 {
            self.selection = 0;
            return;
        }
        let next = self.selection as isize + delta;
        self.selection = next.clamp(0, len as isize - 1) as usize;
    }

    pub fn clamp_selection(&mut self) {
        let len = self.list_len();
        if self.selection >= len {
            self.selection = len.saturating_sub(1);
        }
    }

    /// Enter on a list row.
    pub fn activate_selection(&mut self) {
        match self.page {
            Page::Home => {
                if let Some((_, path)) = HOME_SHORTCUTS.get(self.selection) {
                    self.history.push(path);
                }
            }
            Page::Blog => {
                if let Some(id) = self.filtered_posts().get(self.selection).map(|p| p.id.clone()) {
                    self.history.push(&format!("{}/{}", BLOG_PATH, urlencoding::encode(&id)));
                }
            }
            Page::Shop => self.add_selected_to_cart(),
            Page::Memberships => self.choose_plan(),
            Page::Admin => {
                if let Some((_, path)) = ADMIN_LINKS.get(self.selection) {
                    self.history.push(path);
                }
            }
            Page::AdminMemberships => self.edit_selected_membership(),
            _ => {}
        }
    }

    // ========================================================================
    // Public pages
    // ========================================================================

    pub fn cycle_category(&mut self) {
        match self.page {
            Page::Blog => {
                self.blog_category = next_category(self.blog_category.as_deref(), &self.blog_categories());
            }
            Page::Shop => {
                self.product_category = next_category(self.product_category.as_deref(), &self.product_categories());
            }
            _ => return,
        }
        self.selection = 0;
    }

    pub fn add_selected_to_cart(&mut self) {
        let Some(product) = self.filtered_products().get(self.selection).map(|p| (*p).clone()) else {
            return;
        };
        if !product.available {
            self.toasts.error("This product is out of stock");
            return;
        }
        self.cart.add(&product.id);
        self.toasts.success(&format!("Added {} to the cart", product.name));
    }

    pub fn remove_selected_from_cart(&mut self) {
        if let Some(id) = self.filtered_products().get(self.selection).map(|p| p.id.clone()) {
            self.cart.remove(&id);
        }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.toasts.info("Cart emptied");
    }

    pub fn choose_plan(&mut self) {
        if let Some(plan) = PLANS.get(self.selection) {
            info!(plan = plan.id, "Plan chosen");
            self.history.push(&plan.contact_path());
        }
    }

    pub fn submit_contact(&mut self) {
        let request = screens::contact_request(&self.form);
        if let Err(message) = request.validate() {
            self.form.error = Some(message);
            return;
        }
        self.form.error = None;
        self.link = Some(request.whatsapp_url(&self.config.whatsapp_phone));
        self.toasts.success("Your WhatsApp message is ready");
        self.state = AppState::Normal;
    }

    // ========================================================================
    // Member pages
    // ========================================================================

    pub fn submit_profile(&mut self) {
        if let Some(label) = self.form.missing_required() {
            self.form.error = Some(format!("{} is required", label));
            return;
        }
        let update = match screens::profile_update(&self.form) {
            Ok(update) => update,
            Err(message) => {
                self.toasts.error(&message);
                self.form.error = Some(message);
                return;
            }
        };
        self.form.submitting = true;
        self.form.error = None;
        self.spawn_request("Could not update the profile", move |api| async move {
            api.update_profile(&update).await.map(Loaded::ProfileSaved)
        });
    }

    // ========================================================================
    // Admin pages
    // ========================================================================

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(MembershipStatus::ALL[0]),
            Some(s) if s == MembershipStatus::ALL[MembershipStatus::ALL.len() - 1] => None,
            Some(s) => Some(s.next()),
        };
        self.selection = 0;
    }

    fn selected_membership(&self) -> Option<Membership> {
        self.filtered_memberships().get(self.selection).map(|m| (*m).clone())
    }

    pub fn renew_selected_membership(&mut self) {
        let Some(membership) = self.selected_membership() else {
            return;
        };
        self.spawn_request("Could not renew the membership", move |api| async move {
            api.renew_membership(&membership.id).await.map(|_| Loaded::Renewed)
        });
    }

    pub fn toggle_selected_auto_renew(&mut self) {
        let Some(membership) = self.selected_membership() else {
            return;
        };
        let auto_renew = !membership.auto_renew;
        let id = membership.id;
        self.spawn_request("Could not change auto-renew", move |api| async move {
            api.set_auto_renew(&id, auto_renew)
                .await
                .map(|_| Loaded::AutoRenewSet { id, auto_renew })
        });
    }

    pub fn check_expired_memberships(&mut self) {
        self.spawn_request("Could not check expired memberships", |api| async move {
            api.check_expired_memberships().await.map(|_| Loaded::ExpiredChecked)
        });
    }

    pub fn edit_selected_membership(&mut self) {
        if let Some(membership) = self.selected_membership() {
            self.history.push(&format!(
                "{}/edit/{}",
                ADMIN_MEMBERSHIPS_PATH,
                urlencoding::encode(&membership.id)
            ));
        }
    }

    pub fn create_membership(&mut self) {
        self.history.push(&format!("{}/create", ADMIN_MEMBERSHIPS_PATH));
    }

    pub fn submit_membership(&mut self) {
        match self.page.clone() {
            Page::AdminMembershipCreate => match screens::new_membership(&self.form) {
                Ok(request) => {
                    self.form.submitting = true;
                    self.spawn_request("Could not create the membership", move |api| async move {
                        api.create_membership(&request)
                            .await
                            .map(|_| Loaded::MembershipSaved("Membership created"))
                    });
                }
                Err(message) => self.form.error = Some(message),
            },
            Page::AdminMembershipEdit(id) => match screens::membership_update(&self.form) {
                Ok(update) => {
                    self.form.submitting = true;
                    self.spawn_request("Could not update the membership", move |api| async move {
                        api.update_membership(&id, &update)
                            .await
                            .map(|_| Loaded::MembershipSaved("Membership updated"))
                    });
                }
                Err(message) => self.form.error = Some(message),
            },
            _ => {}
        }
    }

    pub fn cycle_notification_kind(&mut self) {
        self.notification_kind = self.notification_kind.next();
        self.form = screens::notification_form(self.notification_kind, &self.users, today());
        self.link = None;
    }

    /// Add or remove the selected user from the bulk email recipients.
    pub fn toggle_recipient(&mut self) {
        let Some(email) = self.users.get(self.selection).map(|u| u.email.clone()) else {
            return;
        };
        if !self.recipients.remove(&email) {
            self.recipients.insert(email);
        }
    }

    pub fn submit_notification(&mut self) {
        let notification = match screens::notification(self.notification_kind, &self.form, &self.users, &self.recipients) {
            Ok(n) => n,
            Err(message) => {
                self.form.error = Some(message);
                return;
            }
        };
        if let Notification::WhatsApp(message) = &notification {
            self.link = Some(message.send_url());
        }
        info!(endpoint = notification.endpoint(), "Sending notification");
        self.form.submitting = true;
        self.form.error = None;
        self.spawn_request("Could not send the notification", move |api| async move {
            api.send_notification(&notification).await.map(|_| Loaded::NotificationSent)
        });
    }

    /// Remount the current page, refetching its data.
    pub fn refresh(&mut self) {
        let location = self.history.current_path();
        self.mount_location(location);
    }

    pub fn go_back(&mut self) {
        if !self.history.back() {
            debug!("Already at the first history entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymportal_core::auth::{MemorySessionStore, StoredSession};

    fn app_with(store: Arc<MemorySessionStore>) -> App {
        // Nothing listens on this port.
        let config = Config {
            api_url: "http://127.0.0.1:9/api".to_string(),
            ..Config::default()
        };
        App::with_store(config, store).unwrap()
    }

    #[tokio::test]
    async fn test_protected_location_without_token_lands_on_login() {
        let mut app = app_with(Arc::new(MemorySessionStore::new()));
        app.history.push("/admin/memberships");
        app.start();
        assert_eq!(app.page, Page::Login);
        assert_eq!(app.history.current_path(), "/login");
        assert_eq!(app.guard.state(), GuardState::Checking);
        assert!(!app.guard.can_render());
    }

    #[tokio::test]
    async fn test_public_page_renders_after_session_settles() {
        let mut app = app_with(Arc::new(MemorySessionStore::new()));
        app.history.push("/memberships");
        app.start();
        assert_eq!(app.guard.state(), GuardState::Checking);

        app.session.initialize().await;
        app.check_background_tasks();
        assert_eq!(app.guard.state(), GuardState::Allowed);
        assert_eq!(app.list_len(), PLANS.len());
    }

    #[tokio::test]
    async fn test_late_result_for_unmounted_page_is_dropped() {
        let mut app = app_with(Arc::new(MemorySessionStore::new()));
        app.start();
        let stale = app.mount.ticket();

        app.history.push("/classes");
        app.check_background_tasks();
        assert_eq!(app.page, Page::Classes);

        let post: BlogPost = serde_json::from_value(serde_json::json!({
            "id": "p-1",
            "title": "Hola",
            "excerpt": "",
            "content": ""
        }))
        .unwrap();
        app.tx
            .send(Delivery { ticket: stale, result: Loaded::Posts(vec![post]) })
            .await
            .unwrap();
        app.check_background_tasks();
        assert!(app.posts.is_empty());
    }

    #[tokio::test]
    async fn test_full_navigation_resets_session_state() {
        let mut app = app_with(Arc::new(MemorySessionStore::new()));
        app.start();
        app.session.initialize().await;
        app.check_background_tasks();
        assert!(!app.session.is_loading());

        app.history.assign("/");
        app.check_background_tasks();
        assert!(app.session.snapshot().user.is_none());
        assert!(app.session.is_loading());
        assert_eq!(app.guard.state(), GuardState::Checking);
    }

    #[tokio::test]
    async fn test_sign_out_clears_store_and_goes_home() {
        let store = Arc::new(MemorySessionStore::with_token("tok"));
        let mut app = app_with(store.clone());
        app.start();
        app.history.push("/dashboard");
        app.check_background_tasks();

        app.sign_out();
        app.check_background_tasks();
        assert_eq!(store.load(), StoredSession::default());
        assert_eq!(app.page, Page::Home);
    }

    #[tokio::test]
    async fn test_plan_choice_prefills_contact_form() {
        let mut app = app_with(Arc::new(MemorySessionStore::new()));
        app.history.push("/memberships");
        app.start();
        app.session.initialize().await;
        app.check_background_tasks();

        app.selection = 1;
        app.activate_selection();
        app.check_background_tasks();
        app.session.initialize().await;
        app.check_background_tasks();

        assert_eq!(app.page, Page::Contact);
        assert_eq!(app.form.text("message"), PLANS[1].enquiry);
    }

    #[tokio::test]
    async fn test_contact_submit_validates_and_builds_link() {
        let mut app = app_with(Arc::new(MemorySessionStore::new()));
        app.history.push("/contact");
        app.start();
        app.session.initialize().await;
        app.check_background_tasks();

        app.submit_contact();
        assert!(app.form.error.is_some());
        assert!(app.link.is_none());

        app.form.set_text("name", "Ana");
        app.form.set_text("email", "ana@olimpo.gym");
        app.form.set_text("message", "Hola");
        app.submit_contact();
        assert!(app.form.error.is_none());
        assert!(app
            .link
            .as_deref()
            .is_some_and(|l| l.starts_with("https://api.whatsapp.com/send/?phone=")));
    }

    #[test]
    fn test_next_category_wraps_to_none() {
        let all = vec!["Fuerza".to_string(), "Nutrición".to_string()];
        assert_eq!(next_category(None, &all).as_deref(), Some("Fuerza"));
        assert_eq!(next_category(Some("Fuerza"), &all).as_deref(), Some("Nutrición"));
        assert_eq!(next_category(Some("Nutrición"), &all), None);
        assert_eq!(next_category(None, &[]), None);
    }
}
