//! HTTP client for the gym backend.
//!
//! Every call goes to `{api_url}{endpoint}` with a JSON body, carries the
//! stored bearer token when there is one, and maps failures onto
//! [`ApiError`]. A 401 always clears the stored session; whether it also
//! sends the user to the login page depends on the request's
//! [`UnauthorizedPolicy`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::ApiError;
use crate::auth::SessionStore;
use crate::config::Config;
use crate::guard::{RouteTable, LOGIN_PATH};
use crate::navigation::{strip_query, Navigator};

/// Source of the bearer token attached to requests.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;

    /// Forget the token after the server rejected it. Returns true only for
    /// the call that actually dropped it.
    fn invalidate(&self) -> bool;
}

/// Reads the token from the session store.
pub struct StoredBearer {
    store: Arc<dyn SessionStore>,
}

impl StoredBearer {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }
}

impl TokenProvider for StoredBearer {
    fn bearer_token(&self) -> Option<String> {
        self.store.load_token()
    }

    fn invalidate(&self) -> bool {
        self.store.clear()
    }
}

/// What a 401 does besides clearing the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnauthorizedPolicy {
    /// Full navigation to the login page unless the user is on a public page.
    #[default]
    Redirect,
    /// Only clear the session; the caller decides where to go.
    ClearOnly,
    /// Leave the stored session alone. For credential exchanges, where a
    /// 401 means wrong credentials rather than a dead session.
    Ignore,
}

/// API client for the gym backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    navigator: Arc<dyn Navigator>,
    routes: Arc<RouteTable>,
}

impl ApiClient {
    pub fn new(
        config: &Config,
        tokens: Arc<dyn TokenProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        Url::parse(&config.api_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            tokens,
            navigator,
            routes: Arc::new(config.routes.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path such as `/auth/me`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, self.url(endpoint))
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.tokens.bearer_token() {
            request = request.bearer_auth(token);
        }
        request
    }

    fn handle_unauthorized(&self, endpoint: &str, policy: UnauthorizedPolicy) {
        if policy == UnauthorizedPolicy::Ignore {
            debug!(endpoint, "401 on a credential exchange; session left as is");
            return;
        }
        let cleared = self.tokens.invalidate();
        if !cleared {
            debug!(endpoint, "401 with no stored session left to clear");
            return;
        }
        info!(endpoint, "Server rejected the session token; session cleared");

        if policy == UnauthorizedPolicy::Redirect {
            let location = self.navigator.current_path();
            if !self.routes.is_public(strip_query(&location)) {
                self.navigator.assign(LOGIN_PATH);
            }
        }
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
        policy: UnauthorizedPolicy,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Request failed to send");
            ApiError::Network(e)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(endpoint, policy);
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await?;
        if !status.is_success() {
            warn!(
                endpoint,
                status = status.as_u16(),
                body = %ApiError::truncate_body(&body),
                "API request failed"
            );
            return Err(ApiError::from_status(status, &body));
        }

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            warn!(endpoint, error = %e, body = %ApiError::truncate_body(body), "Unexpected response shape");
            ApiError::InvalidResponse(format!("{}: {}", endpoint, e))
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.get_with(endpoint, UnauthorizedPolicy::Redirect).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        policy: UnauthorizedPolicy,
    ) -> Result<T, ApiError> {
        self.dispatch(self.request(Method::GET, endpoint), endpoint, policy).await
    }

    /// Untyped GET for callers that only need the raw JSON.
    pub async fn get_json(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.get(endpoint).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post_with(endpoint, body, UnauthorizedPolicy::Redirect).await
    }

    pub async fn post_with<T, B>(&self, endpoint: &str, body: &B, policy: UnauthorizedPolicy) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, endpoint).json(body);
        self.dispatch(request, endpoint, policy).await
    }

    /// POST without a body, for action endpoints like `/memberships/{id}/renew`.
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let request = self
            .request(Method::POST, endpoint)
            .header(header::CONTENT_TYPE, "application/json");
        self.dispatch(request, endpoint, UnauthorizedPolicy::Redirect).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PATCH, endpoint).json(body);
        self.dispatch(request, endpoint, UnauthorizedPolicy::Redirect).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, endpoint).json(body);
        self.dispatch(request, endpoint, UnauthorizedPolicy::Redirect).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.dispatch(self.request(Method::DELETE, endpoint), endpoint, UnauthorizedPolicy::Redirect)
            .await
    }
}

/// Encode a value for use as one path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
