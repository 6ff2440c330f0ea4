//! `/auth` endpoints.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ApiClient, ApiError, UnauthorizedPolicy};
use crate::models::{ApiUser, ProfileUpdate, Registration, UserEnvelope, UserProfile};

/// The backend has shipped the token both bare and wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenField {
    Bare(String),
    Wrapped { access_token: String },
}

impl TokenField {
    fn into_token(self) -> Option<String> {
        let token = match self {
            TokenField::Bare(t) => t,
            TokenField::Wrapped { access_token } => access_token,
        };
        (!token.is_empty()).then_some(token)
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    user: Option<ApiUser>,
    #[serde(default)]
    token: Option<TokenField>,
    #[serde(default)]
    session: Option<TokenField>,
}

impl AuthResponse {
    fn into_outcome(self) -> Result<AuthOutcome, ApiError> {
        let token = self
            .token
            .and_then(TokenField::into_token)
            .or_else(|| self.session.and_then(TokenField::into_token))
            .ok_or_else(|| ApiError::InvalidResponse("no authentication token".to_string()))?;
        let user = self
            .user
            .ok_or_else(|| ApiError::InvalidResponse("no user in authentication response".to_string()))?;
        Ok(AuthOutcome {
            token,
            user: user.into_profile(),
        })
    }
}

/// Token and mapped profile returned by login and registration.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: String,
    pub user: UserProfile,
}

fn profile_from(envelope: UserEnvelope) -> Result<UserProfile, ApiError> {
    envelope
        .user
        .map(ApiUser::into_profile)
        .ok_or_else(|| ApiError::InvalidResponse("no user in response".to_string()))
}

impl ApiClient {
    /// Exchange credentials for a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, ApiError> {
        debug!(email, "Logging in");
        let body = json!({ "email": email, "password": password });
        let response: AuthResponse = self
            .post_with("/auth/login", &body, UnauthorizedPolicy::Ignore)
            .await?;
        response.into_outcome()
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthOutcome, ApiError> {
        let response: AuthResponse = self
            .post_with("/auth/register", registration, UnauthorizedPolicy::Ignore)
            .await?;
        response.into_outcome()
    }

    /// Current user for the stored token (`GET /auth/me`).
    pub async fn fetch_profile(&self, policy: UnauthorizedPolicy) -> Result<UserProfile, ApiError> {
        let envelope: UserEnvelope = self.get_with("/auth/me", policy).await?;
        profile_from(envelope)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let envelope: UserEnvelope = self.patch("/auth/profile", update).await?;
        profile_from(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::StoredBearer;
    use crate::auth::{MemorySessionStore, SessionStore};
    use crate::config::Config;
    use crate::navigation::History;

    async fn login_against(server: &MockServer, store: Arc<MemorySessionStore>) -> Result<AuthOutcome, ApiError> {
        let config = Config {
            api_url: format!("{}/api", server.uri()),
            ..Config::default()
        };
        let client = ApiClient::new(&config, Arc::new(StoredBearer::new(store)), Arc::new(History::new("/login")))
            .unwrap();
        client.login("ana@olimpo.gym", "secret").await
    }

    async fn server_answering(status: u16, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn parse(body: &str) -> Result<AuthOutcome, ApiError> {
        serde_json::from_str::<AuthResponse>(body).unwrap().into_outcome()
    }

    #[test]
    fn test_token_shapes() {
        let user = r#""user":{"id":"u1","email":"a@b.c"}"#;
        assert_eq!(parse(&format!(r#"{{{user},"token":"t1"}}"#)).unwrap().token, "t1");
        assert_eq!(
            parse(&format!(r#"{{{user},"token":{{"access_token":"t2"}}}}"#)).unwrap().token,
            "t2"
        );
        assert_eq!(parse(&format!(r#"{{{user},"session":"t3"}}"#)).unwrap().token, "t3");
        assert_eq!(
            parse(&format!(r#"{{{user},"session":{{"access_token":"t4"}}}}"#)).unwrap().token,
            "t4"
        );
    }

    #[test]
    fn test_missing_token_is_invalid_response() {
        let err = parse(r#"{"user":{"id":"u1","email":"a@b.c"}}"#).unwrap_err();
        match err {
            ApiError::InvalidResponse(msg) => assert_eq!(msg, "no authentication token"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(parse(r#"{"user":{"id":"u1","email":"a@b.c"},"token":""}"#).is_err());
    }

    #[tokio::test]
    async fn test_login_accepts_naive_timestamps_and_numeric_id() {
        let server = server_answering(
            200,
            serde_json::json!({
                "user": {
                    "id": 42,
                    "email": "ana@olimpo.gym",
                    "created_at": "2024-05-01 10:00:00",
                    "updated_at": "yesterday"
                },
                "token": "tok"
            }),
        )
        .await;

        let outcome = login_against(&server, Arc::new(MemorySessionStore::new())).await.unwrap();
        assert_eq!(outcome.token, "tok");
        assert_eq!(outcome.user.id, "42");
        assert_eq!(outcome.user.created_at.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 10:00");
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_stored_session() {
        let server = server_answering(401, serde_json::json!({"message": "Invalid credentials"})).await;
        let store = Arc::new(MemorySessionStore::with_token("still-valid"));

        let err = login_against(&server, store.clone()).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(store.load_token().as_deref(), Some("still-valid"));
    }
}
