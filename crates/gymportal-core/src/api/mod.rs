//! REST client for the gym backend.
//!
//! [`ApiClient`] owns the request plumbing (base URL, bearer token, error
//! normalization, 401 handling). The endpoint wrappers are grouped by
//! resource in the sibling modules, each an `impl ApiClient` block.
//!
//! The token comes from a [`TokenProvider`]; the default one reads the
//! session store.

pub mod admin;
pub mod attendance;
pub mod auth;
pub mod blog;
pub mod client;
pub mod error;
pub mod memberships;
pub mod products;

pub use auth::AuthOutcome;
pub use client::{ApiClient, StoredBearer, TokenProvider, UnauthorizedPolicy};
pub use error::{ApiError, DEFAULT_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE};
