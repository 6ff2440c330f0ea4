//! Core library for the Olimpo gym portal.
//!
//! - [`api`]: REST client for the backend, with one `impl ApiClient` block
//!   per resource
//! - [`auth`]: session persistence and the session service
//! - [`guard`]: route rules plus the edge and page guards that enforce them
//! - [`navigation`], [`notify`]: the seams the front end plugs into
//! - [`models`]: wire and domain types
//! - [`config`]: on-disk configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod navigation;
pub mod notify;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthSnapshot, SessionService, SessionStore};
pub use config::Config;
pub use navigation::{History, Navigator};
pub use notify::{Notifier, Toasts};
