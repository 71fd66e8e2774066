//! Rust client for the EMS REST API: per-portal token handling, typed
//! resource APIs, slice state for UIs and the `ems` command line.

pub mod auth;
pub mod client;
pub mod config;
pub mod debug;
pub mod endpoints;
pub mod error;
pub mod notifications;
pub mod resources;
pub mod slice;
pub mod token_store;

pub use auth::{AuthBootstrap, init_auth};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use slice::{Slice, Status, Store};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
