//! EMS backend: token auth for the HR and Employee portals, the REST routers,
//! attendance and payroll rules, notifications and a read-only GraphQL view.

pub mod attendance;
pub mod auth;
pub mod error;
pub mod extract;
pub mod graphql;
pub mod mailer;
pub mod notify;
pub mod payroll;
pub mod routes;
pub mod seed;
pub mod state;
pub mod views;

pub use auth::AuthConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::{ApiSettings, AppState};
