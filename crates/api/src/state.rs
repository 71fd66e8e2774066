use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::AuthConfig,
    graphql::{AppSchema, build_schema},
    mailer::Mailer,
    notify::NotificationHub,
};

/// Server-wide knobs that are not part of token handling.
#[derive(Clone, Debug)]
pub struct ApiSettings {
    /// Front-end origin used to build links in outgoing mail.
    pub client_url: String,
    pub debug_routes: bool,
    pub currency: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            client_url: "http://localhost:5173".to_string(),
            debug_routes: false,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthConfig>,
    pub settings: Arc<ApiSettings>,
    pub mailer: Arc<dyn Mailer>,
    pub hub: NotificationHub,
    pub schema: AppSchema,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        auth: AuthConfig,
        settings: ApiSettings,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let auth = Arc::new(auth);
        let settings = Arc::new(settings);
        let schema = build_schema(db.clone(), settings.clone());
        Self {
            db,
            auth,
            settings,
            mailer,
            hub: NotificationHub::new(),
            schema,
        }
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/auth/reset-password/{}",
            self.settings.client_url.trim_end_matches('/'),
            token
        )
    }
}
