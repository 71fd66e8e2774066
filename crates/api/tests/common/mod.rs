#![allow(dead_code)]

use std::sync::Arc;

use api::{
    AppState, AuthConfig,
    auth::issue_token,
    mailer::MemoryMailer,
    seed::{SeededRecords, seed_demo},
    state::ApiSettings,
};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use ems_types::Portal;
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub seeded: SeededRecords,
    pub mailer: Arc<MemoryMailer>,
    pub today: NaiveDate,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub headers: HeaderMap,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

pub fn test_auth() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-secret".to_string(),
        token_ttl_days: 30,
        cookie_secure: false,
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(ApiSettings::default()).await
    }

    pub async fn with_settings(settings: ApiSettings) -> Self {
        let db: DatabaseConnection = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let today = Utc::now().date_naive();
        let seeded = seed_demo(&db, today).await.unwrap();
        let mailer = Arc::new(MemoryMailer::new());
        let state = AppState::new(db, test_auth(), settings, mailer.clone());
        let router = api::router(state.clone());
        Self {
            state,
            router,
            seeded,
            mailer,
            today,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    pub fn org_id(&self) -> Uuid {
        self.seeded.organization.id
    }

    pub fn hr_id(&self, email: &str) -> Uuid {
        self.seeded.hr_email(email).unwrap().id
    }

    pub fn employee_id(&self, email: &str) -> Uuid {
        self.seeded.employee_email(email).unwrap().id
    }

    pub fn hr_token(&self, email: &str) -> String {
        let profile = self.seeded.hr_email(email).unwrap();
        issue_token(
            profile.id,
            Portal::Hr,
            profile.role.as_str(),
            profile.organization_id,
            &self.state.auth,
        )
        .unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.hr_token(api::seed::ADMIN_EMAIL)
    }

    pub fn manager_token(&self) -> String {
        self.hr_token(api::seed::MANAGER_EMAIL)
    }

    pub fn employee_token(&self, email: &str) -> String {
        let member = self.seeded.employee_email(email).unwrap();
        issue_token(
            member.id,
            Portal::Employee,
            Portal::Employee.as_str(),
            member.organization_id,
            &self.state.auth,
        )
        .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            body,
            headers,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
