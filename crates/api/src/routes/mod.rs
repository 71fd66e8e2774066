//! REST surface. Every handler answers with an [`ApiEnvelope`].

use std::collections::HashMap;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
};
use ems_types::ApiEnvelope;
use entity::employee;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::MaybeAny,
    state::AppState,
};

pub mod applicants;
pub mod attendance;
pub mod auth;
pub mod balances;
pub mod calendar;
pub mod dashboard;
pub mod debug;
pub mod departments;
pub mod employees;
pub mod hr_profiles;
pub mod interviews;
pub mod leaves;
pub mod notices;
pub mod organization;
pub mod recruitment;
pub mod requests;
pub mod salaries;
pub mod schedules;
pub mod ws;

pub type Envelope<T> = Json<ApiEnvelope<T>>;
pub type Created<T> = (StatusCode, Json<ApiEnvelope<T>>);

pub fn ok<T>(message: impl Into<String>, data: T) -> Envelope<T> {
    Json(ApiEnvelope::ok(message, data))
}

pub fn created<T>(message: impl Into<String>, data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiEnvelope::ok(message, data)))
}

pub fn done(message: impl Into<String>) -> Envelope<()> {
    Json(ApiEnvelope::message(message))
}

pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        .nest("/employee", employees::router())
        .nest("/HR", hr_profiles::router())
        .nest("/department", departments::router())
        .nest("/salary", salaries::router())
        .nest("/leave", leaves::router())
        .nest("/attendance", attendance::router())
        .nest("/generate-request", requests::router())
        .nest("/recruitment", recruitment::router())
        .nest("/applicant", applicants::router())
        .nest("/interview-insights", interviews::router())
        .nest("/corporate-calendar", calendar::router())
        .nest("/organization", organization::router())
        .nest("/schedule", schedules::router())
        .nest("/notice", notices::router())
        .nest("/balance", balances::router())
        .nest("/dashboard", dashboard::router());

    let mut app = Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/graphql", get(graphql).post(graphql))
        .route("/ws", get(ws::upgrade))
        .nest("/api/auth/HR", auth::hr_router())
        .nest("/api/auth/employee", auth::employee_router())
        .nest("/api/v1", v1);

    if state.settings.debug_routes {
        app = app
            .route("/graphiql", get(graphiql))
            .route("/api/debug/token", get(debug::token));
    }

    app.with_state(state)
}

async fn root() -> Envelope<()> {
    done("EMS API is running")
}

async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let db_ok = state.db.ping().await.is_ok();
    Json(json!({
        "ok": true,
        "dbOk": db_ok,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn graphql(
    State(state): State<AppState>,
    MaybeAny(principal): MaybeAny,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(principal) = principal {
        request = request.data(principal);
    }
    state.schema.0.execute(request).await.into()
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Trimmed value of a mandatory text field.
pub(crate) fn required(value: &str, field: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Lower-cased address of the form `local@domain.tld`.
pub(crate) fn normalize_email(value: &str) -> ApiResult<String> {
    let email = value.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    Ok(email)
}

pub(crate) async fn employee_in_org<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    employee_id: Uuid,
) -> ApiResult<employee::Model> {
    employee::Entity::find_by_id(employee_id)
        .one(db)
        .await?
        .filter(|model| model.organization_id == organization_id)
        .ok_or_else(|| ApiError::not_found("Employee not found"))
}

/// Full names of the organization's employees keyed by id.
pub(crate) async fn employee_names<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
) -> ApiResult<HashMap<Uuid, String>> {
    Ok(employee::Entity::find()
        .filter(employee::Column::OrganizationId.eq(organization_id))
        .all(db)
        .await?
        .into_iter()
        .map(|model| (model.id, model.full_name()))
        .collect())
}

pub(crate) fn json_data<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization() {
        assert_eq!(
            normalize_email("  Jane.Doe@Acme.TEST ").unwrap(),
            "jane.doe@acme.test"
        );
        for bad in ["", "jane", "jane@", "@acme.test", "jane@acme", "ja ne@acme.test", "a@b@c.d"] {
            assert!(normalize_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn required_fields_are_trimmed() {
        assert_eq!(required("  Ops ", "name").unwrap(), "Ops");
        let err = required("   ", "name").unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }
}
