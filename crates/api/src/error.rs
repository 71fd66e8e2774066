use std::sync::Arc;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use ems_types::{ErrorBody, Portal};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::clear_cookie;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    /// `portal` names the cookie to clear on the way out.
    #[error("{message}")]
    Unauthorized {
        message: String,
        portal: Option<Portal>,
    },
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(portal: Portal, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            portal: Some(portal),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(Arc::new(err.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(value: DbErr) -> Self {
        Self::internal(value)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(Arc::new(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut clear = None;
        let body = match &self {
            ApiError::Internal(err) => {
                error!(error = ?err, "request failed");
                ErrorBody {
                    success: false,
                    message: self.to_string(),
                    gologin: None,
                }
            }
            ApiError::Unauthorized { message, portal } => {
                warn!(%message, "unauthorized request");
                clear = *portal;
                ErrorBody {
                    success: false,
                    message: message.clone(),
                    gologin: Some(true),
                }
            }
            other => ErrorBody {
                success: false,
                message: other.to_string(),
                gologin: None,
            },
        };
        let mut response = (status, Json(body)).into_response();
        if let Some(portal) = clear {
            if let Ok(value) = HeaderValue::from_str(&clear_cookie(portal).to_string()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_masked() {
        let err = ApiError::internal(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "internal server error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_clears_portal_cookie() {
        let response = ApiError::unauthorized(Portal::Hr, "token expired").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(cookie.starts_with("HRtoken="));
        assert!(cookie.contains("Max-Age=0"));
    }
}
