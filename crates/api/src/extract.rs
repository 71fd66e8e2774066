//! Request extractors: portal principals and JSON/path/query wrappers whose
//! rejections render as [`ApiError`].

use std::convert::Infallible;

use axum::{
    extract::{FromRequest, FromRequestParts, Query},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use ems_types::{
    HrRole, HrStatus, Portal,
    auth::TokenClaims,
    hr::{HrPermissions, Permission},
};
use entity::{employee, hr_profile};
use sea_orm::EntityTrait;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::decode_token,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Body<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Where a token was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenSource {
    Cookie(Portal),
    Header,
    Query,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

pub fn cookie_token(parts: &Parts, portal: Portal) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(portal.token_key())
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

pub fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|text| text.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub fn query_token(parts: &Parts) -> Option<String> {
    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.is_empty())
}

/// Token for `portal`: its cookie, then the bearer header, then `?token=`.
/// The other portal's cookie is the last resort so that a wrong-portal
/// session is reported as such rather than as a missing login.
pub fn find_token(parts: &Parts, portal: Portal) -> Option<(String, TokenSource)> {
    let other = match portal {
        Portal::Hr => Portal::Employee,
        Portal::Employee => Portal::Hr,
    };
    cookie_token(parts, portal)
        .map(|token| (token, TokenSource::Cookie(portal)))
        .or_else(|| bearer_token(parts).map(|token| (token, TokenSource::Header)))
        .or_else(|| query_token(parts).map(|token| (token, TokenSource::Query)))
        .or_else(|| cookie_token(parts, other).map(|token| (token, TokenSource::Cookie(other))))
}

fn claims_for(state: &AppState, parts: &Parts, portal: Portal) -> ApiResult<TokenClaims> {
    let (token, _) = find_token(parts, portal)
        .ok_or_else(|| ApiError::unauthorized(portal, "Not authorized, please login"))?;
    let claims = decode_token(&token, &state.auth)
        .map_err(|_| ApiError::unauthorized(portal, "Invalid or expired token"))?;
    if claims.portal != portal {
        return Err(ApiError::forbidden("Access denied for this portal"));
    }
    Ok(claims)
}

/// Authenticated HR account.
#[derive(Clone, Debug)]
pub struct HrPrincipal {
    pub profile: hr_profile::Model,
    pub claims: TokenClaims,
}

impl HrPrincipal {
    pub fn id(&self) -> Uuid {
        self.profile.id
    }

    pub fn organization_id(&self) -> Uuid {
        self.profile.organization_id
    }

    pub fn is_admin(&self) -> bool {
        self.profile.role == HrRole::Admin
    }

    pub fn permissions(&self) -> HrPermissions {
        self.profile.permissions()
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.is_admin() || self.permissions().allows(permission)
    }

    pub fn require(&self, permission: Permission) -> ApiResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "You do not have permission to perform this action",
            ))
        }
    }

    pub fn require_admin(&self) -> ApiResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Only HR-Admin can perform this action"))
        }
    }
}

pub async fn load_hr(state: &AppState, claims: TokenClaims) -> ApiResult<HrPrincipal> {
    let profile = hr_profile::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .filter(|profile| profile.organization_id == claims.org)
        .ok_or_else(|| ApiError::unauthorized(Portal::Hr, "HR account not found"))?;
    if profile.status != HrStatus::Active {
        return Err(ApiError::forbidden("HR account is not active"));
    }
    Ok(HrPrincipal { profile, claims })
}

impl FromRequestParts<AppState> for HrPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = claims_for(state, parts, Portal::Hr)?;
        load_hr(state, claims).await
    }
}

/// Authenticated employee.
#[derive(Clone, Debug)]
pub struct EmployeePrincipal {
    pub employee: employee::Model,
    pub claims: TokenClaims,
}

impl EmployeePrincipal {
    pub fn id(&self) -> Uuid {
        self.employee.id
    }

    pub fn organization_id(&self) -> Uuid {
        self.employee.organization_id
    }
}

pub async fn load_employee(state: &AppState, claims: TokenClaims) -> ApiResult<EmployeePrincipal> {
    let employee = employee::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .filter(|employee| employee.organization_id == claims.org)
        .ok_or_else(|| ApiError::unauthorized(Portal::Employee, "Employee account not found"))?;
    Ok(EmployeePrincipal { employee, claims })
}

impl FromRequestParts<AppState> for EmployeePrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = claims_for(state, parts, Portal::Employee)?;
        load_employee(state, claims).await
    }
}

/// Either portal, decided by the token's own `portal` claim.
#[derive(Clone, Debug)]
pub enum AnyPrincipal {
    Hr(HrPrincipal),
    Employee(EmployeePrincipal),
}

impl AnyPrincipal {
    pub fn id(&self) -> Uuid {
        match self {
            AnyPrincipal::Hr(hr) => hr.id(),
            AnyPrincipal::Employee(employee) => employee.id(),
        }
    }

    pub fn organization_id(&self) -> Uuid {
        match self {
            AnyPrincipal::Hr(hr) => hr.organization_id(),
            AnyPrincipal::Employee(employee) => employee.organization_id(),
        }
    }

    pub fn portal(&self) -> Portal {
        match self {
            AnyPrincipal::Hr(_) => Portal::Hr,
            AnyPrincipal::Employee(_) => Portal::Employee,
        }
    }
}

pub async fn resolve_any(state: &AppState, parts: &Parts) -> ApiResult<AnyPrincipal> {
    let token = cookie_token(parts, Portal::Hr)
        .or_else(|| cookie_token(parts, Portal::Employee))
        .or_else(|| bearer_token(parts))
        .or_else(|| query_token(parts))
        .ok_or_else(|| ApiError::Unauthorized {
            message: "Not authorized, please login".to_string(),
            portal: None,
        })?;
    let claims = decode_token(&token, &state.auth).map_err(|_| ApiError::Unauthorized {
        message: "Invalid or expired token".to_string(),
        portal: None,
    })?;
    match claims.portal {
        Portal::Hr => load_hr(state, claims).await.map(AnyPrincipal::Hr),
        Portal::Employee => load_employee(state, claims).await.map(AnyPrincipal::Employee),
    }
}

impl FromRequestParts<AppState> for AnyPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_any(state, parts).await
    }
}

/// Optional principals for endpoints that answer logged-out callers too.
pub struct MaybeHr(pub Option<HrPrincipal>);

impl FromRequestParts<AppState> for MaybeHr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeHr(
            HrPrincipal::from_request_parts(parts, state).await.ok(),
        ))
    }
}

pub struct MaybeEmployee(pub Option<EmployeePrincipal>);

impl FromRequestParts<AppState> for MaybeEmployee {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeEmployee(
            EmployeePrincipal::from_request_parts(parts, state).await.ok(),
        ))
    }
}

pub struct MaybeAny(pub Option<AnyPrincipal>);

impl FromRequestParts<AppState> for MaybeAny {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeAny(resolve_any(state, parts).await.ok()))
    }
}
