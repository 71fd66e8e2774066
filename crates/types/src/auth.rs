use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::Portal;

/// HR signup: the first HR account of an organization creates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrSignup {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub contact_number: String,
    /// Organization name.
    pub name: String,
    pub description: String,
    #[serde(rename = "OrganizationURL")]
    pub organization_url: String,
    #[serde(rename = "OrganizationMail")]
    pub organization_mail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmail {
    #[serde(alias = "verificationcode")]
    pub verification_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailOnly {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPassword {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationState {
    pub is_verified: bool,
}

/// Identity returned by login and check-login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub portal: Portal,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub organization_id: Uuid,
    pub is_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    pub user: AuthUser,
}

/// JWT payload as issued by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub portal: Portal,
    pub role: String,
    pub org: Uuid,
    pub iat: i64,
    pub exp: i64,
}
