use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use ems_types::{Portal, auth::TokenClaims};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand::{Rng, RngCore};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const VERIFICATION_CODE_TTL_MINUTES: i64 = 5;
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub cookie_secure: bool,
}

impl AuthConfig {
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.jwt_secret.as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.jwt_secret.as_bytes())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::days(self.token_ttl_days.max(1))
    }
}

pub fn issue_token(
    subject: Uuid,
    portal: Portal,
    role: &str,
    organization_id: Uuid,
    config: &AuthConfig,
) -> jsonwebtoken::errors::Result<String> {
    issue_token_at(subject, portal, role, organization_id, config, Utc::now())
}

pub fn issue_token_at(
    subject: Uuid,
    portal: Portal,
    role: &str,
    organization_id: Uuid,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> jsonwebtoken::errors::Result<String> {
    let exp = now
        .checked_add_signed(config.token_ttl())
        .unwrap_or(now)
        .timestamp();
    let claims = TokenClaims {
        sub: subject,
        portal,
        role: role.to_string(),
        org: organization_id,
        iat: now.timestamp(),
        exp,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &config.encoding_key())
}

pub fn decode_token(token: &str, config: &AuthConfig) -> jsonwebtoken::errors::Result<TokenClaims> {
    jsonwebtoken::decode::<TokenClaims>(token, &config.decoding_key(), &Validation::default())
        .map(|data| data.claims)
}

pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::internal(anyhow::anyhow!("hash error: {}", err)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Six-digit code mailed after signup.
pub fn generate_verification_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// 25 random bytes, hex encoded.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 25];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn session_cookie(portal: Portal, token: String, config: &AuthConfig) -> Cookie<'static> {
    let same_site = if config.cookie_secure {
        SameSite::None
    } else {
        SameSite::Lax
    };
    Cookie::build((portal.token_key(), token))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(same_site)
        .max_age(time::Duration::days(config.token_ttl_days.max(1)))
        .build()
}

pub fn clear_cookie(portal: Portal) -> Cookie<'static> {
    Cookie::build((portal.token_key(), ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret".into(),
            token_ttl_days: 7,
            cookie_secure: false,
        }
    }

    #[test]
    fn tokens_carry_portal_and_organization() {
        let subject = Uuid::new_v4();
        let org = Uuid::new_v4();
        let token = issue_token(subject, Portal::Employee, "Employee", org, &config()).unwrap();
        let claims = decode_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, subject);
        assert_eq!(claims.portal, Portal::Employee);
        assert_eq!(claims.org, org);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let issued = Utc::now() - Duration::days(30);
        let token =
            issue_token_at(Uuid::new_v4(), Portal::Hr, "HR-Admin", Uuid::new_v4(), &config(), issued)
                .unwrap();
        assert!(decode_token(&token, &config()).is_err());
    }

    #[test]
    fn tokens_signed_with_another_secret_fail() {
        let token =
            issue_token(Uuid::new_v4(), Portal::Hr, "HR-Admin", Uuid::new_v4(), &config()).unwrap();
        let other = AuthConfig {
            jwt_secret: "another".into(),
            ..config()
        };
        assert!(decode_token(&token, &other).is_err());
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn generated_secrets_have_expected_shape() {
        let code = generate_verification_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        let token = generate_reset_token();
        assert_eq!(token.len(), 50);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn cookie_uses_portal_key() {
        let cookie = session_cookie(Portal::Employee, "abc".into(), &config());
        assert_eq!(cookie.name(), "EMtoken");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
