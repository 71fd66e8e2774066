//! Inspection of stored tokens without contacting the server.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use ems_types::Portal;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::{
    error::{ClientError, ClientResult},
    token_store::TokenStore,
};

const PREVIEW_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReport {
    pub key: &'static str,
    pub present: bool,
    pub preview: Option<String>,
    pub claims: Option<Value>,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: Option<bool>,
    pub decode_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthDebugState {
    pub checked_at: DateTime<Utc>,
    pub tokens: Vec<TokenReport>,
}

/// Decodes the payload segment of a JWT. The signature is not checked.
pub fn decode_claims(token: &str) -> ClientResult<Value> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| ClientError::InvalidToken("expected three dot-separated segments".into()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| ClientError::InvalidToken(err.to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn preview(token: &str) -> String {
    let head: String = token.chars().take(PREVIEW_LEN).collect();
    if token.chars().count() > PREVIEW_LEN {
        format!("{head}...")
    } else {
        head
    }
}

pub fn inspect_token(key: &'static str, token: Option<&str>, now: DateTime<Utc>) -> TokenReport {
    let mut report = TokenReport {
        key,
        present: token.is_some(),
        preview: token.map(preview),
        claims: None,
        expires_at: None,
        expired: None,
        decode_error: None,
    };
    let Some(token) = token else {
        return report;
    };
    match decode_claims(token) {
        Ok(claims) => {
            report.expires_at = claims
                .get("exp")
                .and_then(Value::as_i64)
                .and_then(|exp| DateTime::from_timestamp(exp, 0));
            report.expired = report.expires_at.map(|at| at <= now);
            report.claims = Some(claims);
        }
        Err(err) => report.decode_error = Some(err.to_string()),
    }
    report
}

pub fn debug_auth_state(store: &dyn TokenStore, now: DateTime<Utc>) -> ClientResult<AuthDebugState> {
    let mut tokens = Vec::new();
    for portal in [Portal::Hr, Portal::Employee] {
        let token = store.get(portal)?;
        tokens.push(inspect_token(portal.token_key(), token.as_deref(), now));
    }
    Ok(AuthDebugState {
        checked_at: now,
        tokens,
    })
}

pub fn clear_all_tokens(store: &dyn TokenStore) -> ClientResult<()> {
    for portal in [Portal::Hr, Portal::Employee] {
        store.remove(portal)?;
    }
    info!("all stored tokens cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_store::MemoryTokenStore;
    use serde_json::json;

    fn token_with(payload: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    #[test]
    fn reports_expiry_from_payload() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let live = token_with(json!({ "sub": "a", "portal": "HR", "exp": 1_700_000_600 }));
        let stale = token_with(json!({ "sub": "b", "portal": "Employee", "exp": 1_600_000_000 }));

        let store = MemoryTokenStore::new();
        store.set(Portal::Hr, &live).unwrap();
        store.set(Portal::Employee, &stale).unwrap();
        let state = debug_auth_state(&store, now).unwrap();

        let hr = &state.tokens[0];
        assert_eq!(hr.key, "HRtoken");
        assert_eq!(hr.expired, Some(false));
        assert_eq!(hr.claims.as_ref().unwrap()["portal"], "HR");
        assert_eq!(hr.preview.as_deref().map(str::len), Some(PREVIEW_LEN + 3));

        let employee = &state.tokens[1];
        assert_eq!(employee.key, "EMtoken");
        assert_eq!(employee.expired, Some(true));
    }

    #[test]
    fn garbage_tokens_are_reported_not_fatal() {
        let report = inspect_token("HRtoken", Some("not-a-jwt"), Utc::now());
        assert!(report.present);
        assert!(report.claims.is_none());
        assert!(report.decode_error.is_some());
        assert_eq!(report.preview.as_deref(), Some("not-a-jwt"));

        let missing = inspect_token("EMtoken", None, Utc::now());
        assert!(!missing.present);
        assert!(missing.preview.is_none());
    }

    #[test]
    fn clearing_removes_both_portals() {
        let store = MemoryTokenStore::new();
        store.set(Portal::Hr, "a").unwrap();
        store.set(Portal::Employee, "b").unwrap();
        clear_all_tokens(&store).unwrap();
        assert_eq!(store.get(Portal::Hr).unwrap(), None);
        assert_eq!(store.get(Portal::Employee).unwrap(), None);
    }
}
