use axum::extract::{Request, State};
use ems_types::Portal;
use serde_json::{Value, json};

use super::{Envelope, ok};
use crate::{
    auth::decode_token,
    extract::{TokenSource, bearer_token, cookie_token, find_token, query_token},
    state::AppState,
};

/// Which token sources a request carries and what each portal would accept.
pub async fn token(State(state): State<AppState>, request: Request) -> Envelope<Value> {
    let (parts, _) = request.into_parts();
    let sources = json!({
        "hrCookie": cookie_token(&parts, Portal::Hr).is_some(),
        "employeeCookie": cookie_token(&parts, Portal::Employee).is_some(),
        "authorizationHeader": bearer_token(&parts).is_some(),
        "queryToken": query_token(&parts).is_some(),
    });

    let mut portals = serde_json::Map::new();
    for portal in [Portal::Hr, Portal::Employee] {
        let report = match find_token(&parts, portal) {
            None => json!({ "found": false }),
            Some((token, source)) => {
                let source = match source {
                    TokenSource::Cookie(owner) => owner.token_key().to_string(),
                    TokenSource::Header => "authorization".to_string(),
                    TokenSource::Query => "query".to_string(),
                };
                match decode_token(&token, &state.auth) {
                    Ok(claims) => json!({
                        "found": true,
                        "source": source,
                        "valid": true,
                        "portalMatches": claims.portal == portal,
                        "claims": claims,
                    }),
                    Err(err) => json!({
                        "found": true,
                        "source": source,
                        "valid": false,
                        "error": err.to_string(),
                    }),
                }
            }
        };
        portals.insert(portal.to_string(), report);
    }

    ok(
        "Token debug information",
        json!({ "sources": sources, "portals": portals }),
    )
}
