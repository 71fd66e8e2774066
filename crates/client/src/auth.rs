//! Session handling for both portals and the start-up auth check.

use ems_types::{
    ApiEnvelope, Portal,
    auth::{
        AuthUser, EmailOnly, HrSignup, LoginRequest, LoginResponse, NewPassword,
        VerificationState, VerifyEmail,
    },
    employee::{Employee, NewEmployee},
};
use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    client::ApiClient,
    endpoints,
    error::{ClientError, ClientResult},
    notifications::notifications_url,
};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
    portal: Portal,
}

impl ApiClient {
    pub fn auth(&self, portal: Portal) -> AuthApi<'_> {
        AuthApi {
            client: self,
            portal,
        }
    }
}

impl AuthApi<'_> {
    /// Logs in and stores the returned token for this portal.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.session("login", &body).await
    }

    /// Signs up the first HR account of an organization and keeps its token.
    pub async fn signup_hr(&self, body: &HrSignup) -> ClientResult<LoginResponse> {
        AuthApi {
            client: self.client,
            portal: Portal::Hr,
        }
        .session("signup", body)
        .await
    }

    /// Registers an employee. Acts with the HR token.
    pub async fn register_employee(&self, body: &NewEmployee) -> ClientResult<Employee> {
        self.client
            .post(Portal::Hr, &endpoints::auth(Portal::Employee, "signup"), body)
            .await
    }

    /// `Some(user)` when the stored token is accepted, `None` otherwise.
    pub async fn check_login(&self) -> ClientResult<Option<AuthUser>> {
        let path = endpoints::auth(self.portal, "check-login");
        let envelope: ApiEnvelope<AuthUser> = self.client.get_envelope(self.portal, &path).await?;
        Ok(envelope.data.filter(|_| envelope.success))
    }

    pub async fn check_verified(&self) -> ClientResult<VerificationState> {
        self.client
            .get(self.portal, &endpoints::auth(self.portal, "check-verify-email"))
            .await
    }

    pub async fn verify_email(&self, code: &str) -> ClientResult<String> {
        let body = VerifyEmail {
            verification_code: code.to_string(),
        };
        self.client
            .post_for_message(self.portal, &endpoints::auth(self.portal, "verify-email"), &body)
            .await
    }

    /// HR accounts are looked up by `email`; employees resend for the
    /// logged-in account and `email` is ignored.
    pub async fn resend_verification(&self, email: &str) -> ClientResult<String> {
        let path = endpoints::auth(self.portal, "resend-verify-email");
        match self.portal {
            Portal::Hr => {
                let body = EmailOnly {
                    email: email.to_string(),
                };
                self.client.post_for_message(self.portal, &path, &body).await
            }
            Portal::Employee => self.client.post_for_message(self.portal, &path, &json!({})).await,
        }
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<String> {
        let body = EmailOnly {
            email: email.to_string(),
        };
        self.client
            .post_for_message(self.portal, &endpoints::auth(self.portal, "forgot-password"), &body)
            .await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<String> {
        let body = NewPassword {
            password: password.to_string(),
        };
        self.client
            .post_for_message(self.portal, &endpoints::reset_password(self.portal, token), &body)
            .await
    }

    /// Tells the server and forgets the local token even if the call fails.
    pub async fn logout(&self) -> ClientResult<String> {
        let result = self
            .client
            .post_for_message(self.portal, &endpoints::auth(self.portal, "logout"), &json!({}))
            .await;
        self.client.tokens().remove(self.portal)?;
        info!(portal = %self.portal, "logged out");
        result
    }

    async fn session<B: Serialize + ?Sized>(&self, action: &str, body: &B) -> ClientResult<LoginResponse> {
        let path = endpoints::auth(self.portal, action);
        let response: LoginResponse = self
            .client
            .send_json(self.portal, Method::POST, &path, body)
            .await?;
        if response.token.is_empty() {
            return Err(ClientError::InvalidToken("server returned an empty token".into()));
        }
        self.client.tokens().set(self.portal, &response.token)?;
        info!(portal = %self.portal, user_id = %response.user.id, "session stored");
        Ok(response)
    }
}

/// Outcome of [`init_auth`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthBootstrap {
    pub initialized: bool,
    pub authenticated: bool,
    pub portal: Option<Portal>,
    pub user: Option<AuthUser>,
    pub notifications_url: Option<String>,
}

/// Restores a session from stored tokens: HR first, then employee. A token
/// the server no longer accepts is dropped.
pub async fn init_auth(client: &ApiClient) -> ClientResult<AuthBootstrap> {
    for portal in [Portal::Hr, Portal::Employee] {
        let Some(token) = client.tokens().get(portal)? else {
            debug!(%portal, "no stored token");
            continue;
        };
        match client.auth(portal).check_login().await {
            Ok(Some(user)) => {
                info!(%portal, user_id = %user.id, "session restored");
                return Ok(AuthBootstrap {
                    initialized: true,
                    authenticated: true,
                    portal: Some(portal),
                    user: Some(user),
                    notifications_url: Some(notifications_url(client.base_url(), &token)?),
                });
            }
            Ok(None) => {
                warn!(%portal, "stored token rejected by check-login");
                client.tokens().remove(portal)?;
            }
            Err(err @ ClientError::Transport(_)) => return Err(err),
            Err(err) => {
                warn!(%portal, error = %err, "check-login failed");
                client.tokens().remove(portal)?;
            }
        }
    }
    Ok(AuthBootstrap {
        initialized: true,
        ..AuthBootstrap::default()
    })
}
