use ems_types::Portal;
use reqwest::StatusCode;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with an error envelope.
    #[error("{message} ({status})")]
    Api {
        status: StatusCode,
        message: String,
        gologin: bool,
    },
    #[error("no {0} token stored; log in first")]
    NotAuthenticated(Portal),
    #[error("token storage failed: {0}")]
    Storage(#[from] std::io::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unsupported url scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("response from {0} carried no data")]
    MissingData(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// True when the user has to log in again.
    pub fn requires_login(&self) -> bool {
        match self {
            ClientError::Api {
                status, gologin, ..
            } => *gologin || *status == StatusCode::UNAUTHORIZED,
            ClientError::NotAuthenticated(_) => true,
            _ => false,
        }
    }

    /// Message shown to the user; server messages pass through unchanged.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
