use anyhow::{Context, Result, anyhow};
use api::{ApiSettings, AuthConfig};
use tracing::warn;

const DEV_JWT_SECRET: &str = "ems-development-secret-change-me";
const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";
const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub env: AppEnv,
    pub database_url: String,
    pub auth: AuthConfig,
    pub api: ApiSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let env = match var("APP_ENV").as_deref() {
            Some("production") | Some("prod") => AppEnv::Production,
            _ => AppEnv::Development,
        };
        let production = env == AppEnv::Production;

        let database_url = var("DATABASE_URL").context("DATABASE_URL missing")?;

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if production => {
                return Err(anyhow!("JWT_SECRET must be set when APP_ENV=production"));
            }
            None => {
                warn!("JWT_SECRET not set; using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };
        let token_ttl_days = match var("TOKEN_TTL_DAYS") {
            Some(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("invalid TOKEN_TTL_DAYS {raw:?}"))?,
            None => DEFAULT_TOKEN_TTL_DAYS,
        };
        let cookie_secure = flag(var("COOKIE_SECURE"), false);

        let client_url = var("CLIENT_URL")
            .unwrap_or_else(|| DEFAULT_CLIENT_URL.into())
            .trim_end_matches('/')
            .to_string();
        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|list| split_list(&list))
            .unwrap_or_else(|| vec![client_url.clone()]);
        let debug_routes = flag(var("DEBUG_ROUTES"), !production);
        let currency = var("PAYROLL_CURRENCY")
            .unwrap_or_else(|| "USD".into())
            .to_uppercase();

        Ok(Self {
            env,
            database_url,
            auth: AuthConfig {
                jwt_secret,
                token_ttl_days,
                cookie_secure,
            },
            api: ApiSettings {
                client_url,
                debug_routes,
                currency,
            },
            cors_allowed_origins,
        })
    }
}

fn flag(value: Option<String>, default: bool) -> bool {
    value
        .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim().trim_end_matches('/');
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn development_defaults() {
        let cfg = config(&[("DATABASE_URL", "sqlite::memory:")]).unwrap();
        assert_eq!(cfg.env, AppEnv::Development);
        assert_eq!(cfg.auth.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.auth.token_ttl_days, 7);
        assert!(!cfg.auth.cookie_secure);
        assert!(cfg.api.debug_routes);
        assert_eq!(cfg.api.currency, "USD");
        assert_eq!(cfg.cors_allowed_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn production_requires_a_secret() {
        let err = config(&[("DATABASE_URL", "postgres://db"), ("APP_ENV", "production")])
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let cfg = config(&[
            ("DATABASE_URL", "postgres://db"),
            ("APP_ENV", "production"),
            ("JWT_SECRET", "s3cret"),
            ("COOKIE_SECURE", "true"),
            ("PAYROLL_CURRENCY", "eur"),
        ])
        .unwrap();
        assert!(!cfg.api.debug_routes);
        assert!(cfg.auth.cookie_secure);
        assert_eq!(cfg.api.currency, "EUR");
    }

    #[test]
    fn origins_and_client_url_are_normalized() {
        let cfg = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("CLIENT_URL", "https://ems.example.com/"),
            ("CORS_ALLOWED_ORIGINS", " https://a.example.com/, ,https://b.example.com"),
        ])
        .unwrap();
        assert_eq!(cfg.api.client_url, "https://ems.example.com");
        assert_eq!(
            cfg.cors_allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn database_url_is_required() {
        assert!(config(&[]).is_err());
        assert!(config(&[("DATABASE_URL", "sqlite::memory:"), ("TOKEN_TTL_DAYS", "week")]).is_err());
    }
}
