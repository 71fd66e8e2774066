use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin without a trailing slash.
    pub base_url: String,
    pub token_file: PathBuf,
}

impl ClientConfig {
    pub fn new(base_url: impl AsRef<str>, token_file: impl Into<PathBuf>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            token_file: token_file.into(),
        }
    }

    /// Reads `EMS_API_URL` and `EMS_TOKEN_FILE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("EMS_API_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token_file = lookup("EMS_TOKEN_FILE")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_token_file(lookup("HOME")));
        Self::new(base_url, token_file)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn default_token_file(home: Option<String>) -> PathBuf {
    let home = home.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("ems").join("tokens.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_server() {
        let config = ClientConfig::from_lookup(lookup(&[("HOME", "/home/ada")]));
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(
            config.token_file,
            PathBuf::from("/home/ada/.config/ems/tokens.json")
        );
    }

    #[test]
    fn base_url_is_trimmed() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("EMS_API_URL", "  https://ems.example.com/ "),
            ("EMS_TOKEN_FILE", "/tmp/t.json"),
        ]));
        assert_eq!(config.base_url, "https://ems.example.com");
        assert_eq!(config.token_file, PathBuf::from("/tmp/t.json"));
    }
}
