use std::path::Path;

use url::Url;

pub const BASE_URL_VAR: &str = "BASE_URL";
pub const AUTH_COOKIE_VAR: &str = "AUTH_COOKIE";
pub const DEFAULT_IMAGE_VAR: &str = "DEFAULT_IMAGE";
pub const FALLBACK_DEFAULT_IMAGE: &str = "http://192.168.31.62:5173/files/1/default.png";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("BASE_URL is not an absolute http(s) URL: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to load env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Without a trailing slash.
    pub base_url: String,
    /// Sent verbatim as the Cookie header.
    pub auth_cookie: String,
    pub default_image: String,
}

impl Config {
    /// Reads the process environment, after merging `env_file` (or `.env`
    /// when present) into it.
    pub fn from_env(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
            None => {
                if let Err(err) = dotenvy::dotenv() {
                    if !err.not_found() {
                        tracing::warn!(error = %err, "ignoring unreadable .env file");
                    }
                }
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = read(BASE_URL_VAR).ok_or(ConfigError::Missing(BASE_URL_VAR))?;
        let auth_cookie = read(AUTH_COOKIE_VAR).ok_or(ConfigError::Missing(AUTH_COOKIE_VAR))?;
        let default_image =
            read(DEFAULT_IMAGE_VAR).unwrap_or_else(|| FALLBACK_DEFAULT_IMAGE.to_string());

        Ok(Self {
            base_url: validate_base_url(&base_url)?,
            auth_cookie,
            default_image,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(raw.trim_end_matches('/').to_string())
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
    fn reads_required_values_and_defaults_image() {
        let config = Config::from_lookup(lookup(&[
            ("BASE_URL", "http://marks.local:5173/"),
            ("AUTH_COOKIE", "session=abc; other=1"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://marks.local:5173");
        assert_eq!(config.auth_cookie, "session=abc; other=1");
        assert_eq!(config.default_image, FALLBACK_DEFAULT_IMAGE);
    }

    #[test]
    fn custom_default_image_wins() {
        let config = Config::from_lookup(lookup(&[
            ("BASE_URL", "https://marks.example"),
            ("AUTH_COOKIE", "c"),
            ("DEFAULT_IMAGE", "https://cdn.example/blank.png"),
        ]))
        .unwrap();
        assert_eq!(config.default_image, "https://cdn.example/blank.png");
    }

    #[test]
    fn missing_or_blank_required_values_fail() {
        let err = Config::from_lookup(lookup(&[("AUTH_COOKIE", "c")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(BASE_URL_VAR)));

        let err = Config::from_lookup(lookup(&[("BASE_URL", "http://x"), ("AUTH_COOKIE", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(AUTH_COOKIE_VAR)));
    }

    #[test]
    fn base_url_must_be_http() {
        for bad in ["marks.local", "ftp://marks.local", "not a url"] {
            let err = Config::from_lookup(lookup(&[("BASE_URL", bad), ("AUTH_COOKIE", "c")]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidBaseUrl(_)), "{bad}");
        }
    }

    #[test]
    fn explicit_env_file_must_exist() {
        let err = Config::from_env(Some(Path::new("/definitely/not/here.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }
}
