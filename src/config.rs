use std::{env, net::IpAddr, ops::RangeInclusive, path::PathBuf, str::FromStr};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// `maxResults` and `videos.list` ids are both capped at 50 per call.
pub const MAX_TOP_POOL: u32 = 50;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No GEMINI_API_KEY found. Please set it in your environment or .env file.")]
    MissingGeminiKey,
    #[error("{name} has invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub history_path: PathBuf,
    pub token_path: PathBuf,
    pub client_secrets_path: PathBuf,
    pub redirect_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub youtube_api_base: String,
    pub refresh_interval_secs: u64,
    pub top_pool_size: u32,
    pub open_browser: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let gemini_api_key = var("GEMINI_API_KEY").ok_or(ConfigError::MissingGeminiKey)?;
        let port = parsed(&var, "PORT", 8080)?;
        let redirect_url = var("OAUTH_REDIRECT_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}/oauth/callback"));

        Ok(Self {
            host: parsed(&var, "HOST", IpAddr::from([127, 0, 0, 1]))?,
            port,
            history_path: var("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("channel_history.csv")),
            token_path: var("TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("token.json")),
            client_secrets_path: var("CLIENT_SECRETS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("client_secret.json")),
            redirect_url,
            gemini_api_key,
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: var("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            youtube_api_base: var("YOUTUBE_API_BASE")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE.to_string()),
            refresh_interval_secs: in_range(
                parsed(&var, "REFRESH_INTERVAL_SECS", 60)?,
                "REFRESH_INTERVAL_SECS",
                1..=u64::MAX,
            )?,
            top_pool_size: in_range(
                parsed(&var, "TOP_VIDEOS_POOL", 20)?,
                "TOP_VIDEOS_POOL",
                1..=MAX_TOP_POOL,
            )?,
            open_browser: parsed(&var, "OPEN_BROWSER", true)?,
        })
    }
}

fn parsed<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn in_range<T: PartialOrd + ToString>(
    value: T,
    name: &'static str,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_gemini_key_is_fatal() {
        assert!(matches!(config_from(&[]), Err(ConfigError::MissingGeminiKey)));
        assert!(matches!(
            config_from(&[("GEMINI_API_KEY", "  ")]),
            Err(ConfigError::MissingGeminiKey)
        ));
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("GEMINI_API_KEY", "k")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.history_path, PathBuf::from("channel_history.csv"));
        assert_eq!(config.token_path, PathBuf::from("token.json"));
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.redirect_url, "http://localhost:8080/oauth/callback");
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.top_pool_size, 20);
        assert!(config.open_browser);
    }

    #[test]
    fn redirect_follows_port() {
        let config = config_from(&[("GEMINI_API_KEY", "k"), ("PORT", "9000")]).unwrap();
        assert_eq!(config.redirect_url, "http://localhost:9000/oauth/callback");
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = config_from(&[("GEMINI_API_KEY", "k"), ("TOP_VIDEOS_POOL", "many")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "TOP_VIDEOS_POOL", .. }));
    }

    #[test]
    fn pool_must_fit_one_api_page() {
        for value in ["0", "51"] {
            let err =
                config_from(&[("GEMINI_API_KEY", "k"), ("TOP_VIDEOS_POOL", value)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "TOP_VIDEOS_POOL", .. }));
        }
        let config = config_from(&[("GEMINI_API_KEY", "k"), ("TOP_VIDEOS_POOL", "50")]).unwrap();
        assert_eq!(config.top_pool_size, MAX_TOP_POOL);
    }

    #[test]
    fn zero_refresh_interval_is_rejected() {
        let err = config_from(&[("GEMINI_API_KEY", "k"), ("REFRESH_INTERVAL_SECS", "0")])
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: "REFRESH_INTERVAL_SECS", ref value } if value == "0"
        ));
    }
}
