//! Application configuration
//!
//! Settings are read from an optional YAML file and then overlaid with
//! environment variables, so secrets never have to live in the file:
//!
//! ```yaml
//! api_base_url: https://api.themoviedb.org/3/
//! api_token: eyJhbGciOi...
//! language: en-US
//! paging:
//!   popular_page_size: 10
//!   search_page_size: 10
//! rate_limit:
//!   requests_per_second: 40
//!   burst_size: 20
//! ```

use crate::api::DEFAULT_API_BASE_URL;
use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::model::DEFAULT_IMAGE_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable holding the bearer (read access) token
pub const ENV_API_TOKEN: &str = "CINENOOK_API_TOKEN";
/// Environment variable holding the v3 api key
pub const ENV_API_KEY: &str = "CINENOOK_API_KEY";
/// Environment variable overriding the API base URL
pub const ENV_API_BASE_URL: &str = "CINENOOK_API_BASE_URL";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL for poster and backdrop images
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Bearer token; preferred over `api_key` when both are set
    #[serde(default)]
    pub api_token: Option<String>,

    /// Legacy query-parameter key
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_timeout")]
    pub connect_timeout_secs: u64,

    /// Sent as the `language` query parameter (e.g. `en-US`)
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub paging: PagingSettings,

    /// Client-side throttle; unset means no throttling
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            api_token: None,
            api_key: None,
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_timeout(),
            language: None,
            paging: PagingSettings::default(),
            rate_limit: None,
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Page sizes per listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingSettings {
    #[serde(default = "default_page_size")]
    pub popular_page_size: usize,

    #[serde(default = "default_page_size")]
    pub search_page_size: usize,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            popular_page_size: default_page_size(),
            search_page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Load from an optional file, overlay the process environment and
    /// validate the result
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Overlay `CINENOOK_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlay variables resolved by `lookup`; empty values are ignored
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(base) = get(ENV_API_BASE_URL) {
            self.api_base_url = base;
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check URLs, page sizes and that some credential is present
    pub fn validate(&self) -> Result<()> {
        check_url("api_base_url", &self.api_base_url)?;
        check_url("image_base_url", &self.image_base_url)?;

        if self.credentials().is_none() {
            return Err(Error::missing_field(format!(
                "api_token (or {ENV_API_TOKEN} / {ENV_API_KEY})"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be positive"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "connect_timeout_secs",
                "must be positive",
            ));
        }
        if self.paging.popular_page_size == 0 {
            return Err(Error::invalid_value(
                "paging.popular_page_size",
                "must be positive",
            ));
        }
        if self.paging.search_page_size == 0 {
            return Err(Error::invalid_value(
                "paging.search_page_size",
                "must be positive",
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Derived settings
    // ========================================================================

    /// Credentials to attach to every request
    pub fn credentials(&self) -> Credentials {
        if let Some(token) = non_blank(&self.api_token) {
            Credentials::bearer(token)
        } else if let Some(key) = non_blank(&self.api_key) {
            Credentials::api_key(key)
        } else {
            Credentials::None
        }
    }

    /// Transport configuration
    pub fn to_http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.api_base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .credentials(self.credentials());

        builder = match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        if let Some(language) = &self.language {
            builder = builder.default_query("language", language);
        }
        builder.build()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn check_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| Error::invalid_value(field, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_yaml("{}").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "https://api.themoviedb.org/3/");
        assert_eq!(config.image_base_url, "https://image.tmdb.org/t/p/");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.paging.popular_page_size, 10);
        assert_eq!(config.paging.search_page_size, 10);
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r"
api_base_url: http://localhost:8080/3/
api_token: secret-token
language: de-DE
timeout_secs: 5
paging:
  popular_page_size: 20
rate_limit:
  requests_per_second: 10
  burst_size: 5
";
        let config = AppConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080/3/");
        assert_eq!(config.api_token.as_deref(), Some("secret-token"));
        assert_eq!(config.language.as_deref(), Some("de-DE"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.paging.popular_page_size, 20);
        assert_eq!(config.paging.search_page_size, 10);
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(10, 5)));
        config.validate().unwrap();
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_key: abc123").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = AppConfig::from_file("/nonexistent/cinenook.yaml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = AppConfig::from_yaml("paging: [1, 2").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = AppConfig::from_yaml("api_token: from-file").unwrap();

        config.apply_env_from(env(&[
            (ENV_API_TOKEN, "from-env"),
            (ENV_API_BASE_URL, "http://127.0.0.1:9000/"),
            (ENV_API_KEY, ""),
        ]));

        assert_eq!(config.api_token.as_deref(), Some("from-env"));
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000/");
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_credentials_prefer_token() {
        let mut config = AppConfig {
            api_token: Some("token".to_string()),
            api_key: Some("key".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.credentials(), Credentials::bearer("token"));

        config.api_token = Some("  ".to_string());
        assert_eq!(config.credentials(), Credentials::api_key("key"));

        config.api_key = None;
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_validate_requires_credentials() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = AppConfig {
            api_key: Some("key".to_string()),
            ..AppConfig::default()
        };

        let bad_url = AppConfig {
            api_base_url: "not a url".to_string(),
            ..base.clone()
        };
        assert!(matches!(
            bad_url.validate().unwrap_err(),
            Error::InvalidConfigValue { ref field, .. } if field == "api_base_url"
        ));

        let bad_scheme = AppConfig {
            image_base_url: "ftp://images.example/".to_string(),
            ..base.clone()
        };
        assert!(bad_scheme.validate().is_err());

        let zero_page = AppConfig {
            paging: PagingSettings {
                popular_page_size: 0,
                search_page_size: 10,
            },
            ..base.clone()
        };
        assert!(zero_page.validate().is_err());

        let zero_connect = AppConfig {
            connect_timeout_secs: 0,
            ..base.clone()
        };
        assert!(matches!(
            zero_connect.validate().unwrap_err(),
            Error::InvalidConfigValue { ref field, .. } if field == "connect_timeout_secs"
        ));

        base.validate().unwrap();
    }

    #[test]
    fn test_to_http_config() {
        let config = AppConfig {
            api_token: Some("token".to_string()),
            language: Some("en-US".to_string()),
            timeout_secs: 12,
            rate_limit: Some(RateLimiterConfig::new(4, 2)),
            ..AppConfig::default()
        };

        let http = config.to_http_config();

        assert_eq!(http.base_url.as_deref(), Some(DEFAULT_API_BASE_URL));
        assert_eq!(http.timeout, Duration::from_secs(12));
        assert_eq!(http.connect_timeout, Duration::from_secs(30));
        assert_eq!(http.credentials, Credentials::bearer("token"));
        assert_eq!(http.default_query.get("language").map(String::as_str), Some("en-US"));
        assert_eq!(http.rate_limit, Some(RateLimiterConfig::new(4, 2)));
    }
}
