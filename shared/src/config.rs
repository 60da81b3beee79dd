//! Backend endpoint configuration
//!
//! Values are supplied by the build environment. Nothing here falls back to
//! baked-in credentials; a missing value becomes a [`ConfigError`] that the UI
//! shows as a warning.

use std::time::Duration;
use url::Url;

/// Bound on the initial session lookup
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(8);
/// Bound on a password sign-in round trip
pub const DEFAULT_SIGN_IN_TIMEOUT: Duration = Duration::from_secs(10);
/// Bound on list queries
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("backend URL is not set")]
    MissingUrl,
    #[error("backend API key is not set")]
    MissingKey,
    #[error("backend URL is invalid: {0}")]
    InvalidUrl(String),
    #[error("backend URL must use http or https, got {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub session_check: Duration,
    pub sign_in: Duration,
    pub query: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            session_check: DEFAULT_SESSION_TIMEOUT,
            sign_in: DEFAULT_SIGN_IN_TIMEOUT,
            query: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    url: Url,
    anon_key: String,
    pub timeouts: Timeouts,
}

impl BackendConfig {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        let anon_key = anon_key.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if anon_key.is_empty() {
            return Err(ConfigError::MissingKey);
        }

        let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        Ok(Self {
            url: parsed,
            anon_key: anon_key.to_string(),
            timeouts: Timeouts::default(),
        })
    }

    /// Builds a config from optional environment values.
    pub fn from_values(url: Option<&str>, anon_key: Option<&str>) -> Result<Self, ConfigError> {
        let url = url.ok_or(ConfigError::MissingUrl)?;
        let anon_key = anon_key.ok_or(ConfigError::MissingKey)?;
        Self::new(url, anon_key)
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub fn base_url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    /// Absolute URL for a path under the backend root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// Like [`BackendConfig::endpoint`], with form-encoded query parameters.
    pub fn endpoint_with_query<'a>(
        &self,
        path: &str,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> String {
        let mut url = self.url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|segment| !segment.is_empty()));
        }
        url.query_pairs_mut().extend_pairs(params);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values() {
        assert_eq!(
            BackendConfig::from_values(None, Some("key")),
            Err(ConfigError::MissingUrl)
        );
        assert_eq!(
            BackendConfig::from_values(Some("https://example.supabase.co"), None),
            Err(ConfigError::MissingKey)
        );
        assert_eq!(
            BackendConfig::new("https://example.supabase.co", "   "),
            Err(ConfigError::MissingKey)
        );
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            BackendConfig::new("not a url", "key"),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert_eq!(
            BackendConfig::new("ftp://example.com", "key"),
            Err(ConfigError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_endpoint_joining() {
        let config = BackendConfig::new("https://example.supabase.co/", "key").unwrap();
        assert_eq!(
            config.endpoint("/rest/v1/clients"),
            "https://example.supabase.co/rest/v1/clients"
        );
        assert_eq!(
            config.endpoint("auth/v1/user"),
            "https://example.supabase.co/auth/v1/user"
        );
        assert_eq!(config.timeouts, Timeouts::default());
    }

    #[test]
    fn test_endpoint_with_query() {
        let config = BackendConfig::new("https://example.supabase.co", "key").unwrap();
        assert_eq!(
            config.endpoint_with_query(
                "rest/v1/client_comments",
                [("select", "*"), ("client_id", "eq.42"), ("order", "created_at.asc")]
            ),
            "https://example.supabase.co/rest/v1/client_comments?select=*&client_id=eq.42&order=created_at.asc"
        );
    }
}
