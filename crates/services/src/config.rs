use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the trivia backend lives and how long to wait for it.
///
/// `base_url` may be absolute (`https://quiz.example/api`) or a path prefix
/// (`/api`). A path prefix is resolved against `origin`, which plays the part
/// of the page's own origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub origin: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            origin: DEFAULT_ORIGIN.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Read `TRIVIA_API_BASE_URL`, `TRIVIA_ORIGIN` and `TRIVIA_TIMEOUT_SECS`,
    /// falling back to defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base_url) = env::var("TRIVIA_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            config.base_url = base_url.trim().to_owned();
        }
        if let Some(origin) = env::var("TRIVIA_ORIGIN")
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            config.origin = origin.trim().to_owned();
        }
        if let Some(secs) = env::var("TRIVIA_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the absolute URL for a path such as `/game/start`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` when the base and path do not form a URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        match Url::parse(&raw) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&self.origin)
                .and_then(|origin| origin.join(&raw))
                .map_err(|err| ApiError::InvalidUrl(format!("{raw}: {err}"))),
            Err(err) => Err(ApiError::InvalidUrl(format!("{raw}: {err}"))),
        }
    }
}
