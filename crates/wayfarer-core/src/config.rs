//! Runtime configuration for the cache and its HTTP collaborator.

use std::time::Duration;

/// Default base URL of the itinerary REST API.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// A connectivity verdict younger than this is reused without probing.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(10);

/// Deadline for a single health probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Deadline for regular API requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by the connectivity prober and the HTTP client.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Base URL of the REST API, usually ending in `/api`
    pub api_url: String,
    /// Bearer token attached to every API request
    pub auth_token: Option<String>,
    /// How long a connectivity verdict stays trusted
    pub freshness_window: Duration,
    /// Deadline for the reachability probe
    pub probe_timeout: Duration,
    /// Deadline for list and mutation requests
    pub request_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl CacheConfig {
    /// Creates a configuration with default timings for the given API URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// API base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// URL of the backend health endpoint.
    ///
    /// The health route lives at the server root, so a trailing `/api`
    /// segment is stripped from the API URL before `/health` is appended.
    pub fn health_url(&self) -> String {
        let base = self.api_base();
        let root = base.strip_suffix("/api").unwrap_or(base);
        format!("{root}/health")
    }
}
