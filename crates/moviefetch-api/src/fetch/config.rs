//! `FetchConfig` - per-request transport settings.

use std::time::Duration;

use reqwest::Client;

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Default read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(2000);

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Transport settings applied to every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct FetchConfig {
    /// Connect phase bound.
    connect_timeout: Duration,
    /// Bound on each read (response head and body).
    read_timeout: Duration,
    /// User-Agent header value.
    user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            user_agent: String::from(DEFAULT_USER_AGENT),
        }
    }
}

impl FetchConfig {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::new()
    }

    /// Connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Read timeout.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// User-Agent header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Builds a single-use HTTP client.
    ///
    /// Idle pooling is disabled, so the connection is closed as soon as the
    /// response is dropped.
    pub(crate) fn http_client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .pool_max_idle_per_host(0)
            .gzip(true)
            .build()
    }
}

/// Builder for `FetchConfig`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct FetchConfigBuilder {
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl FetchConfigBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            connect_timeout: None,
            read_timeout: None,
            user_agent: None,
        }
    }

    /// Sets the connect timeout (default: 2000ms).
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the read timeout (default: 2000ms).
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent (default: `moviefetch-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the config, filling unset fields with defaults.
    #[must_use]
    pub fn build(self) -> FetchConfig {
        let defaults = FetchConfig::default();
        FetchConfig {
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            read_timeout: self.read_timeout.unwrap_or(defaults.read_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}
