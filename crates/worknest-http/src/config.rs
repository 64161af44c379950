//! Connection settings for `HttpClient`

use std::time::Duration;

/// Header the API reads the acting member from
pub const ACTOR_HEADER: &str = "x-worknest-actor";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api/v1";

#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    /// API root every request path is appended to, including the namespace
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub proxy: Option<String>,
    pub user_agent: String,
    /// Sent with every request
    pub headers: Vec<(String, String)>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            proxy: None,
            user_agent: format!("worknest-client/{}", env!("CARGO_PKG_VERSION")),
            headers: Vec::new(),
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Attribute every request to `actor` in the server's audit trail
    pub fn with_actor(self, actor: impl Into<String>) -> Self {
        self.with_header(ACTOR_HEADER, actor)
    }

    pub fn actor(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(ACTOR_HEADER))
            .map(|(_, value)| value.as_str())
    }
}
