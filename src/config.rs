use crate::{ApiClient, Result};

/// Configuration for [`ApiClient`].
pub struct ApiClientConfig {
    pub(crate) base_url: String,
    pub(crate) token: String,
    pub(crate) user_agent: String,
}

impl ApiClientConfig {
    /// Default user agent sent with every request.
    pub const DEFAULT_USER_AGENT: &'static str =
        concat!("optimizely-client/", env!("CARGO_PKG_VERSION"));

    /// Create a configuration for the given base URL and access token.
    ///
    /// The Optimizely REST API uses personal access tokens as bearer tokens,
    /// and callers sometimes pass the full `Authorization` header value. A
    /// case-insensitive `"Bearer "` prefix is stripped here so the stored
    /// token is always the raw token.
    ///
    /// ```
    /// # use optimizely_client::ApiClientConfig;
    /// ApiClientConfig::new("https://api.optimizely.com/v2", "Bearer my-token");
    /// ```
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        ApiClientConfig {
            base_url: base_url.into(),
            token: strip_bearer_prefix(token.into()),
            user_agent: ApiClientConfig::DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Override the user agent sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Create a new [`ApiClient`] using this configuration.
    ///
    /// ```no_run
    /// # use optimizely_client::ApiClientConfig;
    /// let client = ApiClientConfig::new("https://api.optimizely.com/v2", "my-token")
    ///     .to_client()
    ///     .unwrap();
    /// ```
    pub fn to_client(self) -> Result<ApiClient> {
        ApiClient::new(self)
    }
}

fn strip_bearer_prefix(token: String) -> String {
    const PREFIX: &str = "Bearer ";
    match token.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => token[PREFIX.len()..].to_owned(),
        _ => token,
    }
}
