//! Client configuration passed explicitly into [`crate::DiscordClient`].

use std::fmt;

use crate::discord::constants::DEFAULT_BASE_URL;

/// Environment variable holding the account token.
pub const TOKEN_ENV_VAR: &str = "DISCORD_TOKEN";

/// Environment variable that forces the reported timezone.
pub const TIMEZONE_ENV_VAR: &str = "TZ";

/// Bearer token for the account.
///
/// The value is never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for placing into the Authorization header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Settings for a [`crate::DiscordClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin requests are sent to. Only tests point this anywhere else.
    pub base_url: String,
    /// Log method and URL of every outgoing request at info level.
    pub log_requests: bool,
    /// Timezone to report instead of detecting one.
    pub timezone: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_requests: false,
            timezone: None,
        }
    }
}

impl ClientConfig {
    /// Sets the API origin.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enables or disables request logging.
    #[must_use]
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// Forces the reported timezone.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}
