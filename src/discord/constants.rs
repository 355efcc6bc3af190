//! Constants for the Discord client (endpoints, client build identity, paging).
//!
//! The header and fingerprint values mirror a specific Discord desktop build on
//! Windows. They must stay byte-exact; the API compares them against known
//! client builds.

/// Default API origin.
pub const DEFAULT_BASE_URL: &str = "https://discord.com";

/// API version prefix prepended to every resource path.
pub const API_PATH_PREFIX: &str = "/api/v9";

/// Maximum page size accepted by the messages endpoint.
pub const MESSAGE_PAGE_LIMIT: usize = 100;

/// Maximum number of error-response body bytes kept for diagnostics.
pub const MAX_ERROR_BODY_BYTES: usize = 8192;

/// Referer prefix for client-side routes.
pub const REFERER_BASE: &str = "https://discord.com/channels";

/// Referer used for requests not scoped to a guild or channel.
pub const HOME_REFERER: &str = "https://discord.com/channels/@me";

/// Timezone reported when nothing better can be determined.
pub const FALLBACK_TIMEZONE: &str = "UTC";

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) discord/1.0.9202 Chrome/134.0.6998.205 Electron/35.3.0 Safari/537.36";
pub(crate) const ACCEPT: &str = "*/*";
pub(crate) const ACCEPT_ENCODING: &str = "gzip, deflate";
pub(crate) const ACCEPT_LANGUAGE: &str = "en-US,en-SE;q=0.9,en-GB;q=0.8";
pub(crate) const LOCALE: &str = "en-US";
pub(crate) const SEC_CH_UA: &str = r#""Not:A-Brand";v="24", "Chromium";v="134""#;
pub(crate) const SEC_CH_UA_MOBILE: &str = "?0";
pub(crate) const SEC_CH_UA_PLATFORM: &str = r#""Windows""#;
pub(crate) const SEC_FETCH_DEST: &str = "empty";
pub(crate) const SEC_FETCH_MODE: &str = "cors";
pub(crate) const SEC_FETCH_SITE: &str = "same-origin";
pub(crate) const DEBUG_OPTIONS: &str = "bugReporterEnabled";
pub(crate) const PRIORITY: &str = "u=1, i";

// X-Super-Properties payload
pub(crate) const CLIENT_OS: &str = "Windows";
pub(crate) const CLIENT_BROWSER: &str = "Discord Client";
pub(crate) const CLIENT_BROWSER_VERSION: &str = "35.3.0";
pub(crate) const CLIENT_OS_VERSION: &str = "10.0.26100";
pub(crate) const CLIENT_OS_ARCH: &str = "x64";
pub(crate) const CLIENT_APP_ARCH: &str = "x64";
pub(crate) const CLIENT_RELEASE_CHANNEL: &str = "stable";
pub(crate) const CLIENT_VERSION: &str = "1.0.9202";
pub(crate) const CLIENT_BUILD_NUMBER: u32 = 429_117;
pub(crate) const CLIENT_NATIVE_BUILD_NUMBER: u32 = 66_976;
pub(crate) const CLIENT_OS_SDK_VERSION: &str = "26100";
pub(crate) const CLIENT_APP_STATE: &str = "focused";
