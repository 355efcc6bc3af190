//! Desktop-client header profile.
//!
//! Every request carries the same header set a Discord desktop build sends:
//! fixed literals, a timezone, a Referer derived from the resource path, and
//! the base64 `X-Super-Properties` fingerprint.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue,
    REFERER, USER_AGENT,
};
use serde::Serialize;
use tracing::warn;

use super::constants;
use super::error::ApiError;
use crate::config::{Credential, TIMEZONE_ENV_VAR};

const X_SUPER_PROPERTIES: &str = "x-super-properties";
const X_DISCORD_LOCALE: &str = "x-discord-locale";
const X_DISCORD_TIMEZONE: &str = "x-discord-timezone";
const X_DEBUG_OPTIONS: &str = "x-debug-options";
const SEC_FETCH_DEST: &str = "sec-fetch-dest";
const SEC_FETCH_MODE: &str = "sec-fetch-mode";
const SEC_FETCH_SITE: &str = "sec-fetch-site";
const SEC_CH_UA: &str = "sec-ch-ua";
const SEC_CH_UA_MOBILE: &str = "sec-ch-ua-mobile";
const SEC_CH_UA_PLATFORM: &str = "sec-ch-ua-platform";
const PRIORITY: &str = "priority";

/// Client metadata serialized into the `X-Super-Properties` header.
#[derive(Debug, Serialize)]
struct SuperProperties<'a> {
    os: &'a str,
    browser: &'a str,
    release_channel: &'a str,
    client_version: &'a str,
    os_version: &'a str,
    os_arch: &'a str,
    app_arch: &'a str,
    system_locale: &'a str,
    has_client_mods: bool,
    client_build_number: u32,
    native_build_number: u32,
    browser_user_agent: &'a str,
    browser_version: &'a str,
    os_sdk_version: &'a str,
    client_event_source: Option<&'a str>,
    launch_signature: &'a str,
    client_heartbeat_session_id: &'a str,
    client_app_state: &'a str,
}

impl SuperProperties<'static> {
    fn desktop() -> Self {
        Self {
            os: constants::CLIENT_OS,
            browser: constants::CLIENT_BROWSER,
            release_channel: constants::CLIENT_RELEASE_CHANNEL,
            client_version: constants::CLIENT_VERSION,
            os_version: constants::CLIENT_OS_VERSION,
            os_arch: constants::CLIENT_OS_ARCH,
            app_arch: constants::CLIENT_APP_ARCH,
            system_locale: constants::LOCALE,
            has_client_mods: false,
            client_build_number: constants::CLIENT_BUILD_NUMBER,
            native_build_number: constants::CLIENT_NATIVE_BUILD_NUMBER,
            browser_user_agent: constants::USER_AGENT,
            browser_version: constants::CLIENT_BROWSER_VERSION,
            os_sdk_version: constants::CLIENT_OS_SDK_VERSION,
            client_event_source: None,
            launch_signature: "",
            client_heartbeat_session_id: "",
            client_app_state: constants::CLIENT_APP_STATE,
        }
    }
}

/// Builds the base64 `X-Super-Properties` value.
///
/// # Errors
///
/// Returns the serialization error; callers treat it as "omit the header".
pub fn super_properties() -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(&SuperProperties::desktop())?;
    Ok(STANDARD.encode(json))
}

/// Returns the Referer a desktop client would send for an API path.
///
/// `/guilds/<id>/...` maps to the guild page, `/channels/<id>/...` to the DM
/// page, everything else to the home page.
#[must_use]
pub fn referer_for_path(path: &str) -> String {
    let mut segments = path.split('/').skip(1);
    let scope = segments.next();
    let id = segments.next().filter(|segment| !segment.is_empty());

    match (scope, id) {
        (Some("guilds"), Some(id)) => format!("{}/{id}", constants::REFERER_BASE),
        (Some("channels"), Some(id)) => format!("{}/@me/{id}", constants::REFERER_BASE),
        _ => constants::HOME_REFERER.to_string(),
    }
}

/// Picks the timezone to report: explicit override, then the environment,
/// then the system zone, then `UTC`.
#[must_use]
pub fn resolve_timezone(
    override_tz: Option<&str>,
    env_tz: Option<&str>,
    system_tz: Option<&str>,
) -> String {
    [override_tz, env_tz, system_tz]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|tz| !tz.is_empty())
        .unwrap_or(constants::FALLBACK_TIMEZONE)
        .to_string()
}

/// Detects the timezone from `TZ`, falling back to an already resolved
/// system zone.
#[must_use]
pub fn detect_timezone(override_tz: Option<&str>, system_tz: Option<&str>) -> String {
    let env_tz = std::env::var(TIMEZONE_ENV_VAR).ok();
    let env_tz = env_tz.as_deref().map(|tz| tz.trim_start_matches(':'));
    resolve_timezone(override_tz, env_tz, system_tz)
}

/// Reads the host zone from `/etc/timezone` or the `/etc/localtime` symlink.
#[cfg(unix)]
#[must_use]
pub fn system_timezone() -> Option<String> {
    if let Ok(contents) = std::fs::read_to_string("/etc/timezone") {
        let zone = contents.trim();
        if !zone.is_empty() {
            return Some(zone.to_string());
        }
    }
    let target = std::fs::read_link("/etc/localtime").ok()?;
    zone_from_localtime_target(&target.to_string_lossy())
}

#[cfg(not(unix))]
#[must_use]
pub fn system_timezone() -> Option<String> {
    None
}

fn zone_from_localtime_target(target: &str) -> Option<String> {
    target
        .split_once("zoneinfo/")
        .map(|(_, zone)| zone.trim().to_string())
        .filter(|zone| !zone.is_empty())
}

/// Fixed headers plus the credential; produces the per-path header set.
#[derive(Clone)]
pub struct HeaderProfile {
    authorization: HeaderValue,
    timezone_override: Option<String>,
    system_timezone: Option<String>,
}

impl std::fmt::Debug for HeaderProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderProfile")
            .field("authorization", &"<redacted>")
            .field("timezone_override", &self.timezone_override)
            .field("system_timezone", &self.system_timezone)
            .finish()
    }
}

impl HeaderProfile {
    /// Creates a profile for the given credential.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the token is blank or contains
    /// bytes not allowed in a header value.
    pub fn new(
        credential: &Credential,
        timezone_override: Option<String>,
    ) -> Result<Self, ApiError> {
        if credential.is_blank() {
            return Err(ApiError::validation("a Discord token is required"));
        }
        let mut authorization = HeaderValue::from_str(credential.expose())
            .map_err(|_| ApiError::validation("the Discord token contains invalid characters"))?;
        authorization.set_sensitive(true);
        Ok(Self {
            authorization,
            timezone_override,
            system_timezone: system_timezone(),
        })
    }

    /// Builds the full header set for a request to `path`.
    #[must_use]
    pub fn headers_for(&self, path: &str) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(20);
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(ACCEPT, HeaderValue::from_static(constants::ACCEPT));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(constants::ACCEPT_ENCODING));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(constants::ACCEPT_LANGUAGE));
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));
        headers.insert(
            HeaderName::from_static(X_DISCORD_LOCALE),
            HeaderValue::from_static(constants::LOCALE),
        );
        headers.insert(HeaderName::from_static(X_DISCORD_TIMEZONE), self.timezone_value());
        headers.insert(
            HeaderName::from_static(SEC_FETCH_DEST),
            HeaderValue::from_static(constants::SEC_FETCH_DEST),
        );
        headers.insert(
            HeaderName::from_static(SEC_FETCH_MODE),
            HeaderValue::from_static(constants::SEC_FETCH_MODE),
        );
        headers.insert(
            HeaderName::from_static(SEC_FETCH_SITE),
            HeaderValue::from_static(constants::SEC_FETCH_SITE),
        );
        headers.insert(
            HeaderName::from_static(SEC_CH_UA),
            HeaderValue::from_static(constants::SEC_CH_UA),
        );
        headers.insert(
            HeaderName::from_static(SEC_CH_UA_MOBILE),
            HeaderValue::from_static(constants::SEC_CH_UA_MOBILE),
        );
        headers.insert(
            HeaderName::from_static(SEC_CH_UA_PLATFORM),
            HeaderValue::from_static(constants::SEC_CH_UA_PLATFORM),
        );
        headers.insert(
            HeaderName::from_static(X_DEBUG_OPTIONS),
            HeaderValue::from_static(constants::DEBUG_OPTIONS),
        );
        headers.insert(
            HeaderName::from_static(PRIORITY),
            HeaderValue::from_static(constants::PRIORITY),
        );

        let referer = HeaderValue::from_str(&referer_for_path(path))
            .unwrap_or_else(|_| HeaderValue::from_static(constants::HOME_REFERER));
        headers.insert(REFERER, referer);

        match super_properties() {
            Ok(encoded) => {
                if let Ok(value) = HeaderValue::from_str(&encoded) {
                    headers.insert(HeaderName::from_static(X_SUPER_PROPERTIES), value);
                }
            }
            Err(error) => warn!(%error, "omitting X-Super-Properties header"),
        }

        headers
    }

    fn timezone_value(&self) -> HeaderValue {
        let timezone = detect_timezone(
            self.timezone_override.as_deref(),
            self.system_timezone.as_deref(),
        );
        HeaderValue::from_str(&timezone)
            .unwrap_or_else(|_| HeaderValue::from_static(constants::FALLBACK_TIMEZONE))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::{Value, json};

    use super::*;

    fn profile() -> HeaderProfile {
        HeaderProfile::new(&Credential::new("token-123"), Some("Europe/Stockholm".into())).unwrap()
    }

    fn decoded_fingerprint() -> Value {
        let encoded = super_properties().unwrap();
        let bytes = STANDARD.decode(encoded).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_referer_guild_path() {
        assert_eq!(
            referer_for_path("/guilds/81384788765712384/channels"),
            "https://discord.com/channels/81384788765712384"
        );
    }

    #[test]
    fn test_referer_channel_path() {
        assert_eq!(
            referer_for_path("/channels/175928847299117063/messages"),
            "https://discord.com/channels/@me/175928847299117063"
        );
        assert_eq!(
            referer_for_path("/channels/175928847299117063"),
            "https://discord.com/channels/@me/175928847299117063"
        );
    }

    #[test]
    fn test_referer_other_paths_use_home() {
        for path in [
            "/users/@me/relationships",
            "/users/@me/channels",
            "/guilds/",
            "/channels//messages",
            "/guilds",
            "",
            "/",
        ] {
            assert_eq!(referer_for_path(path), "https://discord.com/channels/@me", "path {path:?}");
        }
    }

    #[test]
    fn test_fingerprint_contains_exact_documented_fields() {
        let fingerprint = decoded_fingerprint();
        let object = fingerprint.as_object().unwrap();
        let keys: BTreeSet<&str> = object.keys().map(String::as_str).collect();
        let expected: BTreeSet<&str> = [
            "os",
            "browser",
            "release_channel",
            "client_version",
            "os_version",
            "os_arch",
            "app_arch",
            "system_locale",
            "has_client_mods",
            "client_build_number",
            "native_build_number",
            "browser_user_agent",
            "browser_version",
            "os_sdk_version",
            "client_event_source",
            "launch_signature",
            "client_heartbeat_session_id",
            "client_app_state",
        ]
        .into_iter()
        .collect();
        assert_eq!(keys, expected);

        assert_eq!(
            fingerprint,
            json!({
                "os": "Windows",
                "browser": "Discord Client",
                "release_channel": "stable",
                "client_version": "1.0.9202",
                "os_version": "10.0.26100",
                "os_arch": "x64",
                "app_arch": "x64",
                "system_locale": "en-US",
                "has_client_mods": false,
                "client_build_number": 429_117,
                "native_build_number": 66_976,
                "browser_user_agent": constants::USER_AGENT,
                "browser_version": "35.3.0",
                "os_sdk_version": "26100",
                "client_event_source": null,
                "launch_signature": "",
                "client_heartbeat_session_id": "",
                "client_app_state": "focused",
            })
        );
    }

    #[test]
    fn test_fingerprint_uses_padded_standard_alphabet() {
        let encoded = super_properties().unwrap();
        assert_eq!(encoded.len() % 4, 0, "standard base64 is padded to a multiple of 4");
        assert!(!encoded.contains('-') && !encoded.contains('_'));
    }

    #[test]
    fn test_headers_contain_fixed_profile() {
        let headers = profile().headers_for("/users/@me/guilds");
        let get = |name: &str| headers.get(name).unwrap().to_str().unwrap().to_string();

        assert_eq!(get("authorization"), "token-123");
        assert_eq!(get("accept"), "*/*");
        assert_eq!(get("accept-encoding"), "gzip, deflate");
        assert_eq!(get("accept-language"), "en-US,en-SE;q=0.9,en-GB;q=0.8");
        assert!(get("user-agent").contains("discord/1.0.9202"));
        assert_eq!(get("x-discord-locale"), "en-US");
        assert_eq!(get("x-discord-timezone"), "Europe/Stockholm");
        assert_eq!(get("sec-fetch-dest"), "empty");
        assert_eq!(get("sec-fetch-mode"), "cors");
        assert_eq!(get("sec-fetch-site"), "same-origin");
        assert_eq!(get("sec-ch-ua"), r#""Not:A-Brand";v="24", "Chromium";v="134""#);
        assert_eq!(get("sec-ch-ua-mobile"), "?0");
        assert_eq!(get("sec-ch-ua-platform"), r#""Windows""#);
        assert_eq!(get("x-debug-options"), "bugReporterEnabled");
        assert_eq!(get("priority"), "u=1, i");
        assert_eq!(get("referer"), "https://discord.com/channels/@me");
        assert_eq!(get("x-super-properties"), super_properties().unwrap());
        assert!(headers.get("content-type").is_none());
    }

    #[test]
    fn test_authorization_is_marked_sensitive() {
        let headers = profile().headers_for("/users/@me/channels");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
        assert!(!format!("{:?}", profile()).contains("token-123"));
    }

    #[test]
    fn test_blank_token_rejected() {
        let error = HeaderProfile::new(&Credential::new("  "), None).unwrap_err();
        assert!(matches!(error, ApiError::Validation(_)));
    }

    #[test]
    fn test_token_with_newline_rejected() {
        let error = HeaderProfile::new(&Credential::new("abc\ndef"), None).unwrap_err();
        assert!(matches!(error, ApiError::Validation(_)));
    }

    #[test]
    fn test_resolve_timezone_precedence() {
        assert_eq!(
            resolve_timezone(Some("Asia/Tokyo"), Some("Europe/Paris"), Some("America/Lima")),
            "Asia/Tokyo"
        );
        assert_eq!(
            resolve_timezone(None, Some("Europe/Paris"), Some("America/Lima")),
            "Europe/Paris"
        );
        assert_eq!(resolve_timezone(None, Some("  "), Some("America/Lima")), "America/Lima");
        assert_eq!(resolve_timezone(None, None, None), "UTC");
        assert_eq!(resolve_timezone(Some(""), Some(""), Some("")), "UTC");
    }

    #[test]
    fn test_timezone_never_empty() {
        assert!(!detect_timezone(None, None).is_empty());
        assert!(!detect_timezone(None, system_timezone().as_deref()).is_empty());
    }

    #[test]
    fn test_system_timezone_resolved_once_per_profile() {
        let profile = HeaderProfile::new(&Credential::new("tok"), None).unwrap();
        assert_eq!(profile.system_timezone, system_timezone());
        let headers = profile.headers_for("/users/@me/guilds");
        assert!(!headers.get(X_DISCORD_TIMEZONE).unwrap().is_empty());
    }

    #[test]
    fn test_override_wins_over_system_zone() {
        assert_eq!(detect_timezone(Some("Asia/Tokyo"), Some("Europe/Oslo")), "Asia/Tokyo");
    }

    #[test]
    fn test_zone_from_localtime_target() {
        assert_eq!(
            zone_from_localtime_target("/usr/share/zoneinfo/Europe/Stockholm").as_deref(),
            Some("Europe/Stockholm")
        );
        assert_eq!(
            zone_from_localtime_target("/var/db/timezone/zoneinfo/America/New_York").as_deref(),
            Some("America/New_York")
        );
        assert_eq!(zone_from_localtime_target("/etc/localtime-copy"), None);
    }
}
