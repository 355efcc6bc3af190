//! Request assembly: URL, query string, headers and body.

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use super::constants::API_PATH_PREFIX;
use super::error::ApiError;
use super::headers::HeaderProfile;

/// A fully addressed, fully headered request, built fresh per call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: Url,
    /// Headers to send.
    pub headers: HeaderMap,
    /// Raw body bytes; JSON when present.
    pub body: Option<Vec<u8>>,
}

/// Builds [`RequestSpec`]s against a fixed origin with a fixed header profile.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    profile: HeaderProfile,
}

impl RequestBuilder {
    /// Creates a builder for `base_url` (scheme and host, no path).
    pub fn new(base_url: impl Into<String>, profile: HeaderProfile) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, profile }
    }

    /// Builds a request for `path` (relative to the API version prefix).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the resulting URL does not parse.
    pub fn build(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<Vec<u8>>,
    ) -> Result<RequestSpec, ApiError> {
        let raw = format!("{}{API_PATH_PREFIX}{path}", self.base_url);
        let mut url = Url::parse(&raw)
            .map_err(|error| ApiError::validation(format!("invalid request URL {raw}: {error}")))?;

        if let Some(pairs) = query.filter(|pairs| !pairs.is_empty()) {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let mut headers = self.profile.headers_for(path);
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(RequestSpec {
            method,
            url,
            headers,
            body,
        })
    }
}
