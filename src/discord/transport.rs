//! Request execution and response-body decoding.
//!
//! The reqwest client is built with its own decompression turned off so this
//! module sees the body exactly as sent and decodes it according to the
//! declared `Content-Encoding`.

use std::io::{self, Cursor, Read};

use bytes::Bytes;
use flate2::read::{GzDecoder, ZlibDecoder};
use reqwest::header::{CONTENT_ENCODING, HeaderMap};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use super::constants::MAX_ERROR_BODY_BYTES;
use super::error::{ApiError, TransportError};
use super::request::RequestSpec;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decoded response body. Dropping it releases the buffered response.
pub enum ResponseBody {
    /// Body passed through unchanged.
    Raw(Cursor<Bytes>),
    /// `Content-Encoding: gzip`.
    Gzip(GzDecoder<Cursor<Bytes>>),
    /// `Content-Encoding: deflate` (zlib framing).
    Deflate(ZlibDecoder<Cursor<Bytes>>),
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            Self::Raw(_) => "Raw",
            Self::Gzip(_) => "Gzip",
            Self::Deflate(_) => "Deflate",
        };
        f.debug_tuple("ResponseBody").field(&variant).finish()
    }
}

impl Read for ResponseBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Raw(reader) => reader.read(buf),
            Self::Gzip(reader) => reader.read(buf),
            Self::Deflate(reader) => reader.read(buf),
        }
    }
}

impl ResponseBody {
    /// Wraps `body` in the decoder named by `content_encoding`.
    ///
    /// When the body does not start with a valid header for the declared
    /// encoding the raw bytes are returned instead; the caller then sees a
    /// JSON parse error rather than a decompression error.
    #[must_use]
    pub fn decode(content_encoding: Option<&str>, body: Bytes) -> Self {
        let encoding = content_encoding.map(|value| value.trim().to_ascii_lowercase());
        match encoding.as_deref() {
            Some("gzip") => {
                if body.starts_with(&GZIP_MAGIC) {
                    Self::Gzip(GzDecoder::new(Cursor::new(body)))
                } else {
                    warn!("gzip body without gzip header; using raw body");
                    Self::Raw(Cursor::new(body))
                }
            }
            Some("deflate") => {
                if has_zlib_header(&body) {
                    Self::Deflate(ZlibDecoder::new(Cursor::new(body)))
                } else {
                    warn!("deflate body without zlib header; using raw body");
                    Self::Raw(Cursor::new(body))
                }
            }
            _ => Self::Raw(Cursor::new(body)),
        }
    }
}

fn has_zlib_header(body: &[u8]) -> bool {
    match body {
        [cmf, flg, ..] => {
            let compression_method = cmf & 0x0f;
            let check = u16::from(*cmf) * 256 + u16::from(*flg);
            compression_method == 8 && check % 31 == 0
        }
        _ => false,
    }
}

fn content_encoding(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
}

/// Sends [`RequestSpec`]s and validates the status.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    log_requests: bool,
}

impl Transport {
    /// Creates a transport with the default client policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the client cannot be constructed.
    pub fn new(log_requests: bool) -> Result<Self, ApiError> {
        let client = Client::builder()
            .no_gzip()
            .no_deflate()
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(Self {
            client,
            log_requests,
        })
    }

    /// Executes `spec` and returns its decoded body.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Network`] when the request cannot be sent or the
    ///   body cannot be read.
    /// - [`TransportError::HttpStatus`] for any status outside `200..300`,
    ///   carrying up to 8 KiB of the body.
    pub async fn execute(&self, spec: RequestSpec) -> Result<ResponseBody, TransportError> {
        let RequestSpec {
            method,
            url,
            headers,
            body,
        } = spec;
        let method_name = method.to_string();
        let url_string = url.to_string();

        if self.log_requests {
            info!(method = %method_name, url = %url_string, "Making request");
        }

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|error| TransportError::network(&method_name, &url_string, error))?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %url_string, "response received");

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            let snippet = read_error_snippet(response).await;
            return Err(TransportError::http_status(status.as_u16(), reason, snippet));
        }

        let encoding = content_encoding(response.headers()).map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|error| TransportError::network(&method_name, &url_string, error))?;

        Ok(ResponseBody::decode(encoding.as_deref(), body))
    }
}

/// Reads at most [`MAX_ERROR_BODY_BYTES`] of an error body, then drops the response.
async fn read_error_snippet(mut response: Response) -> String {
    let mut collected: Vec<u8> = Vec::new();
    while collected.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let remaining = MAX_ERROR_BODY_BYTES - collected.len();
                let take = remaining.min(chunk.len());
                collected.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(error) => {
                debug!(%error, "failed to read error body");
                break;
            }
        }
    }
    drop(response);
    String::from_utf8_lossy(&collected).trim().to_string()
}
