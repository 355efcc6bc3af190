//! Typed operations over the Discord resources the tool uses.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::constants::MESSAGE_PAGE_LIMIT;
use super::error::ApiError;
use super::headers::HeaderProfile;
use super::pagination::MessageSource;
use super::request::RequestBuilder;
use super::transport::{ResponseBody, Transport};
use super::types::{Channel, Guild, Message, Relationship};
use crate::config::{ClientConfig, Credential};

/// Client for the user-account API.
///
/// Requests are issued one at a time; each call builds its own request and
/// owns its response until decoding finishes.
///
/// # Example
///
/// ```no_run
/// use discorder_core::{ClientConfig, Credential, DiscordClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DiscordClient::new(&Credential::new("token"), ClientConfig::default())?;
/// for guild in client.fetch_user_guilds().await? {
///     println!("{} {}", guild.id, guild.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DiscordClient {
    requests: RequestBuilder,
    transport: Transport,
}

impl DiscordClient {
    /// Creates a client for `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an unusable token and
    /// [`ApiError::ClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(credential: &Credential, config: ClientConfig) -> Result<Self, ApiError> {
        let profile = HeaderProfile::new(credential, config.timezone)?;
        Ok(Self {
            requests: RequestBuilder::new(config.base_url, profile),
            transport: Transport::new(config.log_requests)?,
        })
    }

    async fn send(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<Vec<u8>>,
    ) -> Result<ResponseBody, ApiError> {
        let spec = self.requests.build(method, path, query, body)?;
        self.transport
            .execute(spec)
            .await
            .map_err(|source| ApiError::transport(operation, source))
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<Vec<T>, ApiError> {
        let body = self.send(operation, Method::GET, path, query, None).await?;
        let items: Option<Vec<T>> =
            serde_json::from_reader(body).map_err(|source| ApiError::decode(operation, source))?;
        Ok(items.unwrap_or_default())
    }

    /// Lists friends, blocks and pending requests.
    ///
    /// # Errors
    ///
    /// Transport and decode failures, wrapped as "fetching relationships".
    #[instrument(skip(self))]
    pub async fn fetch_relationships(&self) -> Result<Vec<Relationship>, ApiError> {
        self.fetch_list("fetching relationships", "/users/@me/relationships", None)
            .await
    }

    /// Lists the account's DM and group-DM channels.
    ///
    /// # Errors
    ///
    /// Transport and decode failures, wrapped as "fetching channels".
    #[instrument(skip(self))]
    pub async fn fetch_user_channels(&self) -> Result<Vec<Channel>, ApiError> {
        self.fetch_list("fetching channels", "/users/@me/channels", None)
            .await
    }

    /// Opens a DM with `user_id`, or returns the existing one.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a missing or malformed ID, otherwise
    /// transport and decode failures wrapped as "creating DM channel".
    #[instrument(skip(self))]
    pub async fn create_dm_channel(&self, user_id: &str) -> Result<Channel, ApiError> {
        const OPERATION: &str = "creating DM channel";
        validate_snowflake(user_id, "user ID is required to create / retrieve a DM channel")?;

        let payload = format!(r#"{{"recipient_id": "{user_id}"}}"#).into_bytes();
        let body = self
            .send(OPERATION, Method::POST, "/users/@me/channels", None, Some(payload))
            .await?;
        serde_json::from_reader(body).map_err(|source| ApiError::decode(OPERATION, source))
    }

    /// Closes a DM channel. Success carries no data.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a missing or malformed ID, otherwise
    /// transport failures wrapped as "deleting DM channel".
    #[instrument(skip(self))]
    pub async fn delete_dm_channel(&self, channel_id: &str) -> Result<(), ApiError> {
        validate_snowflake(channel_id, "channel ID is required to delete a DM channel")?;
        let path = format!("/channels/{channel_id}");
        self.send("deleting DM channel", Method::DELETE, &path, None, None)
            .await?;
        Ok(())
    }

    /// Fetches one page (newest first, at most 100) of a channel's messages,
    /// optionally only those older than `before`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a missing or malformed ID, otherwise
    /// transport and decode failures wrapped as "fetching messages".
    #[instrument(skip(self))]
    pub async fn fetch_message_page(
        &self,
        channel_id: &str,
        before: Option<&str>,
    ) -> Result<Vec<Message>, ApiError> {
        validate_snowflake(channel_id, "channel ID is required to dump messages")?;
        let path = format!("/channels/{channel_id}/messages");
        let limit = MESSAGE_PAGE_LIMIT.to_string();

        let mut query: Vec<(&str, &str)> = vec![("limit", limit.as_str())];
        if let Some(before) = before.filter(|before| !before.is_empty()) {
            query.push(("before", before));
        }

        let page: Vec<Message> = self
            .fetch_list("fetching messages", &path, Some(&query))
            .await?;
        debug!(channel_id, count = page.len(), "fetched message page");
        Ok(page)
    }

    /// Lists the guilds the account is a member of.
    ///
    /// # Errors
    ///
    /// Transport and decode failures, wrapped as "fetching guilds".
    #[instrument(skip(self))]
    pub async fn fetch_user_guilds(&self) -> Result<Vec<Guild>, ApiError> {
        self.fetch_list("fetching guilds", "/users/@me/guilds", None)
            .await
    }

    /// Lists the channels of a guild.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a missing or malformed ID, otherwise
    /// transport and decode failures wrapped as "fetching guild channels".
    #[instrument(skip(self))]
    pub async fn fetch_guild_channels(&self, guild_id: &str) -> Result<Vec<Channel>, ApiError> {
        validate_snowflake(guild_id, "guild ID is required to list channels")?;
        let path = format!("/guilds/{guild_id}/channels");
        self.fetch_list("fetching guild channels", &path, None).await
    }
}

#[async_trait]
impl MessageSource for DiscordClient {
    async fn fetch_page(
        &self,
        channel_id: &str,
        before: Option<&str>,
    ) -> Result<Vec<Message>, ApiError> {
        self.fetch_message_page(channel_id, before).await
    }
}

/// Rejects empty IDs with `missing_message` and anything that is not a
/// decimal snowflake with a generic message.
fn validate_snowflake(id: &str, missing_message: &str) -> Result<(), ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::validation(missing_message));
    }
    if !id.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ApiError::validation(format!(
            "invalid ID {id:?}: expected a numeric Discord ID"
        )));
    }
    Ok(())
}
