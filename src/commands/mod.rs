//! CLI command handlers.
//!
//! Each action fetches through the [`DiscordClient`] and returns the text to
//! print on stdout.

use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use chrono::Utc;
use discorder_core::{DiscordClient, fetch_all_messages_interruptible};
use tracing::{debug, info};

use crate::cli::Action;
use crate::output;

/// Runs `action` and returns its rendered output.
pub async fn run(
    client: &DiscordClient,
    action: &Action,
    interrupted: &AtomicBool,
) -> Result<String> {
    debug!(?action, "running action");
    match action {
        Action::Relationships => {
            let relationships = client.fetch_relationships().await?;
            Ok(output::render_relationships(relationships, Utc::now()))
        }
        Action::Dms => {
            let channels = client.fetch_user_channels().await?;
            Ok(output::render_dms(channels))
        }
        Action::CreateDm { user_id } => {
            let channel = client.create_dm_channel(user_id).await?;
            Ok(format!("DM channel created with ID: {}\n", channel.id))
        }
        Action::RemoveDm { channel_id } => {
            client.delete_dm_channel(channel_id).await?;
            Ok(format!("DM channel with ID {channel_id} deleted successfully.\n"))
        }
        Action::Guilds => {
            let guilds = client.fetch_user_guilds().await?;
            Ok(output::render_guilds(guilds))
        }
        Action::GuildChannels { guild_id } => {
            let channels = client.fetch_guild_channels(guild_id).await?;
            Ok(output::render_guild_channels(channels))
        }
        Action::Messages { channel_id } => {
            let messages =
                fetch_all_messages_interruptible(client, channel_id, interrupted).await?;
            info!(channel_id = %channel_id, count = messages.len(), "dumping messages");
            output::render_messages(&messages).context("rendering messages")
        }
    }
}
