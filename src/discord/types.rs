//! Partial Discord resource models.
//!
//! Only the fields the tool reads are modelled. Numeric enums keep unknown
//! values instead of failing the whole decode.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A message as returned by the API; fields other than `id` are not interpreted.
pub type Message = Map<String, Value>;

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Partial user object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    /// `"Global (username)"` when a global display name is set, else the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.global_name.as_deref().filter(|name| !name.is_empty()) {
            Some(global) => format!("{global} ({})", self.username),
            None => self.username.clone(),
        }
    }
}

/// Relationship type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum RelationshipKind {
    None,
    Friend,
    Blocked,
    PendingIncoming,
    PendingOutgoing,
    Implicit,
    Unknown(u8),
}

impl From<u8> for RelationshipKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Friend,
            2 => Self::Blocked,
            3 => Self::PendingIncoming,
            4 => Self::PendingOutgoing,
            5 => Self::Implicit,
            other => Self::Unknown(other),
        }
    }
}

impl RelationshipKind {
    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Friend => "Friend",
            Self::Blocked => "Blocked",
            Self::PendingIncoming => "Pending Incoming",
            Self::PendingOutgoing => "Pending Outgoing",
            Self::Implicit => "Implicit",
            Self::None | Self::Unknown(_) => "Unknown",
        }
    }
}

/// Partial relationship record from `/users/@me/relationships`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    #[serde(default)]
    pub nickname: Option<String>,
    pub user: User,
    /// RFC 3339 timestamp, or empty when the API omits it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub since: String,
}

/// Channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u16")]
pub enum ChannelKind {
    Text,
    Dm,
    Voice,
    GroupDm,
    GuildCategory,
    GuildAnnouncement,
    AnnouncementThread,
    PublicThread,
    PrivateThread,
    GuildStageVoice,
    GuildDirectory,
    GuildForum,
    GuildMedia,
    Unknown(u16),
}

impl From<u16> for ChannelKind {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Text,
            1 => Self::Dm,
            2 => Self::Voice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            5 => Self::GuildAnnouncement,
            10 => Self::AnnouncementThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::GuildStageVoice,
            14 => Self::GuildDirectory,
            15 => Self::GuildForum,
            16 => Self::GuildMedia,
            other => Self::Unknown(other),
        }
    }
}

impl ChannelKind {
    /// Wire value of the type.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Text => 0,
            Self::Dm => 1,
            Self::Voice => 2,
            Self::GroupDm => 3,
            Self::GuildCategory => 4,
            Self::GuildAnnouncement => 5,
            Self::AnnouncementThread => 10,
            Self::PublicThread => 11,
            Self::PrivateThread => 12,
            Self::GuildStageVoice => 13,
            Self::GuildDirectory => 14,
            Self::GuildForum => 15,
            Self::GuildMedia => 16,
            Self::Unknown(other) => other,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> String {
        let label = match self {
            Self::Text => "Text",
            Self::Dm => "DM",
            Self::Voice => "Voice",
            Self::GroupDm => "Group DM",
            Self::GuildCategory => "Guild Category",
            Self::GuildAnnouncement => "Guild Announcement",
            Self::AnnouncementThread => "Announcement Thread",
            Self::PublicThread => "Public Thread",
            Self::PrivateThread => "Private Thread",
            Self::GuildStageVoice => "Stage Voice",
            Self::GuildDirectory => "Guild Directory",
            Self::GuildForum => "Guild Forum",
            Self::GuildMedia => "Guild Media",
            Self::Unknown(other) => return format!("Unknown({other})"),
        };
        label.to_string()
    }
}

/// Partial channel object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recipients: Vec<User>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nsfw: bool,
}

/// Guild NSFW level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum NsfwLevel {
    #[default]
    Default,
    Explicit,
    Safe,
    AgeRestricted,
    Unknown(u8),
}

impl From<u8> for NsfwLevel {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Default,
            1 => Self::Explicit,
            2 => Self::Safe,
            3 => Self::AgeRestricted,
            other => Self::Unknown(other),
        }
    }
}

impl NsfwLevel {
    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Default => "Default".to_string(),
            Self::Explicit => "Explicit".to_string(),
            Self::Safe => "Safe".to_string(),
            Self::AgeRestricted => "Age Restricted".to_string(),
            Self::Unknown(other) => format!("Unknown({other})"),
        }
    }
}

/// Partial guild object from `/users/@me/guilds`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Guild {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nsfw_level: NsfwLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}
