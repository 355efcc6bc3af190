//! CLI output formatting: sorting and rendering of API results.
//!
//! Every function returns the text to print so the command layer decides
//! where it goes.

mod table;
mod time;

use chrono::{DateTime, Utc};
use discorder_core::{Channel, ChannelKind, Guild, Message, Relationship};

pub use table::render_table;
pub use time::{format_time, format_time_since};

fn case_insensitive(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

/// Name used to order DM channels.
fn channel_sort_name(channel: &Channel) -> String {
    match channel.kind {
        ChannelKind::GroupDm if channel.name.is_empty() => "Unnamed Group".to_string(),
        ChannelKind::GroupDm => channel.name.clone(),
        ChannelKind::Dm => channel
            .recipients
            .first()
            .map_or_else(|| "Unnamed DM".to_string(), |user| user.display_name()),
        _ => "Unknown".to_string(),
    }
}

/// Sorts DM channels by their display name, ignoring case.
pub fn sort_channels(channels: &mut [Channel]) {
    channels.sort_by(|a, b| case_insensitive(&channel_sort_name(a), &channel_sort_name(b)));
}

/// Sorts relationships by the user's display name, ignoring case.
pub fn sort_relationships(relationships: &mut [Relationship]) {
    relationships.sort_by(|a, b| case_insensitive(&a.user.display_name(), &b.user.display_name()));
}

/// Renders the relationships table, sorted by name.
pub fn render_relationships(mut relationships: Vec<Relationship>, now: DateTime<Utc>) -> String {
    if relationships.is_empty() {
        return "No relationships found.\n".to_string();
    }
    sort_relationships(&mut relationships);

    let mut rows = vec![vec![
        "User ID".to_string(),
        "Global Name (Username) aka [Nickname]".to_string(),
        "Type".to_string(),
        "Since".to_string(),
    ]];
    for relationship in &relationships {
        let mut name = relationship.user.display_name();
        if let Some(nickname) = relationship.nickname.as_deref().filter(|n| !n.is_empty()) {
            name = format!("{name} aka [{nickname}]");
        }
        let since = format!(
            "{} ({})",
            format_time(&relationship.since),
            format_time_since(&relationship.since, now)
        );
        rows.push(vec![
            relationship.user.id.clone(),
            name,
            relationship.kind.label().to_string(),
            since,
        ]);
    }

    format!(
        "Found {} relationships:\n\n{}",
        relationships.len(),
        render_table(&rows)
    )
}

/// Renders group DMs followed by private DMs; other channel kinds are skipped.
pub fn render_dms(mut channels: Vec<Channel>) -> String {
    sort_channels(&mut channels);
    let (group, private): (Vec<Channel>, Vec<Channel>) = channels
        .into_iter()
        .filter(|channel| matches!(channel.kind, ChannelKind::GroupDm | ChannelKind::Dm))
        .partition(|channel| channel.kind == ChannelKind::GroupDm);

    let mut out = render_group_dms(&group);
    out.push_str(&render_private_dms(&private));
    out
}

fn render_group_dms(channels: &[Channel]) -> String {
    if channels.is_empty() {
        return "No group DM channels found.\n".to_string();
    }
    let mut rows = vec![vec![
        "Channel ID".to_string(),
        "Name".to_string(),
        "Recipients".to_string(),
    ]];
    for channel in channels {
        let recipients: Vec<String> = channel.recipients.iter().map(|u| u.display_name()).collect();
        let name = if channel.name.is_empty() {
            "Unnamed Group".to_string()
        } else {
            channel.name.clone()
        };
        rows.push(vec![channel.id.clone(), name, recipients.join(", ")]);
    }
    format!(
        "Found {} group DM channels:\n\n{}\n",
        channels.len(),
        render_table(&rows)
    )
}

fn render_private_dms(channels: &[Channel]) -> String {
    if channels.is_empty() {
        return "No private DM channels found.\n".to_string();
    }
    let mut rows = vec![vec!["Channel ID".to_string(), "User".to_string()]];
    for channel in channels {
        let user = channel
            .recipients
            .first()
            .map_or_else(|| "Unknown User".to_string(), |user| user.display_name());
        rows.push(vec![channel.id.clone(), user]);
    }
    format!(
        "Found {} private DM channels:\n\n{}",
        channels.len(),
        render_table(&rows)
    )
}

/// Renders guilds sorted by name.
pub fn render_guilds(mut guilds: Vec<Guild>) -> String {
    if guilds.is_empty() {
        return "No guilds found.\n".to_string();
    }
    guilds.sort_by(|a, b| case_insensitive(&a.name, &b.name));

    let mut rows = vec![vec![
        "Guild ID".to_string(),
        "Name".to_string(),
        "Owner Of".to_string(),
        "NSFW Level".to_string(),
        "Description".to_string(),
    ]];
    for guild in &guilds {
        let description = if guild.description.is_empty() {
            "-".to_string()
        } else {
            guild.description.clone()
        };
        rows.push(vec![
            guild.id.clone(),
            guild.name.clone(),
            yes_no(guild.owner),
            guild.nsfw_level.label(),
            description,
        ]);
    }
    format!("Found {} guilds:\n\n{}", guilds.len(), render_table(&rows))
}

/// Renders guild channels sorted by type, then name.
pub fn render_guild_channels(mut channels: Vec<Channel>) -> String {
    if channels.is_empty() {
        return "No channels found.\n".to_string();
    }
    channels.sort_by(|a, b| {
        a.kind
            .code()
            .cmp(&b.kind.code())
            .then_with(|| case_insensitive(&a.name, &b.name))
    });

    let mut rows = vec![vec![
        "Channel ID".to_string(),
        "Type".to_string(),
        "Name".to_string(),
        "NSFW".to_string(),
    ]];
    for channel in &channels {
        rows.push(vec![
            channel.id.clone(),
            channel.kind.label(),
            channel.name.clone(),
            yes_no(channel.nsfw),
        ]);
    }
    format!("Found {} channels:\n\n{}", channels.len(), render_table(&rows))
}

/// Renders messages as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns the serialization error.
pub fn render_messages(messages: &[Message]) -> serde_json::Result<String> {
    let mut rendered = serde_json::to_string_pretty(messages)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use discorder_core::{NsfwLevel, RelationshipKind, User};
    use serde_json::json;

    use super::*;

    fn user(id: &str, username: &str, global: Option<&str>) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            global_name: global.map(str::to_string),
            avatar: None,
        }
    }

    fn channel(id: &str, kind: ChannelKind, name: &str, recipients: Vec<User>) -> Channel {
        Channel {
            id: id.to_string(),
            kind,
            name: name.to_string(),
            recipients,
            nsfw: false,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relationships_sorted_and_labelled() {
        let relationships = vec![
            Relationship {
                id: "2".into(),
                kind: RelationshipKind::Blocked,
                nickname: None,
                user: user("2", "zed", None),
                since: String::new(),
            },
            Relationship {
                id: "1".into(),
                kind: RelationshipKind::Friend,
                nickname: Some("Al".into()),
                user: user("1", "alice", Some("Alice")),
                since: "2025-05-30T12:00:00+00:00".into(),
            },
        ];

        let rendered = render_relationships(relationships, now());

        assert!(rendered.starts_with("Found 2 relationships:\n\n"));
        let alice = rendered.find("Alice (alice) aka [Al]").unwrap();
        let zed = rendered.find("zed").unwrap();
        assert!(alice < zed, "expected alice before zed:\n{rendered}");
        assert!(rendered.contains("2025-05-30 12:00 (2 days ago)"));
        assert!(rendered.contains("Unknown (Unknown)"));
        assert!(rendered.contains("Blocked"));
    }

    #[test]
    fn test_no_relationships_is_reported() {
        assert_eq!(render_relationships(Vec::new(), now()), "No relationships found.\n");
    }

    #[test]
    fn test_dms_split_into_group_and_private() {
        let channels = vec![
            channel("10", ChannelKind::Dm, "", vec![user("1", "bob", None)]),
            channel(
                "11",
                ChannelKind::GroupDm,
                "",
                vec![user("1", "bob", None), user("2", "amy", Some("Amy"))],
            ),
            channel("12", ChannelKind::Dm, "", vec![user("3", "Alex", None)]),
            channel("13", ChannelKind::Text, "general", vec![]),
        ];

        let rendered = render_dms(channels);

        assert!(rendered.contains("Found 1 group DM channels:"));
        assert!(rendered.contains("Unnamed Group"));
        assert!(rendered.contains("bob, Amy (amy)"));
        assert!(rendered.contains("Found 2 private DM channels:"));
        assert!(!rendered.contains("general"));
        let alex = rendered.find("| Alex").unwrap();
        let bob = rendered.rfind("| bob").unwrap();
        assert!(alex < bob, "private DMs sorted by name:\n{rendered}");
    }

    #[test]
    fn test_dms_without_channels_report_both_groups() {
        let rendered = render_dms(Vec::new());
        assert_eq!(
            rendered,
            "No group DM channels found.\nNo private DM channels found.\n"
        );
    }

    #[test]
    fn test_private_dm_without_recipient() {
        let rendered = render_dms(vec![channel("10", ChannelKind::Dm, "", vec![])]);
        assert!(rendered.contains("Unknown User"));
    }

    #[test]
    fn test_guilds_sorted_with_labels() {
        let guilds = vec![
            Guild {
                id: "2".into(),
                name: "zeta".into(),
                owner: false,
                nsfw_level: NsfwLevel::Safe,
                description: String::new(),
            },
            Guild {
                id: "1".into(),
                name: "Alpha".into(),
                owner: true,
                nsfw_level: NsfwLevel::Unknown(9),
                description: "first".into(),
            },
        ];
        let rendered = render_guilds(guilds);
        assert!(rendered.starts_with("Found 2 guilds:"));
        assert!(rendered.find("Alpha").unwrap() < rendered.find("zeta").unwrap());
        assert!(rendered.contains("Unknown(9)"));
        assert!(rendered.contains("Safe"));
        assert!(rendered.contains("| -"));
    }

    #[test]
    fn test_empty_guilds_and_channels() {
        assert_eq!(render_guilds(Vec::new()), "No guilds found.\n");
        assert_eq!(render_guild_channels(Vec::new()), "No channels found.\n");
    }

    #[test]
    fn test_guild_channels_sorted_by_kind_then_name() {
        let mut voice = channel("3", ChannelKind::Voice, "Lounge", vec![]);
        voice.nsfw = true;
        let channels = vec![
            voice,
            channel("2", ChannelKind::Text, "rules", vec![]),
            channel("1", ChannelKind::Text, "General", vec![]),
        ];
        let rendered = render_guild_channels(channels);
        let general = rendered.find("General").unwrap();
        let rules = rendered.find("rules").unwrap();
        let lounge = rendered.find("Lounge").unwrap();
        assert!(general < rules && rules < lounge, "got:\n{rendered}");
        assert!(rendered.contains("Yes"));
    }

    #[test]
    fn test_render_messages_pretty_json() {
        let message = json!({"id": "1", "content": "hi"}).as_object().unwrap().clone();
        let rendered = render_messages(&[message]).unwrap();
        assert!(rendered.starts_with("[\n"));
        assert!(rendered.contains("\"content\": \"hi\""));
        assert_eq!(render_messages(&[]).unwrap(), "[]\n");
    }
}
