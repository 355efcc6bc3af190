//! CLI argument definitions and invocation resolution.
//!
//! The positional words are `[TOKEN] ACTION [ARGS...]`. The token is taken
//! from `DISCORD_TOKEN` when that is set, and from the first word otherwise.

use clap::Parser;
use discorder_core::{ApiError, Credential};
use thiserror::Error;

/// Every action the CLI understands, in help order.
pub const ACTIONS: &[&str] = &[
    "relationships",
    "dms",
    "create-dm",
    "remove-dm",
    "guilds",
    "guild-channels",
    "messages",
];

/// Inspect relationships, DMs, guilds and message history of a Discord account.
#[derive(Parser)]
#[command(name = "discorder")]
#[command(author, version, about)]
#[command(after_help = "Actions: relationships, dms, create-dm <user_id>, remove-dm <channel_id>, \
    guilds, guild-channels <guild_id>, messages <channel_id>")]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every request line, even when stdout is not a terminal
    #[arg(long)]
    pub debug: bool,

    /// [TOKEN] ACTION [ARGS...] (omit TOKEN when DISCORD_TOKEN is set)
    #[arg(value_name = "WORDS", trailing_var_arg = true)]
    pub words: Vec<String>,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The first word is the token when DISCORD_TOKEN is unset.
        f.debug_struct("Args")
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .field("debug", &self.debug)
            .field("words", &format_args!("<{} redacted>", self.words.len()))
            .finish()
    }
}

/// One command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Relationships,
    Dms,
    CreateDm { user_id: String },
    RemoveDm { channel_id: String },
    Guilds,
    GuildChannels { guild_id: String },
    Messages { channel_id: String },
}

/// Token plus action resolved from the environment and positional words.
#[derive(Debug)]
pub struct Invocation {
    pub credential: Credential,
    pub action: Action,
}

/// The command line did not name a token and an action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error(
        "Must provide an action when using the DISCORD_TOKEN environment variable\n\
         Usage: discorder <action> [args...]\n\
         Available actions: {actions}",
        actions = ACTIONS.join(", ")
    )]
    MissingAction,

    #[error(
        "Must provide a Discord Token and an action\n\
         Usage: discorder <token> <action> [args...]\n   \
         or: DISCORD_TOKEN=your_token discorder <action> [args...]\n\
         Available actions: {actions}",
        actions = ACTIONS.join(", ")
    )]
    MissingTokenAndAction,

    #[error("Unknown action \"{0}\". Available actions: {actions}", actions = ACTIONS.join(", "))]
    UnknownAction(String),
}

/// Splits positional words into credential and action.
///
/// A non-empty `env_token` wins; the words then start with the action.
///
/// # Errors
///
/// [`UsageError`] when the token or action is missing or the action is unknown,
/// wrapped in `anyhow`; [`ApiError::Validation`] when an action lacks its ID.
pub fn resolve_invocation(env_token: Option<&str>, words: &[String]) -> anyhow::Result<Invocation> {
    let env_token = env_token.filter(|token| !token.trim().is_empty());

    let (credential, rest) = match env_token {
        Some(token) => {
            if words.is_empty() {
                return Err(UsageError::MissingAction.into());
            }
            (Credential::new(token), words)
        }
        None => {
            let [token, rest @ ..] = words else {
                return Err(UsageError::MissingTokenAndAction.into());
            };
            if rest.is_empty() {
                return Err(UsageError::MissingTokenAndAction.into());
            }
            (Credential::new(token.as_str()), rest)
        }
    };

    let (name, args) = rest
        .split_first()
        .ok_or(UsageError::MissingTokenAndAction)?;
    let action = parse_action(name, args)?;
    Ok(Invocation { credential, action })
}

/// Parses an action name and its arguments.
///
/// # Errors
///
/// [`UsageError::UnknownAction`] for an unknown name and
/// [`ApiError::Validation`] when a required ID is missing.
pub fn parse_action(name: &str, args: &[String]) -> anyhow::Result<Action> {
    let first = || args.first().filter(|value| !value.trim().is_empty()).cloned();
    let require = |message: &str| first().ok_or_else(|| ApiError::validation(message));

    let action = match name {
        "relationships" => Action::Relationships,
        "dms" => Action::Dms,
        "create-dm" => Action::CreateDm {
            user_id: require("user ID is required to create / retrieve a DM channel")?,
        },
        "remove-dm" => Action::RemoveDm {
            channel_id: require("channel ID is required to delete a DM channel")?,
        },
        "guilds" => Action::Guilds,
        "guild-channels" => Action::GuildChannels {
            guild_id: require("guild ID is required to list channels")?,
        },
        "messages" => Action::Messages {
            channel_id: require("channel ID is required to dump messages")?,
        },
        other => return Err(UsageError::UnknownAction(other.to_string()).into()),
    };
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use discorder_core::ErrorKind;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_string()).collect()
    }

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["discorder"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.debug);
        assert!(args.words.is_empty());
    }

    #[test]
    fn test_cli_collects_positional_words() {
        let args = Args::try_parse_from(["discorder", "-v", "tok", "messages", "42"]).unwrap();
        assert_eq!(args.verbose, 1);
        assert_eq!(args.words, words(&["tok", "messages", "42"]));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["discorder", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_and_debug_flags() {
        let args = Args::try_parse_from(["discorder", "-q", "--debug", "guilds"]).unwrap();
        assert!(args.quiet);
        assert!(args.debug);
        assert_eq!(args.words, words(&["guilds"]));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["discorder", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_debug_output_hides_positional_words() {
        let args = Args::try_parse_from(["discorder", "-v", "s3cr3t-token", "guilds"]).unwrap();
        let rendered = format!("{args:?}");
        assert!(!rendered.contains("s3cr3t-token"), "got: {rendered}");
        assert!(rendered.contains("<2 redacted>"), "got: {rendered}");
    }

    #[test]
    fn test_env_token_takes_precedence() {
        let invocation = resolve_invocation(
            Some("env-token"),
            &words(&["guild-channels", "81384788765712384"]),
        )
        .unwrap();
        assert_eq!(invocation.credential, Credential::new("env-token"));
        assert_eq!(
            invocation.action,
            Action::GuildChannels {
                guild_id: "81384788765712384".to_string()
            }
        );
    }

    #[test]
    fn test_positional_token_without_env() {
        let invocation = resolve_invocation(None, &words(&["pos-token", "guilds"])).unwrap();
        assert_eq!(invocation.credential, Credential::new("pos-token"));
        assert_eq!(invocation.action, Action::Guilds);
    }

    #[test]
    fn test_blank_env_token_is_ignored() {
        let invocation = resolve_invocation(Some(""), &words(&["pos-token", "dms"])).unwrap();
        assert_eq!(invocation.credential, Credential::new("pos-token"));
        assert_eq!(invocation.action, Action::Dms);
    }

    #[test]
    fn test_env_token_without_action_is_usage_error() {
        let error = resolve_invocation(Some("env-token"), &[]).unwrap_err();
        assert_eq!(error.downcast_ref::<UsageError>(), Some(&UsageError::MissingAction));
        assert!(error.to_string().contains("Available actions: relationships"));
    }

    #[test]
    fn test_missing_token_and_action_is_usage_error() {
        for input in [words(&[]), words(&["only-token"])] {
            let error = resolve_invocation(None, &input).unwrap_err();
            assert_eq!(
                error.downcast_ref::<UsageError>(),
                Some(&UsageError::MissingTokenAndAction)
            );
        }
    }

    #[test]
    fn test_unknown_action_lists_available_actions() {
        let error = resolve_invocation(Some("t"), &words(&["frobnicate"])).unwrap_err();
        let msg = error.to_string();
        assert!(msg.starts_with("Unknown action \"frobnicate\""), "got: {msg}");
        assert!(msg.contains("guild-channels"), "got: {msg}");
    }

    #[test]
    fn test_missing_ids_are_validation_errors() {
        let cases = [
            ("create-dm", "user ID is required to create / retrieve a DM channel"),
            ("remove-dm", "channel ID is required to delete a DM channel"),
            ("guild-channels", "guild ID is required to list channels"),
            ("messages", "channel ID is required to dump messages"),
        ];
        for (name, expected) in cases {
            let error = parse_action(name, &[]).unwrap_err();
            let api_error = error.downcast_ref::<ApiError>().unwrap();
            assert_eq!(api_error.kind(), ErrorKind::Validation);
            assert_eq!(api_error.to_string(), expected);
        }
    }

    #[test]
    fn test_actions_with_ids() {
        assert_eq!(
            parse_action("create-dm", &words(&["1"])).unwrap(),
            Action::CreateDm { user_id: "1".into() }
        );
        assert_eq!(
            parse_action("remove-dm", &words(&["2"])).unwrap(),
            Action::RemoveDm { channel_id: "2".into() }
        );
        assert_eq!(
            parse_action("messages", &words(&["3", "ignored"])).unwrap(),
            Action::Messages { channel_id: "3".into() }
        );
    }
}
