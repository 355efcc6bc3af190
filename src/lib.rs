//! Discorder Core Library
//!
//! Client for the Discord user-account REST API. Requests carry the header
//! profile of the Discord desktop client, responses are decoded according to
//! their `Content-Encoding`, and channel history is paged in full.
//!
//! # Architecture
//!
//! - [`config`] - credential and client configuration
//! - [`discord`] - header profile, request builder, transport, resource
//!   operations and message pagination

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod discord;

// Re-export commonly used types
pub use config::{ClientConfig, Credential, TIMEZONE_ENV_VAR, TOKEN_ENV_VAR};
pub use discord::{
    ApiError, Channel, ChannelKind, DiscordClient, ErrorKind, Guild, Message, MessageSource,
    NsfwLevel, Relationship, RelationshipKind, TransportError, User, fetch_all_messages,
    fetch_all_messages_interruptible,
};
