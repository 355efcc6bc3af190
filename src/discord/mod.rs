//! Discord user-account API client.
//!
//! Layers, leaf first:
//!
//! - [`headers`] - desktop-client header profile and `X-Super-Properties` fingerprint
//! - [`request`] - URL, query string and body assembly
//! - [`transport`] - execution, status validation, `Content-Encoding` decoding
//! - [`DiscordClient`] - typed resource operations
//! - [`pagination`] - full message history via the `before` cursor

mod client;
pub mod constants;
mod error;
pub mod headers;
pub mod pagination;
pub mod request;
pub mod transport;
pub mod types;

pub use client::DiscordClient;
pub use error::{ApiError, ErrorKind, TransportError};
pub use headers::HeaderProfile;
pub use pagination::{MessageSource, fetch_all_messages, fetch_all_messages_interruptible};
pub use request::{RequestBuilder, RequestSpec};
pub use transport::{ResponseBody, Transport};
pub use types::{
    Channel, ChannelKind, Guild, Message, NsfwLevel, Relationship, RelationshipKind, User,
};
