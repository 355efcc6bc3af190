//! Full channel history retrieval.
//!
//! The messages endpoint only returns pages of at most 100, newest first.
//! [`fetch_all_messages`] walks backwards with the `before` cursor until the
//! history is exhausted and returns everything oldest first.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::constants::MESSAGE_PAGE_LIMIT;
use super::error::ApiError;
use super::types::Message;

/// Anything that can produce one page of channel history.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Returns up to 100 messages older than `before` (or the newest ones
    /// when `before` is `None`), newest first.
    async fn fetch_page(
        &self,
        channel_id: &str,
        before: Option<&str>,
    ) -> Result<Vec<Message>, ApiError>;
}

/// Fetches the complete history of `channel_id`, oldest message first.
///
/// # Errors
///
/// Any page failure aborts the walk; messages gathered so far are dropped.
pub async fn fetch_all_messages<S>(source: &S, channel_id: &str) -> Result<Vec<Message>, ApiError>
where
    S: MessageSource + ?Sized,
{
    let never = AtomicBool::new(false);
    fetch_all_messages_interruptible(source, channel_id, &never).await
}

/// Same as [`fetch_all_messages`], but checks `interrupted` before every page.
///
/// # Errors
///
/// Returns [`ApiError::Interrupted`] once the flag is set, and otherwise the
/// same errors as [`fetch_all_messages`].
#[instrument(skip(source, interrupted))]
pub async fn fetch_all_messages_interruptible<S>(
    source: &S,
    channel_id: &str,
    interrupted: &AtomicBool,
) -> Result<Vec<Message>, ApiError>
where
    S: MessageSource + ?Sized,
{
    let mut messages: Vec<Message> = Vec::with_capacity(MESSAGE_PAGE_LIMIT);
    let mut cursor: Option<String> = None;
    let mut pages = 0_usize;

    loop {
        if interrupted.load(Ordering::SeqCst) {
            return Err(ApiError::Interrupted);
        }

        let page = source.fetch_page(channel_id, cursor.as_deref()).await?;
        pages += 1;
        if page.is_empty() {
            break;
        }

        let page_len = page.len();
        let oldest_id = page
            .last()
            .and_then(|message| message.get("id"))
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| ApiError::MissingMessageId {
                channel_id: channel_id.to_string(),
            })?;

        messages.extend(page);
        debug!(
            page = pages,
            page_len,
            total = messages.len(),
            before = %oldest_id,
            "advanced history cursor"
        );
        cursor = Some(oldest_id);

        // A short page is the last one.
        if page_len < MESSAGE_PAGE_LIMIT {
            break;
        }
    }

    messages.reverse();
    info!(channel_id, pages, total = messages.len(), "fetched channel history");
    Ok(messages)
}
