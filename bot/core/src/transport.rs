//! Chat Transport Seam
//!
//! The engine never talks to a chat network directly. It hands outbound
//! deliveries to a [`ChatTransport`] implementation and receives inbound
//! events through [`crate::engine::Engine::handle_event`]. This keeps the
//! core headless: the same engine can sit behind a bot API adapter, a test
//! harness, or the console surface shipped with the daemon.
//!
//! # Design Philosophy
//!
//! Delivery is never assumed to succeed. Every method returns a `Result`,
//! and the engine decides per call site whether a failure is recoverable
//! (photo delivery falls back to text; a failed plain send is logged and
//! dropped).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat identifier (one conversation with the bot)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// User identifier (the person typing; distinct from the chat)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Identifier of a delivered message, assigned by the transport
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i64);

/// Pagination controls for the transport to render as buttons
///
/// `prev` and `next` carry opaque page tokens; when the user acts on one,
/// the transport reports it back as a navigation event with the token
/// unchanged. `label` is non-actionable (`current/total` page indicator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    /// Message text above the controls
    pub text: String,
    /// Token for the previous page, if there is one
    pub prev: Option<String>,
    /// Non-actionable page position label
    pub label: String,
    /// Token for the next page, if there is one
    pub next: Option<String>,
}

/// Outbound side of the chat connection
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a plain text message
    async fn send_text(&self, chat: ChatId, text: &str) -> anyhow::Result<MessageId>;

    /// Send an image with an attached caption
    async fn send_photo(
        &self,
        chat: ChatId,
        photo_url: &str,
        caption: &str,
    ) -> anyhow::Result<MessageId>;

    /// Send a message carrying pagination controls
    async fn send_pager(&self, chat: ChatId, pager: &Pager) -> anyhow::Result<MessageId>;

    /// Delete a previously sent message
    async fn delete_message(&self, chat: ChatId, message: MessageId) -> anyhow::Result<()>;
}
