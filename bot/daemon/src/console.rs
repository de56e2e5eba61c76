//! Console Surface
//!
//! A stdout-backed [`ChatTransport`] and a tracing-backed [`HistorySink`]
//! so the engine can run headless: deliveries print to the terminal, and
//! the pagination controls are echoed with `next`/`prev` hints the main
//! loop turns back into navigation events.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cinescout_core::{ChatId, ChatTransport, HistorySink, MessageId, Pager, UserId};

/// Chat transport that renders to stdout
#[derive(Clone, Default)]
pub struct ConsoleTransport {
    next_id: Arc<AtomicI64>,
    last_pager: Arc<Mutex<Option<(MessageId, Pager)>>>,
}

impl ConsoleTransport {
    /// Create a console transport
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently printed pagination controls, if any
    pub fn last_pager(&self) -> Option<(MessageId, Pager)> {
        self.last_pager.lock().unwrap().clone()
    }

    fn assign_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send_text(&self, _chat: ChatId, text: &str) -> anyhow::Result<MessageId> {
        println!("[bot] {text}");
        Ok(self.assign_id())
    }

    async fn send_photo(
        &self,
        _chat: ChatId,
        photo_url: &str,
        caption: &str,
    ) -> anyhow::Result<MessageId> {
        println!("[bot] [photo: {photo_url}]");
        println!("{caption}");
        Ok(self.assign_id())
    }

    async fn send_pager(&self, _chat: ChatId, pager: &Pager) -> anyhow::Result<MessageId> {
        let id = self.assign_id();
        println!("[bot] {}", pager.text);
        let mut controls = Vec::new();
        if pager.prev.is_some() {
            controls.push("\u{2b05} prev".to_string());
        }
        controls.push(format!("page {}", pager.label));
        if pager.next.is_some() {
            controls.push("next \u{27a1}".to_string());
        }
        println!("      [ {} ]", controls.join(" | "));
        *self.last_pager.lock().unwrap() = Some((id, pager.clone()));
        Ok(id)
    }

    async fn delete_message(&self, _chat: ChatId, message: MessageId) -> anyhow::Result<()> {
        println!("[bot] (removed message {})", message.0);
        Ok(())
    }
}

/// History sink that logs descriptions instead of persisting them
pub struct TracingHistory;

#[async_trait]
impl HistorySink for TracingHistory {
    async fn record(&self, user: UserId, description: &str) -> anyhow::Result<()> {
        tracing::info!(user = user.0, description, "Search recorded");
        Ok(())
    }
}
