//! Engine - The Conversational Search Core
//!
//! The engine wires the dialog state machine, the catalog backend, the
//! renderer, and the pagination controller together behind two entry
//! points: a text message arrived, or a navigation action arrived. It is
//! transport-agnostic; deliveries go through the [`ChatTransport`] seam and
//! completed searches are reported to the [`HistorySink`] seam.
//!
//! # Design Philosophy
//!
//! Dialog state is read and updated *before* any network call; no session
//! lock is ever held across I/O. Events from different chats can be handled
//! concurrently, and per-chat ordering is the caller's contract.
//!
//! Failure policy: catalog failures map to distinct user-facing
//! messages and are never retried; a failed photo delivery falls back to a
//! text delivery of the same caption; a failed plain delivery or history
//! write is logged and dropped; a malformed navigation token gets a generic
//! "couldn't change page" reply.

use crate::catalog::{CatalogBackend, MovieRecord, SearchQuery};
use crate::history::HistorySink;
use crate::pagination::{PageControls, PageToken};
use crate::render::{group_thousands, render, DisplayUnit};
use crate::session::{Action, SessionStore};
use crate::transport::{ChatId, ChatTransport, MessageId, Pager, UserId};

/// Greeting sent for the start command
pub const GREETING: &str = "Hi! I can find movies and series by name, minimum rating, \
     or minimum budget. Type 'search' to begin.";

/// Search mode menu
pub const MENU: &str = "Choose a search mode: 'by name', 'by rating', or 'by budget'.";

/// Reply when a pending dialog is cancelled
pub const CANCELLED: &str = "Okay, back to the main menu. Type 'search' to start over.";

/// Text above the pagination controls
pub const PAGER_TEXT: &str = "Browse the results:";

/// Inbound event from the chat transport
#[derive(Clone, Debug)]
pub enum ChatEvent {
    /// A user sent a text message
    Text {
        /// Chat the message arrived in
        chat: ChatId,
        /// Who sent it
        user: UserId,
        /// Message text
        text: String,
    },
    /// A user acted on a pagination control
    Navigation {
        /// Chat the control lives in
        chat: ChatId,
        /// The control message itself (removed best-effort)
        message: MessageId,
        /// The opaque page token attached to the control
        token: String,
    },
}

/// The conversational search engine
pub struct Engine<C: CatalogBackend, T: ChatTransport, H: HistorySink> {
    /// Catalog backend
    catalog: C,
    /// Outbound chat deliveries
    transport: T,
    /// Completed-search descriptions
    history: H,
    /// Per-chat dialog state
    sessions: SessionStore,
}

impl<C: CatalogBackend, T: ChatTransport, H: HistorySink> Engine<C, T, H> {
    /// Create an engine over the given collaborators
    pub fn new(catalog: C, transport: T, history: H) -> Self {
        Self {
            catalog,
            transport,
            history,
            sessions: SessionStore::new(),
        }
    }

    /// Handle one inbound event
    pub async fn handle_event(&self, event: ChatEvent) {
        match event {
            ChatEvent::Text { chat, user, text } => self.on_text(chat, user, &text).await,
            ChatEvent::Navigation {
                chat,
                message,
                token,
            } => self.on_navigation(chat, message, &token).await,
        }
    }

    /// Handle an inbound text message
    pub async fn on_text(&self, chat: ChatId, user: UserId, text: &str) {
        match self.sessions.handle_text(chat, text) {
            Action::Ignore => {
                tracing::trace!(chat = chat.0, "Ignoring unrelated message");
            }
            Action::Greet => self.send_text(chat, GREETING).await,
            Action::Menu => self.send_text(chat, MENU).await,
            Action::Cancelled => self.send_text(chat, CANCELLED).await,
            Action::Prompt(kind) => self.send_text(chat, kind.prompt()).await,
            Action::Reject(error) => {
                tracing::warn!(chat = chat.0, %error, "Rejected dialog answer");
                self.send_text(chat, &error.user_message()).await;
            }
            Action::Execute(query) => {
                tracing::info!(chat = chat.0, user = user.0, query = %query.describe(), "Running search");
                self.record_history(user, &query).await;
                self.announce(chat, &query).await;
                self.run_search(chat, &query).await;
            }
        }
    }

    /// Handle a navigation action from a pagination control
    ///
    /// Navigation bypasses the dialog state machine entirely and emits no
    /// history record: it re-runs a search the user already performed.
    pub async fn on_navigation(&self, chat: ChatId, message: MessageId, token: &str) {
        let query = match PageToken::decode(token) {
            Ok(query) => query,
            Err(error) => {
                tracing::warn!(chat = chat.0, %error, "Bad navigation token");
                self.send_text(chat, error.user_message()).await;
                return;
            }
        };

        // The old control message is stale once a new page renders.
        // Removal is best-effort; failure must not block the new page.
        if let Err(e) = self.transport.delete_message(chat, message).await {
            tracing::warn!(chat = chat.0, "Could not remove pagination message: {e}");
        }

        self.send_text(chat, &format!("Loading page {}...", query.page()))
            .await;
        self.run_search(chat, &query).await;
    }

    /// Fetch, render, and deliver one page of results
    async fn run_search(&self, chat: ChatId, query: &SearchQuery) {
        let page = match self.catalog.fetch(&query.to_request()).await {
            Ok(page) => page,
            Err(error) => {
                tracing::error!(chat = chat.0, %error, "Catalog request failed");
                self.send_text(chat, &error.user_message()).await;
                return;
            }
        };

        match query {
            SearchQuery::Name { text, .. } => {
                let Some(best) = best_match(&page.records, text) else {
                    self.send_text(chat, &nothing_found(query)).await;
                    return;
                };
                self.deliver(chat, &render(best)).await;
            }
            SearchQuery::Rating { .. } | SearchQuery::Budget { .. } => {
                let records = presentable_records(query, &page.records);
                if records.is_empty() {
                    self.send_text(chat, &nothing_found(query)).await;
                    return;
                }
                for record in records {
                    self.deliver(chat, &render(record)).await;
                }
                if PageControls::needed(page.total, query.page_size()) {
                    let controls =
                        PageControls::paginate(page.total, query.page_size(), query.page());
                    let pager = Pager {
                        text: PAGER_TEXT.to_string(),
                        prev: controls.prev_token(query),
                        label: controls.label(),
                        next: controls.next_token(query),
                    };
                    if let Err(e) = self.transport.send_pager(chat, &pager).await {
                        tracing::warn!(chat = chat.0, "Failed to send pagination controls: {e}");
                    }
                }
            }
        }
    }

    /// Deliver one rendered result, falling back to text when the photo
    /// delivery fails for any transport reason
    async fn deliver(&self, chat: ChatId, unit: &DisplayUnit) {
        if let Some(url) = &unit.poster_url {
            match self.transport.send_photo(chat, url, &unit.caption).await {
                Ok(_) => return,
                Err(e) => {
                    tracing::warn!(chat = chat.0, "Photo delivery failed, sending text: {e}");
                }
            }
        }
        self.send_text(chat, &unit.caption).await;
    }

    /// Searching announcement for threshold searches (the name flow answers
    /// with a single card and needs no preamble)
    async fn announce(&self, chat: ChatId, query: &SearchQuery) {
        match query {
            SearchQuery::Name { .. } => {}
            SearchQuery::Rating { min, .. } => {
                self.send_text(chat, &format!("Searching for movies rated {min} or higher..."))
                    .await;
            }
            SearchQuery::Budget { min_usd, .. } => {
                self.send_text(
                    chat,
                    &format!(
                        "Searching for movies with a budget of at least ${}...",
                        group_thousands(*min_usd)
                    ),
                )
                .await;
            }
        }
    }

    /// Report a completed search to the history collaborator
    ///
    /// Fire-and-forget: failures are logged and never surfaced.
    async fn record_history(&self, user: UserId, query: &SearchQuery) {
        if let Err(e) = self.history.record(user, &query.describe()).await {
            tracing::warn!(user = user.0, "Failed to record history: {e}");
        }
    }

    /// Send a text message, logging (not propagating) delivery failure
    async fn send_text(&self, chat: ChatId, text: &str) {
        if let Err(e) = self.transport.send_text(chat, text).await {
            tracing::warn!(chat = chat.0, "Failed to send message: {e}");
        }
    }
}

/// Pick the record whose title exactly matches the query (ignoring case and
/// whitespace), else the first record
fn best_match<'a>(records: &'a [MovieRecord], query: &str) -> Option<&'a MovieRecord> {
    records
        .iter()
        .find(|r| r.title_matches(query))
        .or_else(|| records.first())
}

/// Records worth a card on this page
///
/// The budget listing endpoint returns records without a budget value even
/// under a budget filter; those carry nothing to show for this mode.
fn presentable_records<'a>(
    query: &SearchQuery,
    records: &'a [MovieRecord],
) -> Vec<&'a MovieRecord> {
    match query {
        SearchQuery::Budget { .. } => records
            .iter()
            .filter(|r| r.budget.as_ref().is_some_and(|b| b.value.is_some()))
            .collect(),
        _ => records.iter().collect(),
    }
}

/// Empty-page message for threshold searches
fn nothing_found(query: &SearchQuery) -> String {
    match query {
        SearchQuery::Name { text, .. } => format!("Nothing found for \u{ab}{text}\u{bb}."),
        SearchQuery::Rating { min, .. } => {
            format!("No movies found with a rating of {min} or higher.")
        }
        SearchQuery::Budget { min_usd, .. } => format!(
            "No movies found with a budget of at least ${}.",
            group_thousands(*min_usd)
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::{CatalogError, CatalogPage, CatalogRequest};

    const CHAT: ChatId = ChatId(1);
    const USER: UserId = UserId(10);

    fn record(json: &str) -> MovieRecord {
        serde_json::from_str(json).unwrap()
    }

    fn page(records: Vec<MovieRecord>, total: u64) -> CatalogPage {
        CatalogPage { records, total }
    }

    /// Catalog stub: pops canned responses, captures requests
    #[derive(Clone, Default)]
    struct StubCatalog {
        responses: Arc<Mutex<Vec<Result<CatalogPage, CatalogError>>>>,
        requests: Arc<Mutex<Vec<CatalogRequest>>>,
    }

    impl StubCatalog {
        fn respond_with(self, response: Result<CatalogPage, CatalogError>) -> Self {
            self.responses.lock().unwrap().insert(0, response);
            self
        }

        fn requests(&self) -> Vec<CatalogRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogBackend for StubCatalog {
        async fn fetch(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(CatalogPage::default()))
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Sent {
        Text(String),
        Photo { url: String, caption: String },
        Pager(Pager),
        Deleted(MessageId),
    }

    /// Transport mock recording every call
    #[derive(Clone, Default)]
    struct MockTransport {
        sent: Arc<Mutex<Vec<Sent>>>,
        fail_photos: bool,
        fail_deletes: bool,
    }

    impl MockTransport {
        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn texts(&self) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter_map(|s| match s {
                    Sent::Text(t) => Some(t),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl ChatTransport for MockTransport {
        async fn send_text(&self, _chat: ChatId, text: &str) -> anyhow::Result<MessageId> {
            self.sent.lock().unwrap().push(Sent::Text(text.to_string()));
            Ok(MessageId(1))
        }

        async fn send_photo(
            &self,
            _chat: ChatId,
            photo_url: &str,
            caption: &str,
        ) -> anyhow::Result<MessageId> {
            self.sent.lock().unwrap().push(Sent::Photo {
                url: photo_url.to_string(),
                caption: caption.to_string(),
            });
            if self.fail_photos {
                anyhow::bail!("photo rejected by transport");
            }
            Ok(MessageId(2))
        }

        async fn send_pager(&self, _chat: ChatId, pager: &Pager) -> anyhow::Result<MessageId> {
            self.sent.lock().unwrap().push(Sent::Pager(pager.clone()));
            Ok(MessageId(3))
        }

        async fn delete_message(&self, _chat: ChatId, message: MessageId) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(Sent::Deleted(message));
            if self.fail_deletes {
                anyhow::bail!("message already gone");
            }
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingHistory {
        records: Arc<Mutex<Vec<(UserId, String)>>>,
    }

    impl RecordingHistory {
        fn records(&self) -> Vec<(UserId, String)> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HistorySink for RecordingHistory {
        async fn record(&self, user: UserId, description: &str) -> anyhow::Result<()> {
            self.records
                .lock()
                .unwrap()
                .push((user, description.to_string()));
            Ok(())
        }
    }

    fn engine(
        catalog: StubCatalog,
        transport: MockTransport,
        history: RecordingHistory,
    ) -> Engine<StubCatalog, MockTransport, RecordingHistory> {
        Engine::new(catalog, transport, history)
    }

    #[tokio::test]
    async fn test_idle_noise_sends_nothing() {
        let transport = MockTransport::default();
        let engine = engine(
            StubCatalog::default(),
            transport.clone(),
            RecordingHistory::default(),
        );
        engine.on_text(CHAT, USER, "how are you?").await;
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_name_flow_prefers_exact_match() {
        let catalog = StubCatalog::default().respond_with(Ok(page(
            vec![
                record(r#"{"name": "Dune Part Two"}"#),
                record(r#"{"name": "Dune"}"#),
            ],
            2,
        )));
        let transport = MockTransport::default();
        let engine = engine(catalog, transport.clone(), RecordingHistory::default());

        engine.on_text(CHAT, USER, "by name").await;
        engine.on_text(CHAT, USER, "  dUNe ").await;

        let texts = transport.texts();
        // Prompt, then the exact-match card (no poster, so text delivery)
        assert_eq!(texts.len(), 2);
        assert!(texts[1].starts_with("\u{1f3ac} *Dune* "));
    }

    #[tokio::test]
    async fn test_name_flow_falls_back_to_first_result() {
        let catalog = StubCatalog::default().respond_with(Ok(page(
            vec![
                record(r#"{"name": "Dune"}"#),
                record(r#"{"name": "Dune Part Two"}"#),
            ],
            2,
        )));
        let transport = MockTransport::default();
        let engine = engine(catalog, transport.clone(), RecordingHistory::default());

        engine.on_text(CHAT, USER, "by name").await;
        engine.on_text(CHAT, USER, "duen").await;

        let texts = transport.texts();
        assert!(texts[1].starts_with("\u{1f3ac} *Dune* "));
    }

    #[tokio::test]
    async fn test_history_emitted_once_per_completed_dialog() {
        let catalog = StubCatalog::default().respond_with(Ok(page(vec![], 0)));
        let history = RecordingHistory::default();
        let engine = engine(catalog, MockTransport::default(), history.clone());

        engine.on_text(CHAT, USER, "by rating").await;
        engine.on_text(CHAT, USER, "11").await; // rejected: no record
        assert!(history.records().is_empty());

        engine.on_text(CHAT, USER, "7.5").await;
        assert_eq!(
            history.records(),
            vec![(USER, "rating \u{2265} 7.5".to_string())]
        );
    }

    #[tokio::test]
    async fn test_photo_failure_falls_back_to_text() {
        let catalog = StubCatalog::default().respond_with(Ok(page(
            vec![record(
                r#"{"name": "Alien", "poster": {"url": "https://img.example/alien.jpg"}}"#,
            )],
            1,
        )));
        let transport = MockTransport {
            fail_photos: true,
            ..Default::default()
        };
        let engine = engine(catalog, transport.clone(), RecordingHistory::default());

        engine.on_text(CHAT, USER, "by name").await;
        engine.on_text(CHAT, USER, "Alien").await;

        let sent = transport.sent();
        let Sent::Photo { caption, .. } = &sent[1] else {
            panic!("expected photo attempt, got {:?}", sent[1]);
        };
        // Mandatory fallback: same caption, as text
        assert_eq!(sent[2], Sent::Text(caption.clone()));
    }

    #[tokio::test]
    async fn test_rating_flow_renders_each_record_and_pager() {
        let catalog = StubCatalog::default().respond_with(Ok(page(
            vec![
                record(r#"{"name": "A", "rating": {"kp": 9.0}}"#),
                record(r#"{"name": "B", "rating": {"kp": 8.9}}"#),
            ],
            12,
        )));
        let transport = MockTransport::default();
        let engine = engine(catalog, transport.clone(), RecordingHistory::default());

        engine.on_text(CHAT, USER, "by rating").await;
        engine.on_text(CHAT, USER, "7.5").await;

        let sent = transport.sent();
        let pagers: Vec<&Pager> = sent
            .iter()
            .filter_map(|s| match s {
                Sent::Pager(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(pagers.len(), 1);
        assert_eq!(pagers[0].prev, None);
        assert_eq!(pagers[0].label, "1/3");
        assert_eq!(pagers[0].next.as_deref(), Some("rating:2:7.5"));

        // Two result cards were delivered as text
        let cards = transport
            .texts()
            .into_iter()
            .filter(|t| t.starts_with("\u{1f3ac}"))
            .count();
        assert_eq!(cards, 2);
    }

    #[tokio::test]
    async fn test_no_pager_when_single_page() {
        let catalog = StubCatalog::default().respond_with(Ok(page(
            vec![record(r#"{"name": "A", "rating": {"kp": 9.0}}"#)],
            5,
        )));
        let transport = MockTransport::default();
        let engine = engine(catalog, transport.clone(), RecordingHistory::default());

        engine.on_text(CHAT, USER, "by rating").await;
        engine.on_text(CHAT, USER, "9").await;

        assert!(!transport
            .sent()
            .iter()
            .any(|s| matches!(s, Sent::Pager(_))));
    }

    #[tokio::test]
    async fn test_budget_flow_drops_records_without_budget() {
        let catalog = StubCatalog::default().respond_with(Ok(page(
            vec![
                record(r#"{"name": "Costly", "budget": {"value": 200000000, "currency": "USD"}}"#),
                record(r#"{"name": "Mystery"}"#),
            ],
            2,
        )));
        let transport = MockTransport::default();
        let engine = engine(catalog, transport.clone(), RecordingHistory::default());

        engine.on_text(CHAT, USER, "by budget").await;
        engine.on_text(CHAT, USER, "100").await;

        let cards: Vec<String> = transport
            .texts()
            .into_iter()
            .filter(|t| t.starts_with("\u{1f3ac}"))
            .collect();
        assert_eq!(cards.len(), 1);
        assert!(cards[0].contains("*Costly*"));
        assert!(cards[0].contains("$200,000,000"));
    }

    #[tokio::test]
    async fn test_navigation_reissues_query_at_new_page() {
        let catalog = StubCatalog::default().respond_with(Ok(page(
            vec![record(r#"{"name": "A", "rating": {"kp": 9.0}}"#)],
            12,
        )));
        let transport = MockTransport::default();
        let history = RecordingHistory::default();
        let engine = engine(catalog.clone(), transport.clone(), history.clone());

        engine
            .on_navigation(CHAT, MessageId(44), "rating:2:7.5")
            .await;

        // Old pager removed, loading notice sent
        let sent = transport.sent();
        assert_eq!(sent[0], Sent::Deleted(MessageId(44)));
        assert_eq!(sent[1], Sent::Text("Loading page 2...".to_string()));

        // Identical to the original query in kind and parameter, page aside
        let requests = catalog.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            SearchQuery::rating(7.5).with_page(2).to_request()
        );

        // Navigation never writes history
        assert!(history.records().is_empty());
    }

    #[tokio::test]
    async fn test_navigation_does_not_touch_dialog_state() {
        let catalog = StubCatalog::default()
            .respond_with(Ok(page(vec![record(r#"{"name": "Dune"}"#)], 1)))
            .respond_with(Ok(page(vec![], 0)));
        let transport = MockTransport::default();
        let engine = engine(catalog.clone(), transport.clone(), RecordingHistory::default());

        engine.on_text(CHAT, USER, "by name").await;
        engine
            .on_navigation(CHAT, MessageId(5), "rating:2:7.5")
            .await;
        // The pending name dialog is still open
        engine.on_text(CHAT, USER, "Dune").await;

        let requests = catalog.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1], SearchQuery::name("Dune").to_request());
    }

    #[tokio::test]
    async fn test_failed_pager_delete_is_non_fatal() {
        let catalog = StubCatalog::default().respond_with(Ok(page(
            vec![record(r#"{"name": "A", "rating": {"kp": 9.0}}"#)],
            12,
        )));
        let transport = MockTransport {
            fail_deletes: true,
            ..Default::default()
        };
        let engine = engine(catalog, transport.clone(), RecordingHistory::default());

        engine
            .on_navigation(CHAT, MessageId(9), "rating:2:7.5")
            .await;

        // The new page still rendered
        assert!(transport
            .texts()
            .iter()
            .any(|t| t.starts_with("\u{1f3ac}")));
    }

    #[tokio::test]
    async fn test_bad_navigation_token_gets_generic_message() {
        let catalog = StubCatalog::default();
        let transport = MockTransport::default();
        let engine = engine(catalog.clone(), transport.clone(), RecordingHistory::default());

        engine.on_navigation(CHAT, MessageId(5), "rating:x:y").await;

        assert_eq!(
            transport.texts(),
            vec!["Could not change the page. Please run the search again.".to_string()]
        );
        assert!(catalog.requests().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_error_maps_to_user_message() {
        let catalog = StubCatalog::default().respond_with(Err(CatalogError::Timeout));
        let transport = MockTransport::default();
        let engine = engine(catalog, transport.clone(), RecordingHistory::default());

        engine.on_text(CHAT, USER, "by name").await;
        engine.on_text(CHAT, USER, "Dune").await;

        assert!(transport
            .texts()
            .contains(&CatalogError::Timeout.user_message()));
    }

    #[tokio::test]
    async fn test_empty_results_messages() {
        let catalog = StubCatalog::default().respond_with(Ok(page(vec![], 0)));
        let transport = MockTransport::default();
        let engine = engine(catalog, transport.clone(), RecordingHistory::default());

        engine.on_text(CHAT, USER, "by name").await;
        engine.on_text(CHAT, USER, "duen").await;
        assert!(transport
            .texts()
            .contains(&"Nothing found for \u{ab}duen\u{bb}.".to_string()));
    }

    #[tokio::test]
    async fn test_greeting_menu_and_cancel() {
        let transport = MockTransport::default();
        let engine = engine(
            StubCatalog::default(),
            transport.clone(),
            RecordingHistory::default(),
        );

        engine.on_text(CHAT, USER, "/start").await;
        engine.on_text(CHAT, USER, "search").await;
        engine.on_text(CHAT, USER, "by rating").await;
        engine.on_text(CHAT, USER, "back").await;

        assert_eq!(
            transport.texts(),
            vec![
                GREETING.to_string(),
                MENU.to_string(),
                "Enter a minimum rating from 0 to 10 (for example, 7.5):".to_string(),
                CANCELLED.to_string(),
            ]
        );
    }
}
