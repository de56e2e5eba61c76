//! Cinescout Core - Headless Conversational Movie Search
//!
//! This crate is the conversational search engine behind the cinescout bot,
//! completely independent of any chat network. It can sit behind a bot API
//! adapter, the console surface in `cinescout-daemon`, or a test harness.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Chat Transports                         │
//! │   ┌───────────┐  ┌────────────────┐  ┌───────────────────┐   │
//! │   │  Bot API  │  │    Console     │  │  Test / Headless  │   │
//! │   │  adapter  │  │   (daemon)     │  │                   │   │
//! │   └─────┬─────┘  └───────┬────────┘  └─────────┬─────────┘   │
//! │         └────────────────┴───────────┬─────────┘             │
//! │                                      │                       │
//! │                   ChatEvent (up)     │                       │
//! │              ChatTransport calls (down)                      │
//! └──────────────────────────────────────┼───────────────────────┘
//!                                        │
//! ┌──────────────────────────────────────┼───────────────────────┐
//! │                   ENGINE             │                       │
//! │  ┌───────────────────────────────────┴──────────────────┐    │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌─────────┐  │    │
//! │  │  │  Dialog  │ │ Catalog  │ │ Renderer │ │  Pager  │  │    │
//! │  │  │  states  │ │  client  │ │          │ │ /tokens │  │    │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └─────────┘  │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! An inbound text message runs through the dialog state machine, which
//! either starts a dialog, validates a pending answer, or ignores it. A
//! completed dialog builds a catalog query, fetches one page, renders each
//! record, and attaches pagination controls when more pages exist. A
//! navigation action decodes its page token and re-enters at the catalog
//! client, bypassing dialog state entirely.
//!
//! # Key Types
//!
//! - [`engine::Engine`]: the orchestration core
//! - [`engine::ChatEvent`]: inbound events from the transport
//! - [`catalog::SearchQuery`]: one search at one page, immutable
//! - [`session::SessionStore`]: per-chat dialog state (sharded, never a
//!   global lock)
//! - [`transport::ChatTransport`] / [`history::HistorySink`]: the external
//!   collaborator seams
//!
//! # Module Overview
//!
//! - [`catalog`]: queries, wire types, and the HTTP client
//! - [`config`]: environment-driven engine configuration
//! - [`engine`]: the event-driven orchestration core
//! - [`history`]: history collaborator seam
//! - [`pagination`]: page math and opaque page tokens
//! - [`render`]: record-to-caption formatting
//! - [`session`]: dialog state machine
//! - [`transport`]: chat transport seam

pub mod catalog;
pub mod config;
pub mod engine;
pub mod history;
pub mod pagination;
pub mod render;
pub mod session;
pub mod transport;

pub use catalog::{CatalogBackend, CatalogClient, CatalogError, SearchQuery};
pub use config::EngineConfig;
pub use engine::{ChatEvent, Engine};
pub use history::{HistorySink, NullHistory};
pub use pagination::{NavigationDecodeError, PageControls, PageToken};
pub use render::{render, DisplayUnit};
pub use session::{Action, Command, DialogState, InputKind, SessionStore, ValidationError};
pub use transport::{ChatId, ChatTransport, MessageId, Pager, UserId};
