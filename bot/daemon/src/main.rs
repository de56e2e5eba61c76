//! Cinescout Daemon
//!
//! Console front end for the cinescout engine. Reads chat messages from
//! stdin, renders deliveries to stdout, and maps `next`/`prev` onto the
//! pagination controls of the last result page.
//!
//! # Usage
//!
//! ```bash
//! # With the catalog credential from the environment
//! CINESCOUT_API_KEY=... cinescout-daemon
//!
//! # With verbose logging
//! RUST_LOG=debug cinescout-daemon
//! ```
//!
//! # Environment Variables
//!
//! - `CINESCOUT_API_KEY`: catalog API credential (legacy `POISKINO_API_KEY`
//!   is also honored)
//! - `CINESCOUT_API_URL`: catalog API base URL
//! - `RUST_LOG`: log level (trace, debug, info, warn, error)

mod console;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use cinescout_core::{CatalogClient, ChatEvent, ChatId, Engine, EngineConfig, UserId};

use console::{ConsoleTransport, TracingHistory};

/// Console front end for the cinescout movie search engine
#[derive(Debug, Parser)]
#[command(name = "cinescout-daemon", version)]
struct Args {
    /// Catalog API credential
    #[arg(long, env = "CINESCOUT_API_KEY")]
    api_key: Option<String>,

    /// Catalog API base URL
    #[arg(long, env = "CINESCOUT_API_URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cinescout_daemon=info".parse()?)
                .add_directive("cinescout_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = EngineConfig::from_env();
    if args.api_key.is_some() {
        config.api_key = args.api_key;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    let transport = ConsoleTransport::new();
    let engine = Engine::new(
        CatalogClient::new(&config),
        transport.clone(),
        TracingHistory,
    );

    info!("cinescout console started; type '/start' for the greeting, Ctrl-D to quit");

    // Single console session: one chat, one user, events in arrival order
    let chat = ChatId(1);
    let user = UserId(1);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let event = match navigation_event(&transport, chat, &line) {
            Some(event) => event,
            None => ChatEvent::Text {
                chat,
                user,
                text: line,
            },
        };
        engine.handle_event(event).await;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Map `next`/`prev` onto the last printed pagination controls
fn navigation_event(transport: &ConsoleTransport, chat: ChatId, line: &str) -> Option<ChatEvent> {
    let (message, pager) = transport.last_pager()?;
    let token = match line.to_lowercase().as_str() {
        "next" => pager.next.clone()?,
        "prev" => pager.prev.clone()?,
        _ => return None,
    };
    Some(ChatEvent::Navigation {
        chat,
        message,
        token,
    })
}
