//! Query History Seam
//!
//! The history log is an external collaborator: the core only produces a
//! one-line description of each completed search and hands it to a
//! [`HistorySink`]. Storage, retention, and display belong to the sink.
//!
//! Recording is fire-and-forget. The engine logs sink failures at warn
//! level and never lets them abort or delay a search.

use async_trait::async_trait;

use crate::transport::UserId;

/// Receiver for completed-search descriptions
#[async_trait]
pub trait HistorySink: Send + Sync {
    /// Record that `user` performed the search described by `description`
    async fn record(&self, user: UserId, description: &str) -> anyhow::Result<()>;
}

/// Sink that discards every record
///
/// Useful for tests and embedders that do not keep history.
pub struct NullHistory;

#[async_trait]
impl HistorySink for NullHistory {
    async fn record(&self, _user: UserId, _description: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
