//! Shutdown coordination for the blog server.

use tokio::sync::broadcast;

use crate::db::Database;
use crate::observability::LogService;

/// Broadcast trigger that the HTTP server and tests subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Release process resources once the server has stopped accepting.
///
/// The pool closes first so its final records reach the log, then the
/// log writer drains and exits.
pub async fn release(db: &Database, log: &LogService) {
    db.close().await;
    log.info("Server stopped", serde_json::json!({}));
    log.shutdown().await;
}
