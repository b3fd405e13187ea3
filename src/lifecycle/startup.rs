//! Listener startup.

use std::io;

use serde_json::json;
use tokio::net::TcpListener;

use crate::db::Database;
use crate::observability::LogService;

use super::shutdown::release;

/// Bind the HTTP listener. On failure the pool is closed and the log
/// writer drained before the error is returned.
pub async fn bind_listener(address: &str, db: &Database, log: &LogService) -> io::Result<TcpListener> {
    let bound = TcpListener::bind(address).await.and_then(|listener| {
        let local = listener.local_addr()?;
        Ok((listener, local))
    });

    match bound {
        Ok((listener, local)) => {
            log.info("Server listening", json!({ "address": local.to_string() }));
            Ok(listener)
        }
        Err(e) => {
            log.error(
                "Failed to bind listener",
                json!({ "address": address, "error": e.to_string() }),
            );
            release(db, log).await;
            Err(e)
        }
    }
}
