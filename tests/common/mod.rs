//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use blog_server::config::{BlogConfig, DatabaseConfig, Environment, LoggingConfig};
use blog_server::db::Database;
use blog_server::observability::LogService;
use blog_server::{HttpServer, Shutdown};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running server rooted in its own temp directory.
pub struct TestServer {
    pub addr: SocketAddr,
    pub log: LogService,
    pub client: reqwest::Client,
    pub database_url: String,
    dir: TempDir,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

/// Start a server on an ephemeral port. `tweak` adjusts the defaults.
pub async fn start_server(tweak: impl FnOnce(&mut BlogConfig)) -> TestServer {
    let dir = tempfile::tempdir().unwrap();

    let mut config = BlogConfig::default();
    config.environment = Environment::Development;
    config.listener.bind_address = "127.0.0.1:0".into();
    config.logging = LoggingConfig {
        dir: dir.path().join("logs").to_string_lossy().into_owned(),
        console: Some(false),
        ..LoggingConfig::default()
    };
    config.database = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("blog.db").display()),
        ..DatabaseConfig::default()
    };
    config.http.static_dir = None;
    tweak(&mut config);

    let database_url = config.database.url.clone();
    let log = LogService::open(&config.logging, config.environment).unwrap();
    let db = Database::connect(&config.database, log.clone()).await.unwrap();
    db.migrate().await.unwrap();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, db, log.clone());
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    TestServer {
        addr,
        log,
        client,
        database_url,
        dir,
        shutdown,
        handle,
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    /// Every record in files of `category`, after flushing the writer.
    pub async fn records(&self, category: &str) -> Vec<Value> {
        self.log.flush().await;
        read_records(&self.log_dir(), category)
    }

    /// Records carrying `request_id`, in write order.
    pub async fn records_for(&self, request_id: &str) -> Vec<Value> {
        self.records("combined")
            .await
            .into_iter()
            .filter(|r| r["request_id"] == request_id)
            .collect()
    }

    /// Run raw SQL on a separate connection to the server's database file.
    pub async fn execute_sql(&self, sql: &str) {
        let pool = sqlx::SqlitePool::connect(&self.database_url).await.unwrap();
        sqlx::query(sql).execute(&pool).await.unwrap();
        pool.close().await;
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = self.handle.await;
        self.log.shutdown().await;
    }
}

pub fn read_records(dir: &Path, category: &str) -> Vec<Value> {
    let prefix = format!("{}-", category);
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(&prefix))
        .collect();
    names.sort();

    let mut records = Vec::new();
    for name in names {
        let content = std::fs::read_to_string(dir.join(name)).unwrap();
        for line in content.lines() {
            records.push(serde_json::from_str(line).unwrap());
        }
    }
    records
}
