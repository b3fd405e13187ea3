//! The observer chain as seen through the written log files.

use blog_server::config::RouteClassification;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

fn messages(records: &[Value]) -> Vec<&str> {
    records.iter().map(|r| r["message"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_one_incoming_and_one_completion_record() {
    let server = common::start_server(|_| {}).await;

    let res = server
        .client
        .get(server.url("/blog?page=1"))
        .header("x-request-id", "req-list")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "req-list");

    let records = server.records_for("req-list").await;
    assert_eq!(messages(&records), vec!["Incoming Request", "Success Response"]);

    let incoming = &records[0];
    assert_eq!(incoming["level"], "info");
    assert_eq!(incoming["method"], "GET");
    assert_eq!(incoming["url"], "/blog?page=1");
    assert_eq!(incoming["ip"], "127.0.0.1");
    assert_eq!(incoming["service"], "gaming-blog");

    let done = &records[1];
    assert_eq!(done["status"], 200);
    assert!(done["duration"].as_str().unwrap().ends_with("ms"));
    assert!(done["duration_ms"].is_u64());

    server.stop().await;
}

#[tokio::test]
async fn test_completion_level_follows_status() {
    let server = common::start_server(|_| {}).await;

    let res = server
        .client
        .get(server.url("/blog/31337"))
        .header("x-request-id", "req-missing")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let records = server.records_for("req-missing").await;
    let done = records.last().unwrap();
    assert_eq!(done["message"], "Client Error Response");
    assert_eq!(done["level"], "warn");
    assert_eq!(done["status"], 404);

    // Warnings stay out of the error-only file.
    let errors = server.records("error").await;
    assert!(errors.iter().all(|r| r["level"] == "error"));
    assert!(errors.iter().all(|r| r["request_id"] != "req-missing"));

    server.stop().await;
}

#[tokio::test]
async fn test_auth_and_crud_tags() {
    let server = common::start_server(|_| {}).await;

    server
        .client
        .post(server.url("/blog/login"))
        .header("x-request-id", "req-login")
        .json(&json!({ "email": "nobody@example.com", "password": "x" }))
        .send()
        .await
        .unwrap();
    let records = server.records_for("req-login").await;
    let names = messages(&records);
    assert_eq!(names[0], "Incoming Request");
    assert_eq!(names[1], "Authentication Attempt");
    assert_eq!(records[1]["action"], "login");
    assert_eq!(names.last(), Some(&"Client Error Response"));

    server
        .client
        .put(server.url("/blog/5"))
        .header("x-request-id", "req-update")
        .json(&json!({ "title": "t", "content": "c" }))
        .send()
        .await
        .unwrap();
    let records = server.records_for("req-update").await;
    let tagged: Vec<_> = records
        .iter()
        .filter(|r| r["message"] == "CRUD Operation Detected")
        .collect();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0]["operation"], "update");

    // Reads are never tagged.
    server
        .client
        .get(server.url("/blog/5"))
        .header("x-request-id", "req-read")
        .send()
        .await
        .unwrap();
    let records = server.records_for("req-read").await;
    assert_eq!(messages(&records), vec!["Incoming Request", "Client Error Response"]);

    server.stop().await;
}

#[tokio::test]
async fn test_substring_classification_tags_marker_paths() {
    let server = common::start_server(|config| {
        config.http.route_classification = RouteClassification::PathSubstring;
    })
    .await;

    server
        .client
        .get(server.url("/blog/recreate"))
        .header("x-request-id", "req-marker")
        .send()
        .await
        .unwrap();
    let records = server.records_for("req-marker").await;
    assert!(records
        .iter()
        .any(|r| r["message"] == "CRUD Operation Detected" && r["operation"] == "create"));

    server.stop().await;
}

#[tokio::test]
async fn test_slow_requests_warn() {
    let server = common::start_server(|config| {
        config.http.slow_request_threshold_ms = 0;
    })
    .await;

    // Password hashing keeps this well above zero milliseconds.
    server
        .client
        .post(server.url("/blog/register"))
        .header("x-request-id", "req-slow")
        .json(&json!({ "username": "misty", "email": "misty@example.com", "password": "starmie" }))
        .send()
        .await
        .unwrap();

    let records = server.records_for("req-slow").await;
    let names = messages(&records);
    let slow = names.iter().position(|m| *m == "Slow Request Detected").unwrap();
    let done = names.iter().position(|m| *m == "Success Response").unwrap();
    assert!(slow < done);
    assert_eq!(records[slow]["level"], "warn");
    assert_eq!(records[slow]["threshold"], "0ms");

    server.stop().await;
}

#[tokio::test]
async fn test_access_file_mirrors_request_records() {
    let server = common::start_server(|_| {}).await;

    server
        .client
        .get(server.url("/blog"))
        .header("x-request-id", "req-access")
        .send()
        .await
        .unwrap();

    let access = server.records("access").await;
    assert!(access
        .iter()
        .any(|r| r["request_id"] == "req-access" && r["message"] == "Incoming Request"));

    server.stop().await;
}
