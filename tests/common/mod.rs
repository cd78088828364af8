#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wizards_bay::dao::MemoryStore;
use wizards_bay::notification::{NotificationError, Notifier};
use wizards_bay::state::AppState;

/// A mail that would have gone out
#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Notifications run on spawned tasks, so poll until `count` arrive
    pub async fn wait_for(&self, count: usize) -> Vec<SentMail> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Fresh in-memory state plus a handle on the notifications it sends
pub fn test_state() -> (AppState, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::new(Arc::new(MemoryStore::new()), notifier.clone());
    (state, notifier)
}

pub fn basic(username: &str, password: &str) -> (HeaderName, HeaderValue) {
    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Basic {}", encoded)).unwrap(),
    )
}

pub fn password_for(username: &str) -> String {
    format!("{}-password", username)
}

/// Credentials header for a user created through [`create_user`]
pub fn auth(username: &str) -> (HeaderName, HeaderValue) {
    basic(username, &password_for(username))
}

pub async fn create_user(server: &TestServer, username: &str) -> Value {
    let response = server
        .post("/user")
        .json(&json!({
            "username": username,
            "password": password_for(username),
            "first_name": username,
            "last_name": "Tester",
            "address": "12 Grimmauld Place",
            "email": format!("{}@example.com", username),
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()
}

pub async fn create_item(server: &TestServer, seller: &str, name: &str) -> Value {
    let (header, value) = auth(seller);
    let response = server
        .post("/item")
        .add_header(header, value)
        .json(&json!({ "name": name, "description": format!("A fine {}", name) }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().unwrap()
}
