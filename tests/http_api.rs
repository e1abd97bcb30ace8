//! End-to-end tests: serve the router on an ephemeral port over the
//! in-memory store and drive it with `reqwest`.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use moltforge_api::api::build_app;
use moltforge_api::app_state::AppState;
use moltforge_api::config::ServiceConfig;
use moltforge_api::persistence::{BotStore, MemoryStore};

struct TestApp {
    base: String,
    client: Client,
}

impl TestApp {
    async fn spawn(strict_status: bool) -> Self {
        let config = ServiceConfig {
            strict_status,
            ..ServiceConfig::default()
        };
        let store: Arc<dyn BotStore> = Arc::new(MemoryStore::new());
        let app = build_app(AppState::new(store, &config), Duration::from_secs(5));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base: format!("http://{addr}"),
            client: Client::new(),
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> (StatusCode, Value) {
        let Ok(resp) = req.send().await else {
            panic!("request failed");
        };
        let status = resp.status();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(self.client.get(format!("{}{path}", self.base)))
            .await
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(self.client.post(format!("{}{path}", self.base)).json(&body))
            .await
    }

    async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(self.client.patch(format!("{}{path}", self.base)).json(&body))
            .await
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.send(self.client.delete(format!("{}{path}", self.base)))
            .await
    }

    async fn create_bot(&self, name: &str, bot_type: &str) -> String {
        let (status, body) = self
            .post("/api/bots", json!({ "name": name, "type": bot_type }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let Some(id) = body["id"].as_str() else {
            panic!("bot without id: {body}");
        };
        id.to_string()
    }

    async fn logs_of(&self, id: &str) -> Vec<Value> {
        let (status, body) = self.get(&format!("/api/bots/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        let Some(logs) = body["logs"].as_array() else {
            panic!("detail without logs: {body}");
        };
        logs.clone()
    }
}

#[tokio::test]
async fn create_bot_starts_stopped_with_creation_log() {
    let app = TestApp::spawn(false).await;
    let (status, bot) = app
        .post(
            "/api/bots",
            json!({ "name": "X", "type": "chat", "config": { "greeting": "hi" } }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bot["status"], "stopped");
    assert_eq!(bot["type"], "chat");
    assert_eq!(bot["config"], r#"{"greeting":"hi"}"#);

    let id = bot["id"].as_str().unwrap_or_default();
    let logs = app.logs_of(id).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["message"], "Bot \"X\" created successfully");
    assert_eq!(logs[0]["level"], "info");
    assert_eq!(logs[0]["botId"], id);
}

#[tokio::test]
async fn create_bot_without_name_or_type_is_rejected() {
    let app = TestApp::spawn(false).await;
    for body in [json!({ "type": "chat" }), json!({ "name": "X" })] {
        let (status, err) = app.post("/api/bots", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].is_string());
    }
    let (_, list) = app.get("/api/bots").await;
    assert_eq!(list.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn control_actions_follow_mapping() {
    let app = TestApp::spawn(false).await;
    let id = app.create_bot("ctl", "trading").await;

    for (action, status, message) in [
        ("start", "running", "Bot started"),
        ("stop", "stopped", "Bot stopped"),
        ("restart", "running", "Bot restarted"),
    ] {
        let (code, bot) = app
            .post(
                &format!("/api/bots/{id}/control"),
                json!({ "action": action }),
            )
            .await;
        assert_eq!(code, StatusCode::OK, "{action}");
        assert_eq!(bot["status"], status, "{action}");

        let logs = app.logs_of(&id).await;
        assert_eq!(logs[0]["message"], message, "{action}");
        assert_eq!(logs[0]["level"], "info", "{action}");
    }
    assert_eq!(app.logs_of(&id).await.len(), 4);
}

#[tokio::test]
async fn invalid_action_leaves_bot_untouched() {
    let app = TestApp::spawn(false).await;
    let id = app.create_bot("inv", "chat").await;

    let (code, err) = app
        .post(
            &format!("/api/bots/{id}/control"),
            json!({ "action": "pause" }),
        )
        .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().is_some_and(|e| e.contains("pause")));

    let (_, bot) = app.get(&format!("/api/bots/{id}")).await;
    assert_eq!(bot["status"], "stopped");
    assert_eq!(app.logs_of(&id).await.len(), 1);
}

#[tokio::test]
async fn control_on_unknown_bot_is_not_found_and_logs_nothing() {
    let app = TestApp::spawn(false).await;
    let missing = uuid::Uuid::new_v4();

    let (code, err) = app
        .post(
            &format!("/api/bots/{missing}/control"),
            json!({ "action": "start" }),
        )
        .await;
    assert_eq!(code, StatusCode::NOT_FOUND);
    assert!(err["error"].is_string());

    let (code, _) = app
        .post("/api/bots/not-a-uuid/control", json!({ "action": "start" }))
        .await;
    assert_eq!(code, StatusCode::NOT_FOUND);

    let (_, page) = app.get("/api/logs").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn start_twice_is_logged_twice() {
    let app = TestApp::spawn(false).await;
    let id = app.create_bot("twice", "automation").await;

    for _ in 0..2 {
        let (code, bot) = app
            .post(
                &format!("/api/bots/{id}/control"),
                json!({ "action": "start" }),
            )
            .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(bot["status"], "running");
    }

    let logs = app.logs_of(&id).await;
    let started: Vec<&Value> = logs
        .iter()
        .filter(|l| l["message"] == "Bot started")
        .collect();
    assert_eq!(started.len(), 2);
    assert_ne!(started[0]["id"], started[1]["id"]);
}

#[tokio::test]
async fn patch_status_logs_with_level() {
    let app = TestApp::spawn(false).await;
    let id = app.create_bot("patch", "custom").await;

    let (code, bot) = app
        .patch(&format!("/api/bots/{id}"), json!({ "status": "error" }))
        .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(bot["status"], "error");
    let logs = app.logs_of(&id).await;
    assert_eq!(logs[0]["level"], "error");
    assert_eq!(logs[0]["message"], "Bot status changed to \"error\"");

    let (_, _) = app
        .patch(&format!("/api/bots/{id}"), json!({ "status": "running" }))
        .await;
    let logs = app.logs_of(&id).await;
    assert_eq!(logs[0]["level"], "info");
    assert_eq!(logs[0]["message"], "Bot status changed to \"running\"");

    let (code, bot) = app
        .patch(
            &format!("/api/bots/{id}"),
            json!({ "description": "renamed", "config": { "a": 1 } }),
        )
        .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(bot["description"], "renamed");
    assert_eq!(bot["config"], r#"{"a":1}"#);
    assert_eq!(app.logs_of(&id).await.len(), 3);
}

#[tokio::test]
async fn strict_status_rejects_unknown_values() {
    let app = TestApp::spawn(true).await;
    let id = app.create_bot("strict", "chat").await;

    let (code, _) = app
        .patch(&format!("/api/bots/{id}"), json!({ "status": "paused" }))
        .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert_eq!(app.logs_of(&id).await.len(), 1);
}

#[tokio::test]
async fn log_listing_filters_and_paginates() {
    let app = TestApp::spawn(false).await;
    let a = app.create_bot("alpha", "chat").await;
    let b = app.create_bot("beta", "chat").await;

    for i in 0..3 {
        for (bot, level) in [(&a, "warn"), (&a, "error"), (&b, "warn")] {
            let (code, _) = app
                .post(
                    "/api/logs",
                    json!({
                        "botId": bot,
                        "level": level,
                        "message": format!("{level} {i}"),
                        "metadata": { "i": i },
                    }),
                )
                .await;
            assert_eq!(code, StatusCode::CREATED);
        }
    }

    let (code, page) = app
        .get(&format!("/api/logs?botId={a}&level=warn&limit=2&offset=0"))
        .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(page["total"], 3);
    let Some(logs) = page["logs"].as_array() else {
        panic!("no logs array: {page}");
    };
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l["botId"] == a.as_str() && l["level"] == "warn"));
    assert_eq!(logs[0]["message"], "warn 2");
    assert_eq!(logs[1]["message"], "warn 1");
    assert_eq!(logs[0]["bot"]["name"], "alpha");
    assert_eq!(logs[0]["metadata"], r#"{"i":2}"#);

    let (_, all) = app.get("/api/logs").await;
    assert_eq!(all["total"], 11);

    let (_, none) = app.get("/api/logs?level=verbose").await;
    assert_eq!(none["total"], 0);
}

#[tokio::test]
async fn log_ingestion_validates_input() {
    let app = TestApp::spawn(false).await;
    let id = app.create_bot("ingest", "chat").await;

    let (code, _) = app.post("/api/logs", json!({ "message": "hi" })).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    let (code, _) = app.post("/api/logs", json!({ "botId": id })).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    let (code, _) = app
        .post(
            "/api/logs",
            json!({ "botId": uuid::Uuid::new_v4(), "message": "orphan" }),
        )
        .await;
    assert_eq!(code, StatusCode::NOT_FOUND);

    let (code, log) = app
        .post("/api/logs", json!({ "botId": id, "message": "hello" }))
        .await;
    assert_eq!(code, StatusCode::CREATED);
    assert_eq!(log["level"], "info");
    assert!(log["metadata"].is_null());
}

#[tokio::test]
async fn delete_removes_bot_and_logs() {
    let app = TestApp::spawn(false).await;
    let id = app.create_bot("doomed", "chat").await;

    let (code, body) = app.delete(&format!("/api/bots/{id}")).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (code, _) = app.get(&format!("/api/bots/{id}")).await;
    assert_eq!(code, StatusCode::NOT_FOUND);

    let (code, _) = app.delete(&format!("/api/bots/{id}")).await;
    assert_eq!(code, StatusCode::NOT_FOUND);

    let (_, page) = app.get(&format!("/api/logs?botId={id}")).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn list_and_stats_reflect_state() {
    let app = TestApp::spawn(false).await;
    let first = app.create_bot("first", "chat").await;
    let second = app.create_bot("second", "trading").await;
    let _ = app
        .post(
            &format!("/api/bots/{first}/control"),
            json!({ "action": "start" }),
        )
        .await;

    let (_, list) = app.get("/api/bots").await;
    let Some(bots) = list.as_array() else {
        panic!("list is not an array: {list}");
    };
    assert_eq!(bots.len(), 2);
    assert_eq!(bots[0]["id"], second.as_str());
    assert_eq!(bots[1]["_count"]["logs"], 2);

    let (_, recent) = app.get("/api/bots?sort=updated&limit=1").await;
    assert_eq!(recent[0]["id"], first.as_str());
    assert_eq!(recent.as_array().map(Vec::len), Some(1));

    let (code, stats) = app.get("/api/stats").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(
        stats,
        json!({ "totalBots": 2, "runningBots": 1, "errorBots": 0, "recentLogs": 3 })
    );
}

#[tokio::test]
async fn health_reports_version() {
    let app = TestApp::spawn(false).await;
    let (code, body) = app.get("/health").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn malformed_body_gets_error_envelope() {
    let app = TestApp::spawn(false).await;
    let req = app
        .client
        .post(format!("{}/api/bots", app.base))
        .header("content-type", "application/json")
        .body("{not json");
    let (code, body) = app.send(req).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn invalid_action_wins_over_unknown_bot() {
    let app = TestApp::spawn(false).await;
    let missing = uuid::Uuid::new_v4();
    let (code, err) = app
        .post(
            &format!("/api/bots/{missing}/control"),
            json!({ "action": "explode" }),
        )
        .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert!(err["error"].as_str().is_some_and(|e| e.contains("explode")));
}

#[tokio::test]
async fn patch_config_null_is_stored() {
    let app = TestApp::spawn(false).await;
    let id = app.create_bot("cfg", "chat").await;

    let (code, bot) = app
        .patch(&format!("/api/bots/{id}"), json!({ "config": null }))
        .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(bot["config"], "null");

    let (_, bot) = app
        .patch(&format!("/api/bots/{id}"), json!({ "name": "cfg2" }))
        .await;
    assert_eq!(bot["config"], "null");
    assert_eq!(bot["name"], "cfg2");
}
