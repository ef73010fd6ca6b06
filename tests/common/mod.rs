//! 集成测试公共装配：wiremock 后端 + 内存存储 + 手动时钟
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use doctor_exam_client::infrastructure::{Clock, ManualClock, MemoryStorage, Storage};
use doctor_exam_client::{App, Config};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub app: App,
    pub server: MockServer,
    pub clock: Arc<ManualClock>,
    pub durable: Arc<MemoryStorage>,
    pub tab: Arc<MemoryStorage>,
}

/// 2026-10-01 08:00 UTC
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap()
}

pub fn test_config(server: &MockServer) -> Config {
    Config {
        api_base_url: format!("{}/api", server.uri()),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

pub async fn setup() -> TestApp {
    let server = MockServer::start().await;
    let durable = Arc::new(MemoryStorage::new());
    let tab = Arc::new(MemoryStorage::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let app = build_app(&server, &durable, &tab, &clock);
    TestApp {
        app,
        server,
        clock,
        durable,
        tab,
    }
}

/// 在同一套持久化存储上再装配一个应用（模拟关闭浏览器后重新打开）
pub fn build_app(
    server: &MockServer,
    durable: &Arc<MemoryStorage>,
    tab: &Arc<MemoryStorage>,
    clock: &Arc<ManualClock>,
) -> App {
    let durable: Arc<dyn Storage> = durable.clone();
    let tab: Arc<dyn Storage> = tab.clone();
    let clock: Arc<dyn Clock> = clock.clone();
    App::with_parts(test_config(server), durable, tab, clock).expect("装配应用失败")
}

pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 200,
        "message": "success",
        "data": data,
    }))
}

pub fn question_json(id: u32, kind: u8, difficulty: u8, answer: u8) -> Value {
    json!({
        "id": id,
        "type": kind,
        "difficulty": difficulty,
        "question": format!("第{}题：以下哪项正确？", id),
        "options": ["选项一", "选项二", "选项三", "选项四"],
        "answer": answer,
        "analysis": format!("第{}题解析", id),
        "keywords": [format!("关键词{}", id)],
    })
}

/// 1..=n 的题目，正确答案都是 1，题型 / 难度按 1-5 轮换
pub fn bank_json(n: u32) -> Value {
    Value::Array(
        (1..=n)
            .map(|id| question_json(id, ((id - 1) % 5 + 1) as u8, ((id - 1) % 5 + 1) as u8, 1))
            .collect(),
    )
}

pub async fn mount_login(server: &MockServer, token: &str, username: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ok(json!({
            "token": token,
            "user": { "id": 7, "username": username, "role": "user" },
        })))
        .mount(server)
        .await;
}

pub async fn mount_bank(server: &MockServer, n: u32) {
    Mock::given(method("GET"))
        .and(path("/api/questions"))
        .respond_with(ok(bank_json(n)))
        .mount(server)
        .await;
}

pub async fn mount_training(server: &MockServer, n: u32) {
    Mock::given(method("GET"))
        .and(path("/api/training/questions"))
        .respond_with(ok(bank_json(n)))
        .mount(server)
        .await;
}

pub async fn login(t: &TestApp, remember: bool) {
    mount_login(&t.server, "tok-alice", "alice").await;
    let outcome = t.app.auth.login("alice", "secret1", remember).await;
    assert!(outcome.success, "登录失败: {}", outcome.message);
}
