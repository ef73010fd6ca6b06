//! 接口模块：系统工具、用户排行榜、重置密码
mod common;

use common::{ok, setup};
use doctor_exam_client::api::LeaderboardQuery;
use doctor_exam_client::models::IssueReport;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn update_check_and_public_config() {
    let t = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/system/updates/check"))
        .respond_with(ok(json!({ "hasUpdate": false, "version": "1.2.0" })))
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/system/config"))
        .respond_with(ok(json!({ "examTimeLimit": 900 })))
        .mount(&t.server)
        .await;

    let updates = t.app.api.system.check_for_updates().await.unwrap();
    assert_eq!(updates["version"], "1.2.0");
    let config = t.app.api.system.public_config().await.unwrap();
    assert_eq!(config["examTimeLimit"], 900);
}

#[tokio::test]
async fn issue_report_fills_defaults() {
    let t = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/system/issues"))
        .and(body_partial_json(json!({
            "title": "交卷按钮无响应",
            "description": "点击后没有反应",
            "severity": "medium",
            "steps": [],
            "attachments": [],
        })))
        .respond_with(ok(json!({ "issueId": 3 })))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/system/issues"))
        .and(body_partial_json(json!({
            "title": "题目图片缺失",
            "severity": "high",
            "steps": ["打开第7题"],
        })))
        .respond_with(ok(json!({ "issueId": 4 })))
        .expect(1)
        .mount(&t.server)
        .await;

    let first = t
        .app
        .api
        .system
        .report_issue(&IssueReport {
            title: "交卷按钮无响应".to_string(),
            description: "点击后没有反应".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(first["issueId"], 3);

    let second = t
        .app
        .api
        .system
        .report_issue(&IssueReport {
            title: "题目图片缺失".to_string(),
            description: String::new(),
            severity: Some("high".to_string()),
            steps: Some(vec!["打开第7题".to_string()]),
            attachments: None,
        })
        .await
        .unwrap();
    assert_eq!(second["issueId"], 4);
}

#[tokio::test]
async fn user_leaderboard_defaults_to_accuracy() {
    let t = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/user/leaderboard"))
        .and(query_param("type", "accuracy"))
        .and(query_param("limit", "10"))
        .respond_with(ok(json!([{ "username": "alice", "accuracy": 0.92 }])))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/leaderboard"))
        .and(query_param("type", "count"))
        .and(query_param("limit", "3"))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&t.server)
        .await;

    let board = t
        .app
        .api
        .exams
        .user_leaderboard(&LeaderboardQuery::default())
        .await
        .unwrap();
    assert_eq!(board[0]["username"], "alice");

    let board = t
        .app
        .api
        .exams
        .user_leaderboard(&LeaderboardQuery {
            kind: Some("count".to_string()),
            limit: Some(3),
        })
        .await
        .unwrap();
    assert_eq!(board, json!([]));
}

#[tokio::test]
async fn reset_password_requires_email() {
    let t = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .and(body_partial_json(json!({ "email": "alice@example.com" })))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&t.server)
        .await;

    let outcome = t.app.auth.reset_password("  ").await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "请输入邮箱地址");

    let outcome = t.app.auth.reset_password("alice@example.com").await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "重置密码链接已发送到您的邮箱");
}

#[tokio::test]
async fn reset_password_failure_is_folded() {
    let t = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&t.server)
        .await;

    let outcome = t.app.auth.reset_password("bob@example.com").await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "请求的资源不存在");
}
