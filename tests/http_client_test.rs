//! HTTP 封装：信封解包、状态码归一化、401 处理、加载指示
mod common;

use common::{login, ok, setup, start_time};
use doctor_exam_client::error::{ApiError, AppError};
use doctor_exam_client::infrastructure::{ManualClock, MemoryStorage, RequestOptions, ToastLevel, View};
use doctor_exam_client::{App, Config};
use doctor_exam_client::models::Feedback;
use doctor_exam_client::session::SessionState;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn envelope_success_yields_data() {
    let t = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/system/info"))
        .respond_with(ok(json!({ "version": "2.1.0" })))
        .mount(&t.server)
        .await;

    let info = t.app.api.system.info().await.unwrap();
    assert_eq!(info, json!({ "version": "2.1.0" }));
}

#[tokio::test]
async fn code_zero_without_data_returns_whole_body() {
    let t = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/system/time"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "serverTime": 1 })),
        )
        .mount(&t.server)
        .await;

    let body = t.app.api.system.server_time().await.unwrap();
    assert_eq!(body["serverTime"], 1);
}

#[tokio::test]
async fn get_carries_token_and_cache_buster() {
    let t = setup().await;
    login(&t, false).await;

    Mock::given(method("GET"))
        .and(path("/api/stats/system"))
        .and(header("authorization", "Bearer tok-alice"))
        .and(query_param("_t", start_time().timestamp_millis().to_string()))
        .respond_with(ok(json!({ "users": 3 })))
        .expect(1)
        .mount(&t.server)
        .await;

    let stats = t.app.api.stats.system().await.unwrap();
    assert_eq!(stats["users"], 3);
}

#[tokio::test]
async fn http_401_expires_session_and_redirects_to_login() {
    let t = setup().await;
    login(&t, false).await;
    t.app.router.go(View::Question);

    Mock::given(method("GET"))
        .and(path("/api/stats/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&t.server)
        .await;

    let err = t.app.api.stats.user().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(t.app.session.state(), SessionState::Expired);
    assert!(t.app.session.token().is_none());
    assert!(!t.app.session.is_logged_in());
    assert_eq!(t.app.router.current(), View::Login);

    let toast = t.app.toasts.latest().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "登录已过期，请重新登录");
}

#[tokio::test]
async fn envelope_401_is_treated_like_http_401() {
    let t = setup().await;
    login(&t, true).await;
    t.app.router.go(View::Wrong);

    Mock::given(method("GET"))
        .and(path("/api/stats/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 401, "message": "token invalid" })),
        )
        .mount(&t.server)
        .await;

    let err = t.app.api.stats.user().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(t.app.session.token().is_none());
    assert_eq!(t.app.router.current(), View::Login);
}

#[tokio::test]
async fn status_codes_map_to_error_kinds() {
    let t = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/api/questions/1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&t.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/questions/2"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "题目已被引用" })),
        )
        .mount(&t.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/questions/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&t.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/questions/4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&t.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/questions/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 1001, "message": "题目不可删除" })),
        )
        .mount(&t.server)
        .await;

    let questions = &t.app.api.questions;

    match questions.delete(1).await.unwrap_err() {
        AppError::Api(ApiError::Forbidden { message }) => assert_eq!(message, "没有权限执行此操作"),
        other => panic!("unexpected error {:?}", other),
    }
    match questions.delete(2).await.unwrap_err() {
        AppError::Api(ApiError::Validation { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "题目已被引用");
        }
        other => panic!("unexpected error {:?}", other),
    }
    match questions.delete(3).await.unwrap_err() {
        AppError::Api(ApiError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "服务器内部错误");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(matches!(
        questions.delete(4).await.unwrap_err(),
        AppError::Api(ApiError::NotFound { .. })
    ));
    match questions.delete(5).await.unwrap_err() {
        AppError::Api(ApiError::Business { code, message }) => {
            assert_eq!(code, 1001);
            assert_eq!(message, "题目不可删除");
        }
        other => panic!("unexpected error {:?}", other),
    }

    // 每次失败都有一条错误提示
    let toasts = t.app.toasts.drain();
    assert_eq!(toasts.len(), 5);
    assert!(toasts.iter().all(|t| t.level == ToastLevel::Error));
    assert_eq!(toasts[4].message, "题目不可删除");
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let config = Config {
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    };
    let app = App::with_parts(
        config,
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
        Arc::new(ManualClock::new(start_time())),
    )
    .unwrap();

    let err = app.api.system.info().await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::Network { .. })), "{:?}", err);
    assert_eq!(
        app.toasts.latest().unwrap().message,
        "网络连接异常，请检查网络设置"
    );
}

#[tokio::test]
async fn loading_indicator_follows_request_options() {
    let t = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/system/feedback"))
        .respond_with(ok(json!({})).set_delay(Duration::from_millis(300)))
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats/system"))
        .respond_with(ok(json!({})).set_delay(Duration::from_millis(300)))
        .mount(&t.server)
        .await;

    // 非 GET 默认显示
    let api = t.app.api.clone();
    let post = tokio::spawn(async move {
        let feedback = Feedback {
            kind: "bug".to_string(),
            content: "页面卡顿".to_string(),
            contact: None,
        };
        api.system.feedback(&feedback).await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(t.app.loading.is_visible());
    post.await.unwrap().unwrap();
    assert!(!t.app.loading.is_visible());

    // GET 默认不显示
    let api = t.app.api.clone();
    let get = tokio::spawn(async move { api.stats.system().await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!t.app.loading.is_visible());
    get.await.unwrap().unwrap();

    assert!(!RequestOptions::quiet().show_loading.unwrap_or(true));
}
