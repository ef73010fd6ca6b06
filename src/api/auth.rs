//! 认证接口

use crate::error::AppResult;
use crate::infrastructure::{HttpClient, RequestOptions};
use crate::models::{LoginResponse, RegisterResponse, UserProfile};
use serde_json::{json, Value};

#[derive(Clone)]
pub struct AuthApi {
    http: HttpClient,
}

impl AuthApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let body = json!({ "username": username, "password": password });
        Ok(self
            .http
            .post_as("/auth/login", &body, RequestOptions::default())
            .await?)
    }

    pub async fn register(&self, username: &str, password: &str) -> AppResult<RegisterResponse> {
        let body = json!({ "username": username, "password": password });
        Ok(self
            .http
            .post_as("/auth/register", &body, RequestOptions::default())
            .await?)
    }

    /// 当前登录用户信息
    pub async fn profile(&self) -> AppResult<UserProfile> {
        Ok(self
            .http
            .get_as("/auth/profile", None, RequestOptions::quiet())
            .await?)
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.http
            .post("/auth/logout", &json!({}), RequestOptions::quiet())
            .await?;
        Ok(())
    }

    /// 刷新令牌，返回后端载荷（可能带新 token）
    pub async fn refresh(&self, token: &str) -> AppResult<Value> {
        Ok(self
            .http
            .post("/auth/refresh", &json!({ "token": token }), RequestOptions::quiet())
            .await?)
    }

    /// 发送重置密码邮件
    pub async fn reset_password(&self, email: &str) -> AppResult<Value> {
        Ok(self
            .http
            .post("/auth/reset-password", &json!({ "email": email }), RequestOptions::default())
            .await?)
    }
}
