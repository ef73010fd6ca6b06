//! HTTP 客户端封装
//!
//! 所有后端请求都经过这里：附加 token、GET 防缓存、加载指示、
//! 状态码归一化、信封解码、401 统一处理、错误提示。

use super::envelope::{failure_message, Envelope};
use super::loading::LoadingIndicator;
use super::router::Router;
use super::toast::Toasts;
use crate::config::Config;
use crate::error::ApiError;
use crate::session::SessionStore;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const UNAUTHORIZED_MESSAGE: &str = "登录已过期，请重新登录";

/// 单次请求选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// 是否显示全局加载；`None` 时 GET 不显示，其它方法显示
    pub show_loading: Option<bool>,
}

impl RequestOptions {
    pub fn quiet() -> Self {
        Self {
            show_loading: Some(false),
        }
    }

    pub fn with_loading() -> Self {
        Self {
            show_loading: Some(true),
        }
    }

    fn resolve(self, method: &Method) -> bool {
        self.show_loading.unwrap_or(*method != Method::GET)
    }
}

/// 待上传的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

enum Payload {
    None,
    Query(Vec<(String, String)>),
    Json(Value),
    Multipart(Form),
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    router: Arc<Router>,
    toasts: Toasts,
    loading: LoadingIndicator,
}

impl HttpClient {
    pub fn new(
        config: &Config,
        session: Arc<SessionStore>,
        router: Arc<Router>,
        toasts: Toasts,
        loading: LoadingIndicator,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Network {
                endpoint: config.api_base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            router,
            toasts,
            loading,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub async fn get(
        &self,
        path: &str,
        query: Option<Value>,
        opts: RequestOptions,
    ) -> Result<Value, ApiError> {
        let payload = query.map_or(Payload::None, |q| Payload::Query(query_pairs(&q)));
        self.execute(Method::GET, path, payload, opts).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOptions,
    ) -> Result<Value, ApiError> {
        let body = self.to_body(path, body)?;
        self.execute(Method::POST, path, Payload::Json(body), opts).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOptions,
    ) -> Result<Value, ApiError> {
        let body = self.to_body(path, body)?;
        self.execute(Method::PUT, path, Payload::Json(body), opts).await
    }

    pub async fn delete(
        &self,
        path: &str,
        query: Option<Value>,
        opts: RequestOptions,
    ) -> Result<Value, ApiError> {
        let payload = query.map_or(Payload::None, |q| Payload::Query(query_pairs(&q)));
        self.execute(Method::DELETE, path, payload, opts).await
    }

    /// multipart 上传，文件字段名为 `file`
    pub async fn upload(
        &self,
        path: &str,
        file: UploadFile,
        fields: &[(&str, String)],
        opts: RequestOptions,
    ) -> Result<Value, ApiError> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)
            .map_err(|_| ApiError::Validation {
                status: 400,
                message: format!("无效的文件类型: {}", file.mime),
            })?;

        let mut form = Form::new().part("file", part);
        for (name, value) in fields {
            form = form.text(name.to_string(), value.clone());
        }

        self.execute(Method::POST, path, Payload::Multipart(form), opts)
            .await
    }

    pub async fn get_as<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<Value>,
        opts: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.get(path, query, opts).await?;
        self.decode(path, value)
    }

    pub async fn post_as<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.post(path, body, opts).await?;
        self.decode(path, value)
    }

    pub async fn put_as<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.put(path, body, opts).await?;
        self.decode(path, value)
    }

    /// 把载荷解析成具体类型，失败时同样提示用户
    pub fn decode<T: DeserializeOwned>(&self, path: &str, value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value).map_err(|source| {
            let err = ApiError::Decode {
                endpoint: path.to_string(),
                source,
            };
            warn!("❌ 响应解析失败 {}: {}", path, err);
            self.toasts.error(err.user_message());
            err
        })
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        opts: RequestOptions,
    ) -> Result<Value, ApiError> {
        let _loading = opts.resolve(&method).then(|| self.loading.begin());
        let url = format!("{}{}", self.base_url, path);
        debug!("🌐 {} {}", method, url);

        let token = self.session.token();
        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        request = match payload {
            Payload::None => request,
            Payload::Query(pairs) => request.query(&pairs),
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(form) => request.multipart(form),
        };
        if method == Method::GET {
            let stamp = self.session.now().timestamp_millis().to_string();
            request = request.query(&[("_t", stamp)]);
        }

        let result = self.dispatch(request, path).await;

        match &result {
            Ok(_) => {
                if method == Method::GET && token.is_some() {
                    if let Err(e) = self.session.extend() {
                        warn!("延长会话失败: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!("❌ 请求失败 {} {}: {}", method, path, e);
                self.toasts.error(e.user_message());
            }
        }

        result
    }

    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(|e| transport_error(path, e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| transport_error(path, e))?;

        if !status.is_success() {
            let body: Option<Value> = serde_json::from_str(&text).ok();
            return Err(self.status_error(status, path, body.as_ref()));
        }

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|source| ApiError::Decode {
                endpoint: path.to_string(),
                source,
            })?
        };

        match Envelope::decode(body) {
            Envelope::Success(data) => Ok(data),
            Envelope::Failure { code: 401, .. } => {
                self.handle_unauthorized();
                Err(ApiError::Unauthorized {
                    message: UNAUTHORIZED_MESSAGE.to_string(),
                })
            }
            Envelope::Failure { code, message } => Err(ApiError::Business { code, message }),
        }
    }

    fn status_error(&self, status: StatusCode, path: &str, body: Option<&Value>) -> ApiError {
        let server_message = body
            .map(failure_message)
            .filter(|m| m != "操作失败");
        let code = status.as_u16();

        match code {
            400 => ApiError::Validation {
                status: code,
                message: server_message.unwrap_or_else(|| "请求参数错误".to_string()),
            },
            401 => {
                self.handle_unauthorized();
                ApiError::Unauthorized {
                    message: UNAUTHORIZED_MESSAGE.to_string(),
                }
            }
            403 => ApiError::Forbidden {
                message: "没有权限执行此操作".to_string(),
            },
            404 => ApiError::NotFound {
                endpoint: path.to_string(),
            },
            422 => ApiError::Validation {
                status: code,
                message: server_message.unwrap_or_else(|| "数据验证失败".to_string()),
            },
            500..=599 => ApiError::Server {
                status: code,
                message: "服务器内部错误".to_string(),
            },
            _ => ApiError::Http { status: code },
        }
    }

    /// 401：清登录数据并回到登录页
    fn handle_unauthorized(&self) {
        self.session.expire();
        if self.router.redirect_to_login() {
            debug!("↪️ 已跳转到登录页");
        }
    }

    fn to_body<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body).map_err(|source| ApiError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }
}

fn transport_error(path: &str, e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout {
            endpoint: path.to_string(),
        }
    } else {
        ApiError::Network {
            endpoint: path.to_string(),
            message: e.to_string(),
        }
    }
}

/// JSON 对象转查询参数，跳过 null
fn query_pairs(query: &Value) -> Vec<(String, String)> {
    match query {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loading_defaults_by_method() {
        let opts = RequestOptions::default();
        assert!(!opts.resolve(&Method::GET));
        assert!(opts.resolve(&Method::POST));
        assert!(opts.resolve(&Method::DELETE));
        assert!(RequestOptions::with_loading().resolve(&Method::GET));
        assert!(!RequestOptions::quiet().resolve(&Method::PUT));
    }

    #[test]
    fn query_pairs_skip_null_and_stringify() {
        let pairs = query_pairs(&json!({
            "page": 1,
            "keyword": "干员",
            "includeAnalysis": false,
            "type": null
        }));
        assert!(pairs.contains(&("page".to_string(), "1".to_string())));
        assert!(pairs.contains(&("keyword".to_string(), "干员".to_string())));
        assert!(pairs.contains(&("includeAnalysis".to_string(), "false".to_string())));
        assert_eq!(pairs.len(), 3);
    }
}
