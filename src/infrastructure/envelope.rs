//! 响应信封
//!
//! 后端统一返回 `{code, data, message}`。在 HTTP 边界一次性解码成带标签的结果，
//! 上层不再检查 `code` 字段是否存在。

use serde_json::Value;

/// 默认失败文案
const DEFAULT_FAILURE_MESSAGE: &str = "操作失败";

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// 成功：载荷为 `data`（存在且非 null 时），否则为整个响应体
    Success(Value),
    /// 失败：code 不是 200 / 0
    Failure { code: i64, message: String },
}

impl Envelope {
    pub fn decode(body: Value) -> Self {
        let code = match body.get("code") {
            Some(code) => code_as_i64(code),
            // 没有 code 字段的响应按原样返回
            None => return Envelope::Success(body),
        };

        match code {
            Some(200) | Some(0) => {
                let has_data = body.get("data").map(|d| !d.is_null()).unwrap_or(false);
                if has_data {
                    let mut body = body;
                    Envelope::Success(body["data"].take())
                } else {
                    Envelope::Success(body)
                }
            }
            other => Envelope::Failure {
                code: other.unwrap_or(-1),
                message: failure_message(&body),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }
}

/// 从错误响应体里取提示文案：message → msg → 默认
pub fn failure_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("msg").and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_FAILURE_MESSAGE)
        .to_string()
}

fn code_as_i64(code: &Value) -> Option<i64> {
    match code {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_codes_unwrap_data() {
        for code in [200, 0] {
            let env = Envelope::decode(json!({"code": code, "data": {"id": 7}, "message": "ok"}));
            assert_eq!(env, Envelope::Success(json!({"id": 7})));
        }
    }

    #[test]
    fn success_without_data_returns_whole_body() {
        let body = json!({"code": 200, "message": "注册成功", "userId": 3});
        assert_eq!(Envelope::decode(body.clone()), Envelope::Success(body));
    }

    #[test]
    fn other_codes_fail_with_server_message() {
        let env = Envelope::decode(json!({"code": 500, "message": "题目不存在"}));
        assert_eq!(
            env,
            Envelope::Failure {
                code: 500,
                message: "题目不存在".to_string()
            }
        );

        let env = Envelope::decode(json!({"code": "403", "msg": "无权限"}));
        assert_eq!(
            env,
            Envelope::Failure {
                code: 403,
                message: "无权限".to_string()
            }
        );

        let env = Envelope::decode(json!({"code": 1}));
        assert_eq!(
            env,
            Envelope::Failure {
                code: 1,
                message: "操作失败".to_string()
            }
        );
    }

    #[test]
    fn bodies_without_code_pass_through() {
        let body = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(Envelope::decode(body.clone()), Envelope::Success(body));
    }
}
