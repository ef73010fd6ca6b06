//! 查询参数合并
//!
//! 调用方只设置关心的字段，其余字段使用各接口的默认值。

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// 合并默认参数与调用方参数
///
/// # 参数
/// - `defaults`: 接口默认参数（JSON 对象）
/// - `overrides`: 调用方参数，未设置（序列化后缺失或为 null）的字段不覆盖默认值
///
/// # 返回
/// 合并后的参数对象，默认值里的 null 会被去掉
pub fn merge<T: Serialize>(defaults: Value, overrides: &T) -> Value {
    let mut merged: Map<String, Value> = match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    match serde_json::to_value(overrides) {
        Ok(Value::Object(fields)) => {
            for (key, value) in fields {
                if !value.is_null() {
                    merged.insert(key, value);
                }
            }
        }
        Ok(_) => {}
        Err(e) => warn!("查询参数序列化失败，使用默认参数: {}", e),
    }

    merged.retain(|_, v| !v.is_null());
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionQuery;
    use serde_json::json;

    #[test]
    fn caller_values_win_and_unset_fields_keep_defaults() {
        let query = QuestionQuery {
            size: Some(1000),
            kind: Some(2),
            ..Default::default()
        };
        let merged = merge(
            json!({"page": 1, "size": 20, "keyword": "", "includeAnalysis": false}),
            &query,
        );
        assert_eq!(
            merged,
            json!({"page": 1, "size": 1000, "keyword": "", "includeAnalysis": false, "type": 2})
        );
    }

    #[test]
    fn null_defaults_are_dropped() {
        let merged = merge(json!({"page": 1, "type": null}), &json!({}));
        assert_eq!(merged, json!({"page": 1}));
    }
}
