//! 列表视图渲染
//!
//! 查询行到响应视图模型的纯函数。空集不直接下发空数组，而是携带
//! 固定占位文案，客户端按占位行渲染。幂等、无状态。

use serde::Serialize;

/// 空列表占位文案
pub const EMPTY_PLACEHOLDER: &str = "No records found.";

/// 列表响应：行集合加空集占位标记
#[derive(Debug, Clone, Serialize)]
pub struct ListView<T> {
    pub rows: Vec<T>,
    /// 空集时为固定占位文案，否则省略
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

/// Wrap query rows into a list view, substituting the placeholder when empty
pub fn list_view<T: Serialize>(rows: Vec<T>) -> ListView<T> {
    let placeholder = if rows.is_empty() {
        Some(EMPTY_PLACEHOLDER)
    } else {
        None
    };
    ListView { rows, placeholder }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_get_placeholder() {
        let view = list_view::<String>(vec![]);
        assert!(view.rows.is_empty());
        assert_eq!(view.placeholder, Some(EMPTY_PLACEHOLDER));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["placeholder"], "No records found.");
    }

    #[test]
    fn non_empty_rows_have_no_placeholder() {
        let view = list_view(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(view.rows.len(), 2);
        assert!(view.placeholder.is_none());

        // placeholder key is omitted entirely from the payload
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("placeholder").is_none());
    }

    #[test]
    fn rendering_is_idempotent() {
        let first = list_view::<i64>(vec![]);
        let second = list_view::<i64>(vec![]);
        assert_eq!(first.placeholder, second.placeholder);
        assert_eq!(first.rows, second.rows);
    }
}
