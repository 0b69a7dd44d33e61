use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;

/// One page of rows plus the server's paging metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    pub total_pages: usize,
    /// Current page as echoed by the server (0-based).
    #[serde(default)]
    pub number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl<T> PageEnvelope<T> {
    /// Builds the envelope a server would return for page `number` of `rows`.
    pub fn from_full(rows: Vec<T>, number: usize, size: usize) -> Self
    where
        T: Clone,
    {
        let total_elements = rows.len() as u64;
        let total_pages = if size == 0 { 0 } else { rows.len().div_ceil(size) };
        let start = number.saturating_mul(size).min(rows.len());
        let end = (start + size).min(rows.len());

        Self {
            content: rows[start..end].to_vec(),
            total_elements,
            total_pages,
            number,
            size: Some(size),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl<T: DeserializeOwned> PageEnvelope<T> {
    /// Decodes a response body, reporting a missing `content` or
    /// `totalPages` as a malformed envelope rather than a generic JSON error.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConsoleError> {
        let object = value
            .as_object()
            .ok_or_else(|| ConsoleError::MalformedEnvelope("body is not an object".to_string()))?;

        for field in ["content", "totalPages"] {
            if !object.contains_key(field) {
                return Err(ConsoleError::MalformedEnvelope(format!(
                    "missing `{}`",
                    field
                )));
            }
        }

        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_spring_style_page() {
        let body = json!({
            "content": ["a", "b"],
            "totalElements": 12,
            "totalPages": 6,
            "number": 3,
            "size": 2,
            "first": false,
            "last": false
        });
        let env: PageEnvelope<String> = PageEnvelope::from_value(body).unwrap();
        assert_eq!(env.content, vec!["a", "b"]);
        assert_eq!(env.total_elements, 12);
        assert_eq!(env.total_pages, 6);
        assert_eq!(env.number, 3);
    }

    #[test]
    fn test_missing_content_is_malformed() {
        let body = json!({ "totalPages": 1, "number": 0 });
        let err = PageEnvelope::<String>::from_value(body).unwrap_err();
        assert!(matches!(err, ConsoleError::MalformedEnvelope(msg) if msg.contains("content")));
    }

    #[test]
    fn test_missing_total_pages_is_malformed() {
        let body = json!({ "content": [] });
        let err = PageEnvelope::<String>::from_value(body).unwrap_err();
        assert!(matches!(err, ConsoleError::MalformedEnvelope(msg) if msg.contains("totalPages")));
    }

    #[test]
    fn test_non_object_body() {
        let err = PageEnvelope::<String>::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ConsoleError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_wrong_row_type_is_json_error() {
        let body = json!({ "content": [1, 2], "totalPages": 1 });
        let err = PageEnvelope::<String>::from_value(body).unwrap_err();
        assert!(matches!(err, ConsoleError::Json(_)));
    }

    #[test]
    fn test_from_full_last_page() {
        let rows: Vec<u32> = (0..23).collect();
        let env = PageEnvelope::from_full(rows, 4, 5);
        assert_eq!(env.total_pages, 5);
        assert_eq!(env.total_elements, 23);
        assert_eq!(env.content, vec![20, 21, 22]);
    }

    #[test]
    fn test_from_full_out_of_range_page() {
        let env = PageEnvelope::from_full(vec![1, 2, 3], 9, 10);
        assert!(env.is_empty());
        assert_eq!(env.total_pages, 1);
    }
}
