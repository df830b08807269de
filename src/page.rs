//! Shared list envelope returned by paginated endpoints.

use serde::Deserialize;

/// One page of a paginated remote collection.
///
/// Every list endpoint in the backend services answers with this envelope.
/// `total_count` is the size of the full collection, not of this page; the
/// batch utilities read it from the first page only.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// The items on this page.
    #[serde(default)]
    pub items: Vec<T>,
    /// Number of items on this page.
    #[serde(default)]
    pub count: usize,
    /// Zero-based start index of this page within the collection.
    #[serde(default)]
    pub offset: usize,
    /// Page size that was requested.
    #[serde(default)]
    pub limit: usize,
    /// Size of the full collection at the time of the request.
    #[serde(default)]
    pub total_count: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserializes_envelope() {
        let page: Page<String> = serde_json::from_str(
            r#"{"items":["a","b"],"count":2,"offset":0,"limit":2,"total_count":7}"#,
        )
        .unwrap();
        assert_eq!(page.items, vec!["a", "b"]);
        assert_eq!(page.total_count, 7);
    }

    #[test]
    fn test_page_tolerates_missing_fields() {
        let page: Page<String> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }
}
