//! Response models for the dataset API.
//!
//! Only the fields the crate's operations read are modelled; unknown fields
//! in responses are ignored by serde.

use serde::Deserialize;

/// A published dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dataset {
    /// Dataset identifier, e.g. `cpih01`.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Publication state, e.g. `published`.
    #[serde(default)]
    pub state: Option<String>,
    /// Next expected release date, when announced.
    #[serde(default)]
    pub next_release: Option<String>,
}

/// An import instance of a dataset version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instance {
    /// Instance identifier.
    pub id: String,
    /// Import state, e.g. `created`, `completed`.
    #[serde(default)]
    pub state: Option<String>,
    /// Edition this instance belongs to, once known.
    #[serde(default)]
    pub edition: Option<String>,
    /// Version number this instance became, once published.
    #[serde(default)]
    pub version: Option<u32>,
}

/// A published version of a dataset edition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Version {
    /// Version number within the edition.
    pub version: u32,
    /// Edition this version belongs to.
    #[serde(default)]
    pub edition: Option<String>,
    /// Publication state.
    #[serde(default)]
    pub state: Option<String>,
    /// Date this version was released.
    #[serde(default)]
    pub release_date: Option<String>,
}

/// A dimension of a dataset version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dimension {
    /// Dimension name, e.g. `geography`.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
}

/// One option of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DimensionOption {
    /// Option code, e.g. `K02000001`.
    pub option: String,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
    /// Name of the dimension this option belongs to.
    #[serde(default)]
    pub dimension: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_ignores_unknown_fields() {
        let dataset: Dataset = serde_json::from_str(
            r#"{"id":"cpih01","title":"CPIH","links":{"self":{"href":"x"}},"qmi":{}}"#,
        )
        .unwrap();
        assert_eq!(dataset.id, "cpih01");
        assert_eq!(dataset.title, "CPIH");
        assert!(dataset.state.is_none());
    }

    #[test]
    fn test_version_requires_version_number() {
        let result = serde_json::from_str::<Version>(r#"{"edition":"time-series"}"#);
        assert!(result.is_err());
    }
}
