//! Engine configuration

use metaquery_criteria::Defaults;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Page size when a request pages without naming one
    pub default_page_size: usize,
    /// Upper bound on any requested page size
    pub max_page_size: usize,
    /// Defaults mode when a request does not name one
    pub defaults: Defaults,
    /// Order by name, then id, when a request gives no order
    pub default_order: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 10_000,
            defaults: Defaults::Exclude,
            default_order: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Requested page size, or the default, clamped to `1..=max_page_size`
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"defaultPageSize": 20, "defaults": "INCLUDE"}"#).unwrap();
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.max_page_size, 10_000);
        assert_eq!(config.defaults, Defaults::Include);
        assert!(config.default_order);
    }

    #[test]
    fn test_page_size_clamped() {
        let config = EngineConfig::default();
        assert_eq!(config.page_size(None), 50);
        assert_eq!(config.page_size(Some(0)), 1);
        assert_eq!(config.page_size(Some(50_000)), 10_000);
    }

    #[test]
    fn test_invalid_json() {
        assert!(EngineConfig::from_json("{\"maxPageSize\": \"many\"}").is_err());
    }
}
