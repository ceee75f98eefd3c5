use crate::error::ConfigError;
use crate::index::IndexOptions;
use serde::Deserialize;
use std::time::Duration;

pub const SEARCH_RESULT_LIMIT: usize = 3;
pub const DEFAULT_INDEX_PATH: &str = "/api/search.json";

/// Tunables for one search widget instance. Every field has a default, so an
/// empty JSON object deserializes to the stock configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub result_limit: usize,
    pub debounce_ms: u64,
    /// Characters of context kept before the first content match.
    pub excerpt_before: usize,
    /// Characters of context kept after the first content match.
    pub excerpt_after: usize,
    pub index_path: String,
    pub index: IndexOptions,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            result_limit: SEARCH_RESULT_LIMIT,
            debounce_ms: 150,
            excerpt_before: 40,
            excerpt_after: 120,
            index_path: DEFAULT_INDEX_PATH.to_string(),
            index: IndexOptions::default(),
        }
    }
}

impl WidgetConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.result_limit == 0 || self.result_limit > 100 {
            return Err(ConfigError::ResultLimit(self.result_limit));
        }
        if !self.index_path.starts_with('/') {
            return Err(ConfigError::IndexPath(self.index_path.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg: WidgetConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, WidgetConfig::default());
        assert_eq!(cfg.result_limit, 3);
        assert_eq!(cfg.debounce(), Duration::from_millis(150));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_object_overrides_named_fields() {
        let cfg: WidgetConfig = serde_json::from_str(r#"{"result_limit": 5, "index": {"title_boost": 2.0}}"#).unwrap();
        assert_eq!(cfg.result_limit, 5);
        assert_eq!(cfg.index.title_boost, 2.0);
        assert!(cfg.index.smoothed_idf);
    }

    #[test]
    fn rejects_out_of_range_limits_and_relative_paths() {
        let cfg = WidgetConfig { result_limit: 0, ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ResultLimit(0)));

        let cfg = WidgetConfig { result_limit: 200, ..Default::default() };
        assert!(cfg.validate().is_err());

        let cfg = WidgetConfig { index_path: "api/search.json".into(), ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::IndexPath("api/search.json".into())));
    }
}
