use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::DebugError;

/// Administrator-defined grouping, looked up by its `query`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomCategory {
    pub query: String,
    pub name: String,
}

/// Upstream content provider with an API URL template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    pub key: String,
    pub name: String,
    /// URL template carrying `{query}` and `{page}` placeholders
    pub api: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Snapshot of the admin configuration the lookup reads from.
///
/// Field names follow the admin file (`CustomCategories`, `SourceConfig`);
/// any other top-level section of that file is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminConfig {
    #[serde(rename = "CustomCategories", default)]
    pub custom_categories: Vec<CustomCategory>,
    #[serde(rename = "SourceConfig", default)]
    pub source_config: Vec<SourceConfig>,
}

impl AdminConfig {
    /// Parse an admin file. `.toml` files are read as TOML, anything else as JSON.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config: AdminConfig = if is_toml {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        Ok(config)
    }

    /// First category whose `query` matches.
    pub fn find_category(&self, query: &str) -> Option<&CustomCategory> {
        self.custom_categories.iter().find(|c| c.query == query)
    }

    /// First enabled source whose `key` matches. Disabled entries are skipped,
    /// so a disabled match is indistinguishable from a missing one.
    pub fn find_enabled_source(&self, key: &str) -> Option<&SourceConfig> {
        self.source_config
            .iter()
            .find(|s| s.key == key && !s.disabled)
    }
}

/// Category kinds the debug endpoint understands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Custom,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Custom => "custom",
        }
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = DebugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(CategoryKind::Custom),
            other => Err(DebugError::UnsupportedType(other.to_string())),
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_PAGE: i64 = 1;

/// Extracted input of one debug lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugRequest {
    pub query: String,
    pub kind: String,
    pub page: i64,
}

impl DebugRequest {
    /// Build a request from raw `q`/`type`/`pg` values as they arrive on the wire.
    /// A missing `type` means `custom`; a missing or non-numeric `pg` means page 1.
    pub fn from_raw(q: Option<&str>, kind: Option<&str>, pg: Option<&str>) -> Self {
        Self {
            query: q.unwrap_or_default().to_string(),
            kind: kind
                .filter(|k| !k.is_empty())
                .unwrap_or(CategoryKind::Custom.as_str())
                .to_string(),
            page: parse_page(pg),
        }
    }

    /// Presence and kind checks. Needs no configuration or network.
    pub fn validate(&self) -> Result<CategoryKind, DebugError> {
        if self.query.is_empty() {
            return Err(DebugError::MissingParameter);
        }
        self.kind.parse()
    }
}

/// Lenient page parsing: blank or unparsable input falls back to page 1.
///
/// Pages are whole numbers. Fractional input such as `2.5` is unparsable and
/// also becomes page 1, so it is never rendered into a URL as-is.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(DEFAULT_PAGE)
}

/// Success body returned to the operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DebugEnvelope {
    pub success: bool,
    pub source: String,
    pub category: String,
    pub page: i64,
    pub api_url: String,
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn source(key: &str, disabled: bool) -> SourceConfig {
        SourceConfig {
            key: key.to_string(),
            name: format!("{key}-name"),
            api: "https://x.test/api?kw={query}&p={page}".to_string(),
            detail: None,
            disabled,
        }
    }

    #[test]
    fn admin_config_reads_pascal_case_sections() {
        let raw = json!({
            "ConfigSubscribtion": { "URL": "", "AutoUpdate": false },
            "CustomCategories": [{ "query": "91md", "name": "Example" }],
            "SourceConfig": [{ "key": "91md", "name": "ExampleSource", "api": "https://x.test/{query}" }]
        });
        let cfg: AdminConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(cfg.custom_categories.len(), 1);
        assert_eq!(cfg.source_config[0].key, "91md");
        assert!(!cfg.source_config[0].disabled);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let cfg: AdminConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.custom_categories.is_empty());
        assert!(cfg.source_config.is_empty());
    }

    #[test]
    fn first_category_match_wins() {
        let cfg = AdminConfig {
            custom_categories: vec![
                CustomCategory { query: "a".into(), name: "first".into() },
                CustomCategory { query: "a".into(), name: "second".into() },
            ],
            source_config: vec![],
        };
        assert_eq!(cfg.find_category("a").unwrap().name, "first");
        assert!(cfg.find_category("b").is_none());
    }

    #[test]
    fn disabled_sources_are_skipped() {
        let cfg = AdminConfig {
            custom_categories: vec![],
            source_config: vec![source("a", true), source("a", false)],
        };
        let found = cfg.find_enabled_source("a").unwrap();
        assert!(!found.disabled);

        let only_disabled = AdminConfig {
            custom_categories: vec![],
            source_config: vec![source("a", true)],
        };
        assert!(only_disabled.find_enabled_source("a").is_none());
    }

    #[test]
    fn category_kind_is_closed() {
        assert_eq!("custom".parse::<CategoryKind>().unwrap(), CategoryKind::Custom);
        assert!(matches!(
            "builtin".parse::<CategoryKind>(),
            Err(DebugError::UnsupportedType(k)) if k == "builtin"
        ));
        assert!("Custom".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn page_parsing_falls_back_to_one() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some("-2")), -2);
        assert_eq!(parse_page(Some("2.5")), 1);
    }

    #[test]
    fn validate_checks_query_then_kind() {
        let empty = DebugRequest::from_raw(None, Some("builtin"), None);
        assert!(matches!(empty.validate(), Err(DebugError::MissingParameter)));

        let wrong = DebugRequest::from_raw(Some("91md"), Some("builtin"), None);
        assert!(matches!(wrong.validate(), Err(DebugError::UnsupportedType(_))));

        let ok = DebugRequest::from_raw(Some("91md"), None, Some("2"));
        assert_eq!(ok.validate().unwrap(), CategoryKind::Custom);
    }

    #[test]
    fn raw_request_defaults_type_to_custom() {
        let req = DebugRequest::from_raw(Some("91md"), None, None);
        assert_eq!(req.kind, "custom");
        assert_eq!(req.page, 1);
        assert_eq!(req.query, "91md");
    }

    #[test]
    fn envelope_uses_camel_case_api_url() {
        let env = DebugEnvelope {
            success: true,
            source: "s".into(),
            category: "c".into(),
            page: 2,
            api_url: "https://x.test".into(),
            data: json!({ "list": [] }),
        };
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["apiUrl"], "https://x.test");
        assert!(v.get("api_url").is_none());
    }
}
