use colored_json::ToColoredJson;
use serde_json::{Value, json};

use crate::models::{AdminConfig, DebugEnvelope};

pub fn print_pretty_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => match s.to_colored_json_auto() {
            Ok(cs) => println!("{}", cs),
            Err(_) => println!("{}", s),
        },
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}

pub fn print_envelope(envelope: &DebugEnvelope) {
    match serde_json::to_value(envelope) {
        Ok(v) => print_pretty_json(&v),
        Err(e) => eprintln!("failed to serialize envelope: {}", e),
    }
}

/// One row per category, paired with the enabled source sharing its key.
pub fn category_overview(admin: &AdminConfig) -> Value {
    let rows: Vec<Value> = admin
        .custom_categories
        .iter()
        .map(|c| {
            let source = admin.find_enabled_source(&c.query);
            json!({
                "query": c.query,
                "name": c.name,
                "source": source.map(|s| s.name.as_str()),
                "api": source.map(|s| s.api.as_str()),
            })
        })
        .collect();
    json!({ "categories": rows, "count": rows.len() })
}

pub fn print_category_table(admin: &AdminConfig) {
    if admin.custom_categories.is_empty() {
        println!("No custom categories.");
        return;
    }
    for c in &admin.custom_categories {
        match admin.find_enabled_source(&c.query) {
            Some(s) => println!("  - {} [{}] -> {} ({})", c.name, c.query, s.name, s.api),
            None => println!("  - {} [{}] -> no enabled source", c.name, c.query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomCategory, SourceConfig};

    #[test]
    fn overview_pairs_categories_with_enabled_sources() {
        let admin = AdminConfig {
            custom_categories: vec![
                CustomCategory {
                    query: "a".into(),
                    name: "A".into(),
                },
                CustomCategory {
                    query: "b".into(),
                    name: "B".into(),
                },
            ],
            source_config: vec![
                SourceConfig {
                    key: "a".into(),
                    name: "SourceA".into(),
                    api: "https://a/{query}/{page}".into(),
                    detail: None,
                    disabled: false,
                },
                SourceConfig {
                    key: "b".into(),
                    name: "SourceB".into(),
                    api: "https://b/{query}/{page}".into(),
                    detail: None,
                    disabled: true,
                },
            ],
        };
        let v = category_overview(&admin);
        assert_eq!(v["count"], 2);
        assert_eq!(v["categories"][0]["source"], "SourceA");
        assert!(v["categories"][1]["source"].is_null());
    }
}
