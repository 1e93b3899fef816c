//! Translation tree builder
//!
//! `translations/<sub>/<dir>/<lang>.json` files are walked depth-first and
//! every leaf lands in the shared store under `sub.dir.<json.path>`.

use serde_json::Value;
use std::path::Path;

use super::loader::{self, LoadReport, JSON_EXTENSIONS};
use crate::application::services::TranslationManager;

pub const TRANSLATIONS_DIR: &str = "translations";

/// Flatten a parsed translation file into `(dotted key, leaf)` pairs.
///
/// `prefix` is either empty or ends with `.`. Objects and arrays recurse one
/// level with the key (or index) appended, `null` contributes nothing and any
/// other value is a leaf.
pub fn flatten(prefix: &str, value: &Value) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    walk(prefix.to_string(), value, &mut out);
    out
}

fn walk(path: String, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                walk(format!("{}{}.", path, key), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(format!("{}{}.", path, index), child, out);
            }
        }
        Value::Null => {}
        leaf => {
            let key = path.strip_suffix('.').unwrap_or(&path).to_string();
            out.push((key, leaf.clone()));
        }
    }
}

/// Key prefix for files found under the given sub-directories
pub fn key_prefix(segments: &[String]) -> String {
    if segments.is_empty() {
        String::new()
    } else {
        format!("{}.", segments.join("."))
    }
}

/// Walk `<module_root>/translations` recursively and feed the store.
///
/// Files load in sorted depth-first order, so a later file overrides an
/// earlier one that produced the same key. A missing directory is a no-op;
/// a file that fails to parse is reported and its siblings are still loaded.
pub async fn build_translations(module_root: &Path, store: &TranslationManager, module: &str) -> LoadReport {
    let base = module_root.join(TRANSLATIONS_DIR);
    let mut report = LoadReport::default();

    for file in loader::walk_files(&base, JSON_EXTENSIONS).await {
        let language = loader::file_label(&file.entry.path);
        let relative = file.relative_name();
        match loader::read_json(&file.entry.path).await {
            Ok(json) => {
                let entries = flatten(&key_prefix(&file.segments), &json);
                tracing::debug!(module, file = %relative, count = entries.len(), "Translations loaded");
                for (key, value) in entries {
                    store.set(key, language.clone(), value);
                }
                report.loaded.push(relative);
            }
            Err(error) => {
                tracing::error!(module, file = %relative, "Error loading {} translations: {}", language, error);
                report.record_failure(relative, error);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_keys() {
        let entries = flatten("", &json!({"errors": {"notFound": "missing"}}));
        assert_eq!(entries, vec![("errors.notFound".to_string(), json!("missing"))]);
    }

    #[test]
    fn test_one_entry_per_leaf() {
        let entries = flatten(
            "",
            &json!({
                "a": {"b": {"c": "deep"}, "d": "shallow"},
                "e": 3,
                "f": false,
                "g": {}
            }),
        );
        let mut keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["a.b.c", "a.d", "e", "f"]);

        let depth = entries.iter().find(|(k, _)| k == "a.b.c").map(|(k, _)| k.split('.').count());
        assert_eq!(depth, Some(3));
    }

    #[test]
    fn test_prefix_applied() {
        let entries = flatten(&key_prefix(&["admin".to_string(), "ban".to_string()]), &json!({"reason": "Spam"}));
        assert_eq!(entries, vec![("admin.ban.reason".to_string(), json!("Spam"))]);
    }

    #[test]
    fn test_arrays_use_index_segments_and_null_is_skipped() {
        let entries = flatten("", &json!({"tips": ["one", "two"], "none": null}));
        assert_eq!(
            entries,
            vec![
                ("tips.0".to_string(), json!("one")),
                ("tips.1".to_string(), json!("two")),
            ]
        );
    }

    #[test]
    fn test_scalar_root_uses_prefix_as_key() {
        let entries = flatten("motd.", &json!("Welcome"));
        assert_eq!(entries, vec![("motd".to_string(), json!("Welcome"))]);
    }

    #[tokio::test]
    async fn test_build_walks_subdirectories() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join(TRANSLATIONS_DIR);
        std::fs::create_dir_all(base.join("admin").join("ban")).unwrap();
        std::fs::write(base.join("en.json"), r#"{"errors":{"notFound":"missing"}}"#).unwrap();
        std::fs::write(base.join("es.json"), r#"{"errors":{"notFound":"no encontrado"}}"#).unwrap();
        std::fs::write(base.join("admin").join("ban").join("en.json"), r#"{"reason":"Spam"}"#).unwrap();
        std::fs::write(base.join("broken.json"), "{ nope").unwrap();
        std::fs::write(base.join("README.md"), "ignored").unwrap();

        let store = TranslationManager::new("en");
        let report = build_translations(root.path(), &store, "core").await;

        assert_eq!(report.loaded.len(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file_name, "broken.json");
        assert_eq!(store.get("errors.notFound", "en").as_deref(), Some("missing"));
        assert_eq!(store.get("errors.notFound", "es").as_deref(), Some("no encontrado"));
        assert_eq!(store.get("admin.ban.reason", "en").as_deref(), Some("Spam"));
    }

    #[tokio::test]
    async fn test_walk_descends_in_sorted_order() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join(TRANSLATIONS_DIR);
        std::fs::create_dir_all(base.join("a").join("b")).unwrap();
        std::fs::create_dir_all(base.join("z")).unwrap();
        std::fs::write(base.join("en.json"), r#"{"root": "r"}"#).unwrap();
        std::fs::write(base.join("a").join("en.json"), r#"{"b": {"x": "from a"}}"#).unwrap();
        std::fs::write(base.join("a").join("b").join("en.json"), r#"{"x": "from a/b"}"#).unwrap();
        std::fs::write(base.join("z").join("en.json"), r#"{"y": "z"}"#).unwrap();

        let store = TranslationManager::new("en");
        let report = build_translations(root.path(), &store, "core").await;

        assert_eq!(report.loaded, vec!["a/b/en.json", "a/en.json", "en.json", "z/en.json"]);
        assert_eq!(store.get("a.b.x", "en").as_deref(), Some("from a"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_noop() {
        let root = tempfile::tempdir().unwrap();
        let store = TranslationManager::new("en");
        let report = build_translations(root.path(), &store, "core").await;

        assert!(report.is_clean());
        assert!(report.loaded.is_empty());
        assert!(store.is_empty());
    }
}
