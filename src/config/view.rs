//! Read access to the merged settings tree by dotted path

use super::error::{Result, SettingsError};
use super::merge::RawConfig;
use serde::de::{DeserializeOwned, Error as _};
use std::fmt;
use toml::Value;

/// Structured, key-validated view over a merged settings tree.
///
/// Lookups never create keys: asking for a path that is not in the tree is
/// an [`SettingsError::UnknownKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsView {
    root: RawConfig,
}

impl SettingsView {
    pub fn new(root: RawConfig) -> Self {
        Self { root }
    }

    pub fn as_table(&self) -> &RawConfig {
        &self.root
    }

    pub fn into_table(self) -> RawConfig {
        self.root
    }

    /// Top-level keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// Get a value by dotted path (e.g. `logger.log_indent`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.root.get(parts.next()?)?;
        for part in parts {
            current = current.as_table()?.get(part)?;
        }
        Some(current)
    }

    /// Like [`get`](Self::get), but an absent key is an error.
    pub fn require(&self, path: &str) -> Result<&Value> {
        self.get(path).ok_or_else(|| SettingsError::UnknownKey { path: path.to_string() })
    }

    /// Deserialize the value at `path` into `T`.
    pub fn value<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.require(path)?
            .clone()
            .try_into()
            .map_err(|e| SettingsError::WrongType { path: path.to_string(), source: e })
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_integer)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// View of a nested table.
    pub fn section(&self, path: &str) -> Result<SettingsView> {
        match self.require(path)? {
            Value::Table(table) => Ok(SettingsView::new(table.clone())),
            _ => Err(SettingsError::WrongType {
                path: path.to_string(),
                source: toml::de::Error::custom("expected a table"),
            }),
        }
    }

    /// Replace an existing leaf value, returning the previous one.
    ///
    /// Intended for isolating tests from the user's settings. The key must
    /// already exist and must not be a table.
    pub fn override_leaf(&mut self, path: &str, value: impl Into<Value>) -> Result<Value> {
        let unknown = || SettingsError::UnknownKey { path: path.to_string() };

        let (parent, leaf) = match path.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, path),
        };

        let mut table = &mut self.root;
        if let Some(parent) = parent {
            for part in parent.split('.') {
                table = match table.get_mut(part) {
                    Some(Value::Table(inner)) => inner,
                    _ => return Err(unknown()),
                };
            }
        }

        match table.get_mut(leaf) {
            Some(Value::Table(_)) => Err(SettingsError::WrongType {
                path: path.to_string(),
                source: toml::de::Error::custom("cannot replace a table"),
            }),
            Some(slot) => Ok(std::mem::replace(slot, value.into())),
            None => Err(unknown()),
        }
    }

    /// Indented `key=value` rendering, sections as headers.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_table(&self.root, 0, &mut out);
        out
    }
}

fn render_table(table: &RawConfig, indent: usize, out: &mut String) {
    for (key, value) in table {
        let pad = " ".repeat(indent);
        match value {
            Value::Table(inner) => {
                out.push_str(&format!("{pad}{key}\n"));
                render_table(inner, indent + 2, out);
            }
            Value::String(s) => out.push_str(&format!("{pad}{key}={s}\n")),
            other => out.push_str(&format!("{pad}{key}={}\n", inline(other))),
        }
    }
}

fn inline(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(dt) => dt.to_string(),
        Value::Array(items) => {
            format!("[{}]", items.iter().map(inline).collect::<Vec<_>>().join(", "))
        }
        Value::Table(table) => {
            let fields: Vec<String> =
                table.iter().map(|(k, v)| format!("{k} = {}", inline(v))).collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

impl fmt::Display for SettingsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn view(text: &str) -> SettingsView {
        SettingsView::new(toml::from_str(text).expect("valid toml"))
    }

    const SAMPLE: &str = r#"
name = "demo"
[logger]
log_indent = 4
log_level = "INFO"
[tvdb.cache]
enabled = true
ttl_days = [1, 7]
"#;

    #[test]
    fn test_get_by_path() {
        let v = view(SAMPLE);
        assert_eq!(v.get_i64("logger.log_indent"), Some(4));
        assert_eq!(v.get_str("name"), Some("demo"));
        assert_eq!(v.get_bool("tvdb.cache.enabled"), Some(true));
        assert!(v.get("logger.missing").is_none());
        assert!(v.get("name.deeper").is_none());
    }

    #[test]
    fn test_require_unknown_key() {
        let err = view(SAMPLE).require("logger.nope").expect_err("unknown");
        assert!(matches!(err, SettingsError::UnknownKey { ref path } if path == "logger.nope"));
    }

    #[test]
    fn test_typed_value() {
        let v = view(SAMPLE);
        let ttl: Vec<u32> = v.value("tvdb.cache.ttl_days").expect("ttl");
        assert_eq!(ttl, vec![1, 7]);

        let logger: BTreeMap<String, toml::Value> = v.value("logger").expect("logger");
        assert_eq!(logger.len(), 2);

        let err = v.value::<bool>("name").expect_err("wrong type");
        assert!(matches!(err, SettingsError::WrongType { .. }));
    }

    #[test]
    fn test_section() {
        let v = view(SAMPLE);
        let cache = v.section("tvdb.cache").expect("section");
        assert_eq!(cache.get_bool("enabled"), Some(true));
        assert!(v.section("name").is_err());
    }

    #[test]
    fn test_override_leaf() {
        let mut v = view(SAMPLE);
        let previous = v.override_leaf("logger.log_indent", 2i64).expect("override");
        assert_eq!(previous.as_integer(), Some(4));
        assert_eq!(v.get_i64("logger.log_indent"), Some(2));

        assert!(v.override_leaf("logger.unknown", 1i64).is_err());
        assert!(v.override_leaf("nope.log_indent", 1i64).is_err());
        assert!(v.override_leaf("logger", 1i64).is_err());
    }

    #[test]
    fn test_render_tree() {
        insta::assert_snapshot!(view(SAMPLE).render(), @r"
        logger
          log_indent=4
          log_level=INFO
        name=demo
        tvdb
          cache
            enabled=true
            ttl_days=[1, 7]
        ");
    }
}
