//! Settings merge logic
//!
//! - Tables: deep-merge by key
//! - Arrays: REPLACE (overlay wins)
//! - Scalars: override (overlay wins)
//! - Mismatched kinds: overlay replaces entirely

use toml::{Table, Value};

/// Raw parsed settings tree, before or during merging.
pub type RawConfig = Table;

/// Merge `overlay` into `base` in place.
///
/// When a key holds a table on both sides the merge recurses; in every other
/// case the overlay value replaces the base value. Keys only present in
/// `base` are left untouched. Callers that need the original `base` must
/// pass a copy.
pub fn merge(base: &mut RawConfig, overlay: RawConfig) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                merge(base_table, overlay_table);
            }
            (_, overlay_value) => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Merge layers in order (first is base, last has highest precedence).
pub fn merge_layers<I>(layers: I) -> RawConfig
where
    I: IntoIterator<Item = RawConfig>,
{
    layers.into_iter().fold(RawConfig::new(), |mut acc, layer| {
        merge(&mut acc, layer);
        acc
    })
}

/// Copy keys from `defaults` that are missing in `base`, recursing into
/// tables present on both sides. Existing values are never replaced.
///
/// Returns `true` if anything was added.
pub fn fill_missing(base: &mut RawConfig, defaults: &RawConfig) -> bool {
    let mut changed = false;
    for (key, default_value) in defaults {
        match (base.get_mut(key), default_value) {
            (Some(Value::Table(base_table)), Value::Table(default_table)) => {
                changed |= fill_missing(base_table, default_table);
            }
            (Some(_), _) => {}
            (None, default_value) => {
                base.insert(key.clone(), default_value.clone());
                changed = true;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn table(text: &str) -> RawConfig {
        toml::from_str(text).expect("valid toml")
    }

    #[test]
    fn test_disjoint_keys_union() {
        let mut base = table("a = 1\n[x]\ny = true\n");
        merge(&mut base, table("b = 'two'\n[z]\nw = 3\n"));
        assert_eq!(base, table("a = 1\nb = 'two'\n[x]\ny = true\n[z]\nw = 3\n"));
    }

    #[test]
    fn test_scalar_override() {
        let mut base = table("timeout = 100\nname = 'a'\n");
        merge(&mut base, table("timeout = 200\n"));
        assert_eq!(base["timeout"].as_integer(), Some(200));
        assert_eq!(base["name"].as_str(), Some("a"));
    }

    #[test]
    fn test_table_deep_merge() {
        let mut base = table("[logger]\nlog_indent = 4\nlog_max_width = 88\n");
        merge(&mut base, table("[logger]\nlog_indent = 3\n"));
        assert_eq!(base["logger"]["log_indent"].as_integer(), Some(3));
        assert_eq!(base["logger"]["log_max_width"].as_integer(), Some(88));
    }

    #[test]
    fn test_nested_deep_merge() {
        let mut base = table("[level1.level2]\na = 1\nb = 2\n");
        merge(&mut base, table("[level1.level2]\nb = 3\nc = 4\n"));
        assert_eq!(base, table("[level1.level2]\na = 1\nb = 3\nc = 4\n"));
    }

    #[test]
    fn test_scalar_replaces_table_and_back() {
        let mut base = table("[logger]\nlog_indent = 4\n");
        merge(&mut base, table("logger = 'off'\n"));
        assert_eq!(base["logger"].as_str(), Some("off"));

        merge(&mut base, table("[logger]\nlog_indent = 2\n"));
        assert_eq!(base, table("[logger]\nlog_indent = 2\n"));
    }

    #[test]
    fn test_array_replace() {
        let mut base = table("schemes = ['A', 'B', 'C']\n");
        merge(&mut base, table("schemes = ['X']\n"));
        assert_eq!(base, table("schemes = ['X']\n"));
    }

    #[test]
    fn test_empty_overlay_is_noop() {
        let original = table("a = 1\n[b]\nc = 2\n");
        let mut base = original.clone();
        merge(&mut base, RawConfig::new());
        assert_eq!(base, original);
    }

    #[test]
    fn test_merge_with_itself_is_idempotent() {
        let original = table("a = 1\nlist = [1, 2]\n[b]\nc = 'x'\n[b.d]\ne = false\n");
        let mut base = original.clone();
        merge(&mut base, original.clone());
        assert_eq!(base, original);
    }

    #[test]
    fn test_merge_is_order_dependent() {
        let a = table("k = 1\n");
        let b = table("k = 2\n");
        assert_eq!(merge_layers([a.clone(), b.clone()])["k"].as_integer(), Some(2));
        assert_eq!(merge_layers([b, a])["k"].as_integer(), Some(1));
    }

    #[test]
    fn test_fill_missing_is_additive() {
        let mut user = table("top = 'mine'\n[logger]\nlog_indent = 3\n");
        let defaults =
            table("top = 'default'\nextra = 1\n[logger]\nlog_indent = 4\nlog_max_width = 88\n");

        assert!(fill_missing(&mut user, &defaults));
        assert_eq!(
            user,
            table("top = 'mine'\nextra = 1\n[logger]\nlog_indent = 3\nlog_max_width = 88\n")
        );
        assert!(!fill_missing(&mut user, &defaults));
    }

    #[test]
    fn test_fill_missing_keeps_scalar_over_default_table() {
        let mut user = table("logger = 'off'\n");
        let defaults = table("[logger]\nlog_indent = 4\n");
        assert!(!fill_missing(&mut user, &defaults));
        assert_eq!(user["logger"].as_str(), Some("off"));
    }
}
