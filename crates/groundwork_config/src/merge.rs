//! Deep merge for configuration trees.

use serde_yaml::Value;

/// Merge `over` onto `base`, returning the combined value.
///
/// Mappings merge key-wise, recursively. Any other kind of value in `over`
/// (scalar, sequence, null) replaces whatever the base held at that key.
pub fn deep_merge(base: &Value, over: &Value) -> Value {
    match (base, over) {
        (Value::Mapping(base_map), Value::Mapping(over_map)) => {
            let mut merged = base_map.clone();
            for (key, over_value) in over_map {
                let next = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, over_value),
                    None => over_value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Mapping(merged)
        }
        (_, over_value) => over_value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(input: &str) -> Value {
        serde_yaml::from_str(input).unwrap()
    }

    #[test]
    fn test_merge_nested_mappings() {
        let base = yaml("a: {x: 1, y: 2}\nb: keep");
        let over = yaml("a: {y: 3, z: 4}");

        let merged = deep_merge(&base, &over);

        assert_eq!(merged, yaml("a: {x: 1, y: 3, z: 4}\nb: keep"));
    }

    #[test]
    fn test_scalar_replaces_mapping() {
        let base = yaml("a: {x: 1}");
        let over = yaml("a: flat");

        assert_eq!(deep_merge(&base, &over), yaml("a: flat"));
    }

    #[test]
    fn test_sequences_are_replaced_not_concatenated() {
        let base = yaml("apps: [one, two]");
        let over = yaml("apps: [three]");

        assert_eq!(deep_merge(&base, &over), yaml("apps: [three]"));
    }

    #[test]
    fn test_merge_preserves_base_when_override_is_empty() {
        let base = yaml("a: 1\nb: {c: 2}");
        let over = yaml("{}");

        assert_eq!(deep_merge(&base, &over), base);
    }
}
