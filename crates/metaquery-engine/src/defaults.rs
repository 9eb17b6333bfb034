//! Post-processing filter for placeholder "default" objects

use metaquery_criteria::Defaults;
use metaquery_schema::{Object, Schema};

/// Name carried by placeholder objects
pub const DEFAULT_NAME: &str = "default";

/// Drop objects named `"default"` unless `defaults` is [`Defaults::Include`]
///
/// Types without a `name` property are returned untouched.
pub fn apply_defaults(schema: &Schema, defaults: Defaults, objects: Vec<Object>) -> Vec<Object> {
    if defaults == Defaults::Include {
        return objects;
    }
    let Some(name) = schema.property("name") else {
        return objects;
    };
    objects
        .into_iter()
        .filter(|object| name.read(object).as_str() != Some(DEFAULT_NAME))
        .collect()
}

/// Whether the filter could remove anything for this schema
pub fn filters_defaults(schema: &Schema, defaults: Defaults) -> bool {
    defaults == Defaults::Exclude && schema.has_property("name")
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaquery_schema::{Property, Value, ValueType};
    use std::sync::Arc;

    struct Category {
        name: &'static str,
    }

    fn schema() -> Schema {
        Schema::new("CategoryCombo")
            .with_property(Property::new("name", ValueType::String).with_getter(|c: &Category| Value::from(c.name)))
    }

    fn objects() -> Vec<Object> {
        ["default", "Sex", "Age"]
            .into_iter()
            .map(|name| Arc::new(Category { name }) as Object)
            .collect()
    }

    #[test]
    fn test_exclude_drops_default() {
        let kept = apply_defaults(&schema(), Defaults::Exclude, objects());
        assert_eq!(kept.len(), 2);
        assert!(kept
            .iter()
            .all(|o| o.downcast_ref::<Category>().map(|c| c.name) != Some("default")));
    }

    #[test]
    fn test_include_keeps_default() {
        assert_eq!(apply_defaults(&schema(), Defaults::Include, objects()).len(), 3);
    }

    #[test]
    fn test_schema_without_name_is_untouched() {
        let schema = Schema::new("Unnamed");
        assert_eq!(apply_defaults(&schema, Defaults::Exclude, objects()).len(), 3);
        assert!(!filters_defaults(&schema, Defaults::Exclude));
        assert!(filters_defaults(&self::schema(), Defaults::Exclude));
    }
}
