//! Dotted property paths
//!
//! A path such as `parent.parent.id` is resolved against a root schema by
//! walking one schema per segment. Every segment but the last must lead to
//! another schema-described type (a reference, or a collection of references);
//! simple properties may only terminate a path.
//!
//! Reading a path from a live object follows the same chain through the
//! property accessors. When a non-terminal segment is a collection, the rest of
//! the path is read from every element and the result fans out into
//! [`PathValue::Many`].

use std::sync::Arc;

use crate::{Object, Property, Schema, SchemaError, SchemaProvider, Value};

/// A resolved chain of properties
#[derive(Debug, Clone)]
pub struct PropertyPath {
    path: String,
    properties: Vec<Arc<Property>>,
}

/// Result of reading a path from one object
#[derive(Debug, Clone, PartialEq)]
pub enum PathValue {
    /// No collection was traversed on the way to the terminal property
    Single(Value),
    /// A collection segment was traversed; one value per reached element
    Many(Vec<Value>),
}

impl PropertyPath {
    /// Resolve `path` starting from `schema`
    pub fn resolve(
        provider: &dyn SchemaProvider,
        schema: &Schema,
        path: &str,
    ) -> Result<Self, SchemaError> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut properties = Vec::with_capacity(segments.len());
        let mut current: Option<Arc<Schema>> = None;

        for (i, segment) in segments.iter().enumerate() {
            let schema_ref: &Schema = current.as_deref().unwrap_or(schema);
            let property = Arc::clone(schema_ref.require_property(segment)?);
            let is_last = i + 1 == segments.len();

            if !is_last {
                if property.is_simple() {
                    return Err(SchemaError::SimpleSegment {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    });
                }
                let Some(next) = property.referenced_type() else {
                    let item_type = property
                        .item_type()
                        .map(|t| t.to_string())
                        .unwrap_or_default();
                    return Err(SchemaError::NotTraversable {
                        path: path.to_string(),
                        segment: segment.to_string(),
                        item_type,
                    });
                };
                current = Some(provider.require_schema(next)?);
            }

            properties.push(property);
        }

        Ok(Self {
            path: path.to_string(),
            properties,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn properties(&self) -> &[Arc<Property>] {
        &self.properties
    }

    pub fn terminal(&self) -> &Arc<Property> {
        // resolve() never yields an empty chain: split always returns one segment
        &self.properties[self.properties.len() - 1]
    }

    pub fn is_nested(&self) -> bool {
        self.properties.len() > 1
    }

    /// Every property on the path is backed by the store
    pub fn is_persisted(&self) -> bool {
        self.properties.iter().all(|p| p.is_persisted())
    }

    /// Whether any non-terminal segment is a collection
    pub fn traverses_collection(&self) -> bool {
        let n = self.properties.len();
        self.properties[..n - 1].iter().any(|p| p.is_collection())
    }

    /// Dotted prefixes of the non-terminal segments: `a.b.c` yields `a`, `a.b`
    pub fn prefixes(&self) -> Vec<String> {
        let mut prefixes = Vec::new();
        let mut prefix = String::new();
        for property in &self.properties[..self.properties.len() - 1] {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(property.name());
            prefixes.push(prefix.clone());
        }
        prefixes
    }

    /// Read the path from a live object
    pub fn read(&self, object: &Object) -> PathValue {
        let last = self.properties.len() - 1;
        let mut current = vec![Value::Object(Arc::clone(object))];
        let mut fanned_out = false;

        for (i, property) in self.properties.iter().enumerate() {
            let mut next = Vec::with_capacity(current.len());
            for value in current {
                let Value::Object(obj) = value else {
                    next.push(Value::Null);
                    continue;
                };
                match property.read(&obj) {
                    Value::Collection(items) if i < last => {
                        fanned_out = true;
                        next.extend(items);
                    }
                    other => next.push(other),
                }
            }
            current = next;
        }

        if fanned_out {
            PathValue::Many(current)
        } else {
            PathValue::Single(current.pop().unwrap_or(Value::Null))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SchemaRegistry, ValueType};

    struct Unit {
        id: String,
        level: i64,
        parent: Option<Arc<Unit>>,
        children: Vec<Arc<Unit>>,
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register(
            Schema::new("Unit")
                .with_property(Property::new("id", ValueType::String).with_getter(|u: &Unit| Value::from(&u.id)))
                .with_property(Property::new("level", ValueType::Integer).with_getter(|u: &Unit| Value::from(u.level)))
                .with_property(
                    Property::new("parent", ValueType::reference("Unit"))
                        .with_getter(|u: &Unit| u.parent.clone().map(Value::object).unwrap_or(Value::Null)),
                )
                .with_property(
                    Property::new("children", ValueType::collection_of(ValueType::reference("Unit")))
                        .with_getter(|u: &Unit| {
                            Value::Collection(u.children.iter().cloned().map(Value::object).collect())
                        }),
                )
                .with_property(Property::new("tags", ValueType::collection_of(ValueType::String)))
                .with_property(Property::new("displayName", ValueType::String).transient()),
        );
        registry
    }

    fn unit(id: &str, level: i64, parent: Option<Arc<Unit>>, children: Vec<Arc<Unit>>) -> Arc<Unit> {
        Arc::new(Unit {
            id: id.into(),
            level,
            parent,
            children,
        })
    }

    #[test]
    fn test_resolve_nested_path() {
        let registry = registry();
        let schema = registry.require_schema("Unit").unwrap();
        let path = PropertyPath::resolve(&registry, &schema, "parent.parent.id").unwrap();
        assert_eq!(path.terminal().name(), "id");
        assert!(path.is_nested());
        assert_eq!(path.prefixes(), vec!["parent".to_string(), "parent.parent".to_string()]);
    }

    #[test]
    fn test_simple_segment_must_be_last() {
        let registry = registry();
        let schema = registry.require_schema("Unit").unwrap();
        let err = PropertyPath::resolve(&registry, &schema, "level.id").unwrap_err();
        assert!(matches!(err, SchemaError::SimpleSegment { ref segment, .. } if segment == "level"));
    }

    #[test]
    fn test_scalar_collection_not_traversable() {
        let registry = registry();
        let schema = registry.require_schema("Unit").unwrap();
        let err = PropertyPath::resolve(&registry, &schema, "tags.id").unwrap_err();
        assert!(matches!(err, SchemaError::NotTraversable { .. }));
    }

    #[test]
    fn test_unknown_segment() {
        let registry = registry();
        let schema = registry.require_schema("Unit").unwrap();
        let err = PropertyPath::resolve(&registry, &schema, "parent.missing").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownProperty { ref property, .. } if property == "missing"));
    }

    #[test]
    fn test_persistence_covers_whole_path() {
        let registry = registry();
        let schema = registry.require_schema("Unit").unwrap();
        assert!(PropertyPath::resolve(&registry, &schema, "parent.id").unwrap().is_persisted());
        assert!(!PropertyPath::resolve(&registry, &schema, "parent.displayName").unwrap().is_persisted());
    }

    #[test]
    fn test_read_through_references() {
        let registry = registry();
        let schema = registry.require_schema("Unit").unwrap();
        let root = unit("root", 1, None, vec![]);
        let child = unit("child", 2, Some(root), vec![]);
        let object: Object = child;

        let path = PropertyPath::resolve(&registry, &schema, "parent.id").unwrap();
        assert_eq!(path.read(&object), PathValue::Single(Value::from("root")));

        let path = PropertyPath::resolve(&registry, &schema, "parent.parent.id").unwrap();
        assert_eq!(path.read(&object), PathValue::Single(Value::Null));
    }

    #[test]
    fn test_read_fans_out_over_collection() {
        let registry = registry();
        let schema = registry.require_schema("Unit").unwrap();
        let a = unit("a", 2, None, vec![]);
        let b = unit("b", 5, None, vec![]);
        let root: Object = unit("root", 1, None, vec![a, b]);

        let path = PropertyPath::resolve(&registry, &schema, "children.level").unwrap();
        assert!(path.traverses_collection());
        assert_eq!(path.read(&root), PathValue::Many(vec![Value::Integer(2), Value::Integer(5)]));
    }

    #[test]
    fn test_terminal_collection_stays_whole() {
        let registry = registry();
        let schema = registry.require_schema("Unit").unwrap();
        let root: Object = unit("root", 1, None, vec![unit("a", 2, None, vec![])]);

        let path = PropertyPath::resolve(&registry, &schema, "children").unwrap();
        match path.read(&root) {
            PathValue::Single(Value::Collection(items)) => assert_eq!(items.len(), 1),
            other => panic!("expected a single collection, got {:?}", other),
        }
    }
}
