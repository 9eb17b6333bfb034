//! Schemas and schema providers

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::{Object, Property, SchemaError, Value};

/// Property metadata for one type
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    properties: BTreeMap<String, Arc<Property>>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property registration
    pub fn with_property(mut self, property: Property) -> Self {
        self.add_property(property);
        self
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties
            .insert(property.name().to_string(), Arc::new(property));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property(&self, name: &str) -> Option<&Arc<Property>> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &Arc<Property>> {
        self.properties.values()
    }

    /// Look up a property or fail with [`SchemaError::UnknownProperty`]
    pub fn require_property(&self, name: &str) -> Result<&Arc<Property>, SchemaError> {
        self.property(name).ok_or_else(|| SchemaError::UnknownProperty {
            type_name: self.name.clone(),
            property: name.to_string(),
        })
    }

    /// Read a top-level property, `Null` if the schema has no such property
    pub fn read(&self, object: &Object, name: &str) -> Value {
        self.property(name)
            .map(|p| p.read(object))
            .unwrap_or(Value::Null)
    }
}

/// Supplies one schema per queryable type
pub trait SchemaProvider: Send + Sync {
    fn schema(&self, type_name: &str) -> Option<Arc<Schema>>;

    fn require_schema(&self, type_name: &str) -> Result<Arc<Schema>, SchemaError> {
        self.schema(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
    }
}

/// In-process schema provider
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, replacing any previous schema of the same name
    pub fn register(&mut self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        self.schemas
            .insert(schema.name().to_string(), Arc::clone(&schema));
        schema
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaProvider for SchemaRegistry {
    fn schema(&self, type_name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(type_name).cloned()
    }
}
