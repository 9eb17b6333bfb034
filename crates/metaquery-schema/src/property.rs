//! Property descriptors

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{Object, Value, ValueType};

/// Accessor reading one property from a live object
pub type Getter = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Value + Send + Sync>;

/// Describes one property of a schema-described type
#[derive(Clone)]
pub struct Property {
    name: String,
    value_type: ValueType,
    persisted: bool,
    getter: Option<Getter>,
}

impl Property {
    /// A persisted property without an accessor
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            persisted: true,
            getter: None,
        }
    }

    /// Mark the property as computed/transient: the store cannot filter or sort on it
    pub fn transient(mut self) -> Self {
        self.persisted = false;
        self
    }

    /// Attach a typed accessor
    ///
    /// Objects that are not a `T` read as [`Value::Null`].
    pub fn with_getter<T, F>(mut self, getter: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(move |object: &(dyn Any + Send + Sync)| {
            object.downcast_ref::<T>().map(&getter).unwrap_or(Value::Null)
        }));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn is_simple(&self) -> bool {
        self.value_type.is_simple()
    }

    pub fn is_collection(&self) -> bool {
        self.value_type.is_collection()
    }

    pub fn item_type(&self) -> Option<&ValueType> {
        self.value_type.item_type()
    }

    pub fn referenced_type(&self) -> Option<&str> {
        self.value_type.referenced_type()
    }

    /// Read this property from an object
    pub fn read(&self, object: &Object) -> Value {
        match &self.getter {
            Some(getter) => getter(&**object),
            None => Value::Null,
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("persisted", &self.persisted)
            .field("has_getter", &self.getter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unit {
        name: String,
    }

    #[test]
    fn test_getter_reads_typed_object() {
        let prop = Property::new("name", ValueType::String).with_getter(|u: &Unit| Value::from(&u.name));
        let object: Object = Arc::new(Unit { name: "Clinic".into() });
        assert_eq!(prop.read(&object), Value::from("Clinic"));
    }

    #[test]
    fn test_getter_on_foreign_object_is_null() {
        let prop = Property::new("name", ValueType::String).with_getter(|u: &Unit| Value::from(&u.name));
        let object: Object = Arc::new(42u32);
        assert!(prop.read(&object).is_null());
    }

    #[test]
    fn test_transient_flag() {
        let prop = Property::new("displayName", ValueType::String).transient();
        assert!(!prop.is_persisted());
        assert!(prop.is_simple());
    }
}
