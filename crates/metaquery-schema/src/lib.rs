//! metaquery-schema: the metadata surface the query engine consumes
//!
//! The engine never reflects over domain types. Instead every queryable type is
//! described by a [`Schema`]: a set of [`Property`] descriptors, each carrying a
//! declared [`ValueType`], a persisted flag and an accessor closure that reads the
//! property from a live object.
//!
//! - `Value`: dynamically typed values read from objects or parsed from filters
//! - `Schema` / `SchemaProvider`: per-type property metadata
//! - `PropertyPath`: dotted path resolution (`parent.parent.id`) and value reads

mod date;
mod error;
mod path;
mod property;
mod schema;
mod types;
mod value;

pub use date::Timestamp;
pub use error::SchemaError;
pub use path::{PathValue, PropertyPath};
pub use property::{Getter, Property};
pub use schema::{Schema, SchemaProvider, SchemaRegistry};
pub use types::{EnumType, ValueType};
pub use value::{Object, Value};
