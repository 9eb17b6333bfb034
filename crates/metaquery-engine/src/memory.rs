//! In-memory query evaluation over preloaded objects
//!
//! Each candidate is tested against the criterion tree: a bare restriction is
//! a one-element conjunction, junctions combine their children, and the
//! top-level results combine under the query's root junction type.
//!
//! Path values are read through property accessors. A path that crosses a
//! collection yields many values, and a restriction holds if it holds for any
//! of them. Operators that inspect a collection as a whole (`null`, `empty`
//! and their negations) see the terminal collection itself.

use std::collections::HashMap;
use std::sync::Arc;

use metaquery_criteria::{Criterion, JunctionType, Operator, Query, Restriction};
use metaquery_schema::{Object, PathValue, PropertyPath, SchemaProvider, Value};
use tracing::debug;

use crate::error::{QueryError, Result};
use crate::sort::sort_objects;

pub struct InMemoryQueryEngine {
    provider: Arc<dyn SchemaProvider>,
}

impl InMemoryQueryEngine {
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self { provider }
    }

    /// Filter, sort and page the query's preloaded objects
    pub fn query(&self, query: &Query) -> Result<Vec<Object>> {
        let matched = self.filter(query)?;
        let sorted = sort_objects(matched, query.orders());
        Ok(query.pagination().apply(sorted))
    }

    /// Number of matching objects; pagination is ignored
    pub fn count(&self, query: &Query) -> Result<usize> {
        Ok(self.filter(query)?.len())
    }

    fn filter(&self, query: &Query) -> Result<Vec<Object>> {
        let schema = query.schema();
        let objects = query
            .objects()
            .ok_or_else(|| QueryError::MissingObjects(schema.name().to_string()))?;

        let mut paths: HashMap<&str, PropertyPath> = HashMap::new();
        for criterion in query.criteria() {
            for restriction in criterion.restrictions() {
                if !paths.contains_key(restriction.path()) {
                    let path = PropertyPath::resolve(self.provider.as_ref(), schema, restriction.path())?;
                    paths.insert(restriction.path(), path);
                }
            }
        }

        let matched: Vec<Object> = objects
            .iter()
            .filter(|object| matches(query, object, &paths))
            .cloned()
            .collect();

        debug!(
            type_name = schema.name(),
            candidates = objects.len(),
            matched = matched.len(),
            "in-memory filter"
        );
        Ok(matched)
    }
}

fn matches(query: &Query, object: &Object, paths: &HashMap<&str, PropertyPath>) -> bool {
    let mut leaf = |restriction: &Restriction| {
        paths
            .get(restriction.path())
            .map(|path| test_restriction(restriction, path, object))
            .unwrap_or(false)
    };
    if query.criteria().is_empty() {
        return true;
    }
    let mut criteria = query.criteria().iter();
    match query.root_junction() {
        JunctionType::And => criteria.all(|c| c.evaluate(&mut leaf)),
        JunctionType::Or => criteria.any(|c| c.evaluate(&mut leaf)),
    }
}

/// Test one restriction against one object
pub fn test_restriction(restriction: &Restriction, path: &PropertyPath, object: &Object) -> bool {
    let operator = restriction.operator();
    match path.read(object) {
        PathValue::Single(value) => test_value(operator, &value),
        PathValue::Many(values) => values.iter().any(|value| test_value(operator, value)),
    }
}

/// Existential over collections unless the operator takes them whole
fn test_value(operator: &dyn Operator, value: &Value) -> bool {
    match value {
        Value::Collection(items) if !operator.accepts_collection() => {
            items.iter().any(|item| operator.test(item))
        }
        _ => operator.test(value),
    }
}
