//! Reference [`Store`] backed by in-process object lists
//!
//! Evaluates [`StorePredicate`]s natively the way a relational backend would
//! run them: join aliases are resolved to property paths, non-persisted
//! properties are refused, rows with a null sort key go last, and
//! offset/limit are applied after ordering. The last fetched query is kept
//! for inspection.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use metaquery_criteria::{
    is_empty_value, token_match, Direction, Like, Operator, StorePath, StorePredicate,
};
use metaquery_schema::{Object, PathValue, PropertyPath, Schema, SchemaProvider, Value};

use crate::error::MemoryStoreError;
use crate::sort::stable_sort_by;
use crate::store::{Store, StoreError, StoreOrder, StoreQuery};

pub struct MemoryStore {
    provider: Arc<dyn SchemaProvider>,
    objects: RwLock<HashMap<String, Vec<Object>>>,
    last_query: Mutex<Option<StoreQuery>>,
}

impl MemoryStore {
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self {
            provider,
            objects: RwLock::new(HashMap::new()),
            last_query: Mutex::new(None),
        }
    }

    pub fn insert(&self, type_name: &str, object: Object) {
        self.insert_all(type_name, [object]);
    }

    pub fn insert_all(&self, type_name: &str, objects: impl IntoIterator<Item = Object>) {
        let mut store = self.objects.write().unwrap_or_else(|e| e.into_inner());
        store
            .entry(type_name.to_string())
            .or_default()
            .extend(objects);
    }

    /// The most recent query passed to [`Store::fetch`]
    pub fn last_query(&self) -> Option<StoreQuery> {
        self.last_query
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn select(&self, query: &StoreQuery, resolver: &Resolver<'_>) -> Result<Vec<Object>, MemoryStoreError> {
        let mut paths = HashMap::new();
        collect_paths(&query.predicate, resolver, &mut paths)?;

        let store = self.objects.read().unwrap_or_else(|e| e.into_inner());
        let candidates = store.get(&query.type_name).map(Vec::as_slice).unwrap_or(&[]);
        Ok(candidates
            .iter()
            .filter(|object| eval(&query.predicate, object, &paths))
            .cloned()
            .collect())
    }
}

impl Store for MemoryStore {
    fn fetch(&self, query: &StoreQuery) -> Result<Vec<Object>, StoreError> {
        *self.last_query.lock().unwrap_or_else(|e| e.into_inner()) = Some(query.clone());

        let schema = self.provider.require_schema(&query.type_name)?;
        let resolver = Resolver::new(self.provider.as_ref(), &schema, query);
        let selected = self.select(query, &resolver)?;
        let order_paths = query
            .orders
            .iter()
            .map(|order| resolver.resolve(&order.path))
            .collect::<Result<Vec<_>, _>>()?;

        let keyed: Vec<(Vec<Value>, Object)> = selected
            .into_iter()
            .map(|object| {
                let keys = order_paths.iter().map(|p| sort_key(p, &object)).collect();
                (keys, object)
            })
            .collect();
        let sorted = stable_sort_by(keyed, &|(a, _), (b, _)| compare_rows(&query.orders, a, b));

        let start = query.offset.min(sorted.len());
        let end = match query.limit {
            Some(limit) => start.saturating_add(limit).min(sorted.len()),
            None => sorted.len(),
        };
        Ok(sorted
            .into_iter()
            .skip(start)
            .take(end - start)
            .map(|(_, object)| object)
            .collect())
    }

    fn count(&self, query: &StoreQuery) -> Result<usize, StoreError> {
        let schema = self.provider.require_schema(&query.type_name)?;
        let resolver = Resolver::new(self.provider.as_ref(), &schema, query);
        Ok(self.select(query, &resolver)?.len())
    }
}

/// Maps store paths to property paths through the query's join aliases
struct Resolver<'a> {
    provider: &'a dyn SchemaProvider,
    schema: &'a Schema,
    aliases: HashMap<&'a str, &'a str>,
}

impl<'a> Resolver<'a> {
    fn new(provider: &'a dyn SchemaProvider, schema: &'a Schema, query: &'a StoreQuery) -> Self {
        let aliases = query
            .aliases
            .iter()
            .map(|alias| (alias.name(), alias.path()))
            .collect();
        Self {
            provider,
            schema,
            aliases,
        }
    }

    fn resolve(&self, path: &StorePath) -> Result<PropertyPath, MemoryStoreError> {
        let dotted = match path.alias() {
            Some(alias) => {
                let prefix = self
                    .aliases
                    .get(alias)
                    .ok_or_else(|| MemoryStoreError::UnknownAlias(alias.to_string()))?;
                format!("{}.{}", prefix, path.property())
            }
            None => path.property().to_string(),
        };
        let resolved = PropertyPath::resolve(self.provider, self.schema, &dotted)?;
        if !resolved.is_persisted() {
            return Err(MemoryStoreError::NotPersisted(dotted));
        }
        Ok(resolved)
    }
}

fn collect_paths(
    predicate: &StorePredicate,
    resolver: &Resolver<'_>,
    paths: &mut HashMap<StorePath, PropertyPath>,
) -> Result<(), MemoryStoreError> {
    let path = match predicate {
        StorePredicate::And(children) | StorePredicate::Or(children) => {
            for child in children {
                collect_paths(child, resolver, paths)?;
            }
            return Ok(());
        }
        StorePredicate::Eq(p, _)
        | StorePredicate::Ne(p, _)
        | StorePredicate::Gt(p, _)
        | StorePredicate::Lt(p, _)
        | StorePredicate::Ge(p, _)
        | StorePredicate::Le(p, _)
        | StorePredicate::Between(p, _, _)
        | StorePredicate::IsNull(p)
        | StorePredicate::IsNotNull(p)
        | StorePredicate::IsEmpty(p)
        | StorePredicate::IsNotEmpty(p) => p,
        StorePredicate::Like { path, .. }
        | StorePredicate::Tokens { path, .. }
        | StorePredicate::In { path, .. } => path,
    };
    if !paths.contains_key(path) {
        paths.insert(path.clone(), resolver.resolve(path)?);
    }
    Ok(())
}

/// Values a predicate leaf sees: one per joined row, terminal collections
/// expanded
fn leaf_values(path: &PropertyPath, object: &Object) -> Vec<Value> {
    let values = match path.read(object) {
        PathValue::Single(value) => vec![value],
        PathValue::Many(values) => values,
    };
    values
        .into_iter()
        .flat_map(|value| match value {
            Value::Collection(items) => items,
            other => vec![other],
        })
        .collect()
}

/// Whole values at the end of the path, one per branch when it fans out
fn whole_values(path: &PropertyPath, object: &Object) -> Vec<Value> {
    match path.read(object) {
        PathValue::Single(value) => vec![value],
        PathValue::Many(values) => values,
    }
}

fn eval(predicate: &StorePredicate, object: &Object, paths: &HashMap<StorePath, PropertyPath>) -> bool {
    let any = |p: &StorePath, test: &dyn Fn(&Value) -> bool| {
        paths
            .get(p)
            .map(|path| leaf_values(path, object).iter().any(test))
            .unwrap_or(false)
    };
    let whole = |p: &StorePath, test: &dyn Fn(&Value) -> bool| {
        paths
            .get(p)
            .map(|path| whole_values(path, object).iter().any(test))
            .unwrap_or(false)
    };
    let ordered = |a: &Value, b: &Value, accept: &[Ordering]| {
        a.compare(b).map(|o| accept.contains(&o)).unwrap_or(false)
    };

    match predicate {
        StorePredicate::And(children) => children.iter().all(|c| eval(c, object, paths)),
        StorePredicate::Or(children) => children.iter().any(|c| eval(c, object, paths)),

        StorePredicate::Eq(p, v) => any(p, &|x| x == v),
        StorePredicate::Ne(p, v) => any(p, &|x| x != v),
        StorePredicate::Gt(p, v) => any(p, &|x| ordered(x, v, &[Ordering::Greater])),
        StorePredicate::Lt(p, v) => any(p, &|x| ordered(x, v, &[Ordering::Less])),
        StorePredicate::Ge(p, v) => any(p, &|x| ordered(x, v, &[Ordering::Greater, Ordering::Equal])),
        StorePredicate::Le(p, v) => any(p, &|x| ordered(x, v, &[Ordering::Less, Ordering::Equal])),
        StorePredicate::Between(p, low, high) => any(p, &|x| {
            ordered(x, low, &[Ordering::Greater, Ordering::Equal])
                && ordered(x, high, &[Ordering::Less, Ordering::Equal])
        }),

        StorePredicate::Like {
            path,
            pattern,
            mode,
            case_insensitive,
            negated,
        } => {
            let like = Like {
                pattern: pattern.clone(),
                mode: *mode,
                case_insensitive: *case_insensitive,
                negated: *negated,
            };
            any(path, &|x| like.test(x))
        }
        StorePredicate::Tokens {
            path,
            tokens,
            negated,
        } => any(path, &|x| match x.to_text() {
            Some(text) => token_match(&text, tokens) != *negated,
            None => false,
        }),
        StorePredicate::In {
            path,
            values,
            negated,
        } => any(path, &|x| values.contains(x) != *negated),

        StorePredicate::IsNull(p) => whole(p, &Value::is_null),
        StorePredicate::IsNotNull(p) => whole(p, &|v| !v.is_null()),
        StorePredicate::IsEmpty(p) => whole(p, &is_empty_value),
        StorePredicate::IsNotEmpty(p) => whole(p, &|v| !is_empty_value(v)),
    }
}

fn sort_key(path: &PropertyPath, object: &Object) -> Value {
    match path.read(object) {
        PathValue::Single(value) => value,
        PathValue::Many(values) => values.into_iter().next().unwrap_or(Value::Null),
    }
}

/// Nulls last in either direction
fn compare_rows(orders: &[StoreOrder], a: &[Value], b: &[Value]) -> Ordering {
    for (order, (x, y)) in orders.iter().zip(a.iter().zip(b)) {
        let ordering = match (x.is_null(), y.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let natural = match (order.ignore_case, x.as_str(), y.as_str()) {
                    (true, Some(s), Some(t)) => s.to_lowercase().cmp(&t.to_lowercase()),
                    _ => x.compare(y).unwrap_or(Ordering::Equal),
                };
                match order.direction {
                    Direction::Ascending => natural,
                    Direction::Descending => natural.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
