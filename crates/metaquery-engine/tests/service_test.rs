//! QueryService over the reference MemoryStore
//!
//! Checks the split between store pushdown and in-memory residual, and that
//! both routes agree on what a query selects.

use std::sync::Arc;

use metaquery_criteria::{Defaults, JunctionType, Pagination, Query, Restriction, StorePredicate};
use metaquery_engine::{MemoryStore, QueryError, QueryRequest, QueryService};
use metaquery_schema::{Object, Property, Schema, SchemaProvider, SchemaRegistry, Value, ValueType};

struct Unit {
    id: &'static str,
    code: &'static str,
    name: &'static str,
    level: i64,
    parent: Option<Arc<Unit>>,
}

fn registry() -> Arc<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.register(
        Schema::new("OrganisationUnit")
            .with_property(Property::new("id", ValueType::String).with_getter(|u: &Unit| Value::from(u.id)))
            .with_property(Property::new("code", ValueType::String).with_getter(|u: &Unit| Value::from(u.code)))
            .with_property(Property::new("name", ValueType::String).with_getter(|u: &Unit| Value::from(u.name)))
            .with_property(Property::new("level", ValueType::Integer).with_getter(|u: &Unit| Value::from(u.level)))
            .with_property(
                Property::new("parent", ValueType::reference("OrganisationUnit"))
                    .with_getter(|u: &Unit| u.parent.clone().map(Value::object).unwrap_or(Value::Null)),
            )
            .with_property(
                Property::new("displayName", ValueType::String)
                    .transient()
                    .with_getter(|u: &Unit| Value::from(format!("{} ({})", u.name, u.code))),
            ),
    );
    Arc::new(registry)
}

fn unit(id: &'static str, code: &'static str, name: &'static str, level: i64, parent: Option<&Arc<Unit>>) -> Arc<Unit> {
    Arc::new(Unit {
        id,
        code,
        name,
        level,
        parent: parent.cloned(),
    })
}

fn setup() -> (Arc<SchemaRegistry>, Arc<MemoryStore>, QueryService) {
    let registry = registry();
    let store = Arc::new(MemoryStore::new(registry.clone()));

    let sierra = unit("ImspTQPwCqd", "OU_525", "Sierra Leone", 1, None);
    let bo = unit("O6uvpzGd5pu", "OU_264", "Bo", 2, Some(&sierra));
    let bombali = unit("fdc6uOvgoji", "OU_193", "Bombali", 2, Some(&sierra));
    let clinic = unit("DiszpKrYNg8", "OU_559", "Ngelehun CHC", 3, Some(&bo));
    let default = unit("Dflt0000001", "OU_0", "default", 0, None);
    store.insert_all(
        "OrganisationUnit",
        [sierra, bo, bombali, clinic, default].map(|u| u as Object),
    );

    let service = QueryService::new(registry.clone(), store.clone());
    (registry, store, service)
}

fn ids(objects: &[Object]) -> Vec<&'static str> {
    objects
        .iter()
        .filter_map(|o| o.downcast_ref::<Unit>())
        .map(|u| u.id)
        .collect()
}

// === Store pushdown ===

#[test]
fn test_persisted_filters_go_to_store() {
    let (_, store, service) = setup();
    let request = QueryRequest::new().filter("level:eq:2").order("name:asc");
    let result = service.query_from_request("OrganisationUnit", &request).unwrap();

    assert_eq!(ids(&result), vec!["O6uvpzGd5pu", "fdc6uOvgoji"]);
    let fetched = store.last_query().unwrap();
    assert_eq!(fetched.predicate.leaf_count(), 1);
    assert_eq!(fetched.limit, Some(50));
}

#[test]
fn test_nested_path_joins_through_alias() {
    let (_, store, service) = setup();
    let request = QueryRequest::new().filter("parent.parent.id:eq:ImspTQPwCqd");
    let result = service.query_from_request("OrganisationUnit", &request).unwrap();

    assert_eq!(ids(&result), vec!["DiszpKrYNg8"]);
    let aliases: Vec<String> = store
        .last_query()
        .unwrap()
        .aliases
        .iter()
        .map(|a| a.name().to_string())
        .collect();
    assert_eq!(aliases, vec!["parent", "parent_parent"]);
}

#[test]
fn test_reference_terminal_compares_ids() {
    let (_, _, service) = setup();
    let request = QueryRequest::new().filter("parent:eq:O6uvpzGd5pu");
    let result = service.query_from_request("OrganisationUnit", &request).unwrap();
    assert_eq!(ids(&result), vec!["DiszpKrYNg8"]);
}

// === In-memory residual ===

#[test]
fn test_transient_filter_runs_in_memory() {
    let (_, store, service) = setup();
    let request = QueryRequest::new()
        .filter("level:ge:2")
        .filter("displayName:like:OU_2");
    let result = service.query_from_request("OrganisationUnit", &request).unwrap();

    assert_eq!(ids(&result), vec!["O6uvpzGd5pu"]);
    // Store sees only the persisted half and no window
    let fetched = store.last_query().unwrap();
    assert_eq!(fetched.predicate.leaf_count(), 1);
    assert_eq!(fetched.limit, None);
}

#[test]
fn test_or_with_transient_evaluates_everything_in_memory() {
    let (_, store, service) = setup();
    let request = QueryRequest::new()
        .root_junction(JunctionType::Or)
        .filter("level:eq:3")
        .filter("displayName:like:Bombali");
    let result = service.query_from_request("OrganisationUnit", &request).unwrap();

    assert_eq!(ids(&result), vec!["fdc6uOvgoji", "DiszpKrYNg8"]);
    assert_eq!(store.last_query().unwrap().predicate, StorePredicate::And(vec![]));
}

#[test]
fn test_transient_order_sorts_in_memory_before_paging() {
    let (_, store, service) = setup();
    let request = QueryRequest::new()
        .filter("level:gt:0")
        .order("displayName:desc")
        .page(1, 2);
    let result = service.query_from_request("OrganisationUnit", &request).unwrap();

    assert_eq!(ids(&result), vec!["ImspTQPwCqd", "DiszpKrYNg8"]);
    let fetched = store.last_query().unwrap();
    assert!(fetched.orders.is_empty());
    assert_eq!(fetched.limit, None);
}

// === Text query, defaults, counting ===

#[test]
fn test_text_query_matches_id_code_or_name() {
    let (_, _, service) = setup();
    for text in ["O6uvpzGd5pu", "OU_264", "bo"] {
        let request = QueryRequest::new().filter(format!("$query:eq:{text}")).unpaged();
        let result = service.query_from_request("OrganisationUnit", &request).unwrap();
        assert!(ids(&result).contains(&"O6uvpzGd5pu"), "text {text}");
    }
}

#[test]
fn test_defaults_filter() {
    let (_, _, service) = setup();
    let excluded = service
        .query_from_request("OrganisationUnit", &QueryRequest::new())
        .unwrap();
    assert_eq!(excluded.len(), 4);

    let request = QueryRequest::new().defaults(Defaults::Include);
    let included = service.query_from_request("OrganisationUnit", &request).unwrap();
    assert_eq!(included.len(), 5);
}

#[test]
fn test_count_ignores_pagination() {
    let (_, _, service) = setup();
    let request = QueryRequest::new().filter("level:ge:1").page(2, 1);
    assert_eq!(service.count_from_request("OrganisationUnit", &request).unwrap(), 4);

    let request = request.filter("displayName:like:CHC");
    assert_eq!(service.count_from_request("OrganisationUnit", &request).unwrap(), 1);

    let request = QueryRequest::new().defaults(Defaults::Include);
    assert_eq!(service.count_from_request("OrganisationUnit", &request).unwrap(), 5);
}

#[test]
fn test_page_past_the_end_is_empty() {
    let (_, _, service) = setup();
    let request = QueryRequest::new().filter("level:ge:1").page(usize::MAX, 50);
    assert!(service.query_from_request("OrganisationUnit", &request).unwrap().is_empty());

    let request = request.filter("displayName:like:CHC");
    assert!(service.query_from_request("OrganisationUnit", &request).unwrap().is_empty());
}

#[test]
fn test_preloaded_objects_skip_store() {
    let (registry, store, service) = setup();
    let schema = registry.schema("OrganisationUnit").unwrap();
    let mut query = Query::new(schema);
    query.add(Restriction::eq("level", 2i64));
    query.set_objects(vec![unit("a", "A", "Alpha", 2, None) as Object]);
    query.set_pagination(Pagination::unpaged());

    let result = service.query(query).unwrap();
    assert_eq!(ids(&result), vec!["a"]);
    assert!(store.last_query().is_none());
}

// === Errors ===

#[test]
fn test_empty_in_list_is_error() {
    let (_, _, service) = setup();
    let request = QueryRequest::new().filter("id:in:[]");
    assert!(matches!(
        service.query_from_request("OrganisationUnit", &request),
        Err(QueryError::Parse(_))
    ));
}

#[test]
fn test_unknown_type_is_error() {
    let (_, _, service) = setup();
    assert!(service.query_from_request("Nope", &QueryRequest::new()).is_err());
}
