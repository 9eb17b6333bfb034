//! Organisation unit hierarchy queried through filter strings

use std::sync::Arc;

use metaquery::{
    JunctionType, MemoryStore, Object, Property, QueryRequest, QueryService, Schema, SchemaRegistry, Value,
    ValueType,
};

struct OrgUnit {
    id: &'static str,
    name: &'static str,
    level: i64,
    parent: Option<Arc<OrgUnit>>,
}

fn service() -> QueryService {
    let mut registry = SchemaRegistry::new();
    registry.register(
        Schema::new("OrganisationUnit")
            .with_property(Property::new("id", ValueType::String).with_getter(|u: &OrgUnit| Value::from(u.id)))
            .with_property(Property::new("name", ValueType::String).with_getter(|u: &OrgUnit| Value::from(u.name)))
            .with_property(Property::new("level", ValueType::Integer).with_getter(|u: &OrgUnit| Value::from(u.level)))
            .with_property(
                Property::new("parent", ValueType::reference("OrganisationUnit"))
                    .with_getter(|u: &OrgUnit| u.parent.clone().map(Value::object).unwrap_or(Value::Null)),
            ),
    );
    let registry = Arc::new(registry);
    let store = Arc::new(MemoryStore::new(registry.clone()));

    let add = |id, name, level, parent: Option<&Arc<OrgUnit>>| {
        let unit = Arc::new(OrgUnit {
            id,
            name,
            level,
            parent: parent.cloned(),
        });
        store.insert("OrganisationUnit", unit.clone());
        unit
    };
    let country = add("ImspTQPwCqd", "Sierra Leone", 1, None);
    let bo = add("O6uvpzGd5pu", "Bo", 2, Some(&country));
    let koinadugu = add("qhqAxPSTUXp", "Koinadugu", 2, Some(&country));
    add("pmmUthH6F5W", "Bahati Clinic", 2, Some(&country));
    add("Vth0fbpFcsO", "kono Clinic", 2, Some(&country));
    add("DiszpKrYNg8", "Ngelehun Clinic", 3, Some(&bo));
    add("g8upMTyEZGZ", "Njandama Clinic", 3, Some(&koinadugu));

    QueryService::new(registry, store)
}

fn names(objects: &[Object]) -> Vec<&'static str> {
    objects
        .iter()
        .filter_map(|o| o.downcast_ref::<OrgUnit>())
        .map(|u| u.name)
        .collect()
}

#[test]
fn test_level_and_name_sorted_ignoring_case() {
    let service = service();
    let request = QueryRequest::new()
        .filter("level:eq:2")
        .filter("name:like:Clinic")
        .root_junction(JunctionType::And)
        .order("name:iasc");
    let result = service.query_from_request("OrganisationUnit", &request).unwrap();
    assert_eq!(names(&result), vec!["Bahati Clinic", "kono Clinic"]);
}

#[test]
fn test_grandparent_filter() {
    let service = service();
    let request = QueryRequest::new().filter("parent.parent.id:eq:ImspTQPwCqd");
    let result = service.query_from_request("OrganisationUnit", &request).unwrap();
    assert_eq!(names(&result), vec!["Ngelehun Clinic", "Njandama Clinic"]);
}

#[test]
fn test_same_query_twice_gives_same_output() {
    let service = service();
    let request = QueryRequest::new()
        .root_junction(JunctionType::Or)
        .filter("level:eq:3")
        .filter("parent:null")
        .order("level:desc")
        .page(1, 3);
    let first = names(&service.query_from_request("OrganisationUnit", &request).unwrap());
    let second = names(&service.query_from_request("OrganisationUnit", &request).unwrap());
    assert_eq!(first, second);
    assert_eq!(first, vec!["Ngelehun Clinic", "Njandama Clinic", "Sierra Leone"]);
}

#[test]
fn test_count_matches_unpaged_query() {
    let service = service();
    let request = QueryRequest::new().filter("name:ilike:clinic").page(1, 1);
    let count = service.count_from_request("OrganisationUnit", &request).unwrap();
    let all = service
        .query_from_request("OrganisationUnit", &request.clone().unpaged())
        .unwrap();
    assert_eq!(count, 4);
    assert_eq!(all.len(), count);
}
