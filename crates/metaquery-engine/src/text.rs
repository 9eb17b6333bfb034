//! Expansion of the `$query` free-text pseudo-restriction
//!
//! `$query:eq:abc` becomes `id eq "abc" OR code eq "abc" OR name ilike "%abc%"`,
//! over whichever of those properties the type has.

use std::sync::Arc;

use metaquery_criteria::{Criterion, Junction, MatchMode, Query, Restriction};
use metaquery_parser::QUERY_PATH;
use metaquery_schema::Schema;

/// Replace every `$query` restriction in the tree with its disjunction
pub fn expand_text_query(query: &mut Query) {
    if !query
        .criteria()
        .iter()
        .any(|c| c.restrictions().iter().any(|r| r.path() == QUERY_PATH))
    {
        return;
    }
    let schema = Arc::clone(query.schema());
    let criteria = query.criteria().iter().map(|c| expand(&schema, c)).collect();
    query.set_criteria(criteria);
}

fn expand(schema: &Schema, criterion: &Criterion) -> Criterion {
    match criterion {
        Criterion::Restriction(r) if r.path() == QUERY_PATH => text_disjunction(schema, r),
        Criterion::Restriction(_) => criterion.clone(),
        Criterion::Conjunction(j) => Criterion::Conjunction(expand_junction(schema, j)),
        Criterion::Disjunction(j) => Criterion::Disjunction(expand_junction(schema, j)),
    }
}

fn expand_junction(schema: &Schema, junction: &Junction) -> Junction {
    let mut expanded = Junction::new();
    for child in junction.criteria() {
        expanded.add(expand(schema, child));
    }
    expanded
}

fn text_disjunction(schema: &Schema, restriction: &Restriction) -> Criterion {
    let text = restriction
        .operator()
        .args()
        .first()
        .map(|v| v.to_string())
        .unwrap_or_default();

    let mut junction = Junction::new();
    if schema.has_property("id") {
        junction.add(Restriction::eq("id", text.as_str()));
    }
    if schema.has_property("code") {
        junction.add(Restriction::eq("code", text.as_str()));
    }
    if schema.has_property("name") {
        junction.add(Restriction::ilike("name", text.as_str(), MatchMode::Anywhere));
    }
    Criterion::Disjunction(junction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaquery_criteria::JunctionType;
    use metaquery_schema::{Property, ValueType};

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new("DataElement")
                .with_property(Property::new("id", ValueType::String))
                .with_property(Property::new("code", ValueType::String))
                .with_property(Property::new("name", ValueType::String)),
        )
    }

    fn rendered(criterion: &Criterion) -> Vec<String> {
        criterion.restrictions().iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_expands_top_level() {
        let mut query = Query::new(schema());
        query.add(Restriction::eq(QUERY_PATH, "anc"));
        expand_text_query(&mut query);
        assert!(matches!(query.criteria()[0], Criterion::Disjunction(_)));
        assert_eq!(rendered(&query.criteria()[0]), vec!["id:eq:anc", "code:eq:anc", "name:ilike:anc"]);
    }

    #[test]
    fn test_expands_nested_and_keeps_others() {
        let mut query = Query::with_junction(schema(), JunctionType::Or);
        query.add(Restriction::eq("code", "x"));
        query.add_conjunction().add(Restriction::eq(QUERY_PATH, "anc"));
        expand_text_query(&mut query);
        assert_eq!(rendered(&query.criteria()[0]), vec!["code:eq:x"]);
        assert_eq!(rendered(&query.criteria()[1]).len(), 3);
    }

    #[test]
    fn test_no_text_query_is_untouched() {
        let mut query = Query::new(schema());
        query.add(Restriction::eq("code", "x"));
        expand_text_query(&mut query);
        assert_eq!(rendered(&query.criteria()[0]), vec!["code:eq:x"]);
    }
}
