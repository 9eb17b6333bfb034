//! Persisted / non-persisted query planning
//!
//! ```text
//!                   Query (AND)
//!        ┌────────────┼──────────────┐
//!   level:eq:2   parent.id:eq:x   displayName:like:A   (transient)
//!        │            │              │
//!        ▼            ▼              ▼
//!   persisted query             non-persisted query
//!   (store, aliases: parent)    (in memory, over the store's results)
//! ```
//!
//! Under an AND root the two halves are evaluated in sequence and their
//! conjunction equals the original query. Under an OR root a transient
//! criterion cannot be pushed down without losing rows, so the whole query is
//! evaluated in memory over the unfiltered candidate set.

use std::collections::BTreeSet;
use std::sync::Arc;

use metaquery_criteria::{Alias, Criterion, Junction, JunctionType, Query, Restriction, StorePath};
use metaquery_schema::{PropertyPath, Schema, SchemaError, SchemaProvider};
use tracing::debug;

use crate::error::{PlanError, Result};

/// A query split into the part the store runs and the residual run in memory
///
/// Both halves share the schema and root junction type; their criteria and
/// orders are disjoint.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    persisted: Query,
    non_persisted: Query,
}

impl QueryPlan {
    pub fn persisted(&self) -> &Query {
        &self.persisted
    }

    pub fn non_persisted(&self) -> &Query {
        &self.non_persisted
    }

    /// Nothing is left for the in-memory phase
    pub fn is_store_only(&self) -> bool {
        self.non_persisted.is_empty()
    }

    pub fn into_parts(self) -> (Query, Query) {
        (self.persisted, self.non_persisted)
    }
}

pub struct QueryPlanner {
    provider: Arc<dyn SchemaProvider>,
}

impl QueryPlanner {
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self { provider }
    }

    /// Split `query`; it cannot be modified afterwards
    pub fn plan(&self, mut query: Query) -> Result<QueryPlan> {
        let schema = Arc::clone(query.schema());
        let mut persisted = query.derive();
        let mut non_persisted = query.derive();

        let mut store_criteria = Vec::new();
        let mut memory_criteria = Vec::new();
        let mut aliases = BTreeSet::new();

        for criterion in query.criteria() {
            match self.lower(&schema, criterion, &mut aliases)? {
                Some(lowered) => store_criteria.push(lowered),
                None => memory_criteria.push(criterion.clone()),
            }
        }

        if query.root_junction() == JunctionType::Or && !memory_criteria.is_empty() {
            memory_criteria = query.criteria().to_vec();
            store_criteria.clear();
            aliases.clear();
        }

        persisted.set_criteria(store_criteria);
        non_persisted.set_criteria(memory_criteria);
        // Registered aliases the store criteria join through; a hand-built
        // query may not have registered every prefix it uses
        persisted.add_aliases(query.aliases().iter().filter(|alias| aliases.remove(alias.path())));
        for path in aliases {
            debug!(path = %path, "registering missing join alias");
            persisted.add_alias(path);
        }

        if query.orders().iter().all(|o| o.is_persisted()) {
            persisted.add_orders(query.orders().iter().cloned());
        } else {
            non_persisted.add_orders(query.orders().iter().cloned());
        }

        if non_persisted.is_empty() {
            persisted.set_pagination(query.pagination());
        } else {
            non_persisted.set_pagination(query.pagination());
        }

        if let Some(objects) = query.take_objects() {
            non_persisted.set_objects(objects);
        }

        debug!(
            type_name = schema.name(),
            root = ?query.root_junction(),
            persisted_criteria = persisted.criteria().len(),
            non_persisted_criteria = non_persisted.criteria().len(),
            persisted_orders = persisted.orders().len(),
            non_persisted_orders = non_persisted.orders().len(),
            aliases = persisted.aliases().len(),
            paged_in_store = non_persisted.is_empty(),
            "planned query"
        );

        Ok(QueryPlan {
            persisted,
            non_persisted,
        })
    }

    /// The store form of `criterion`, or `None` if any part of it is transient
    ///
    /// Every restriction is resolved even after a transient one is found, so
    /// unknown paths are reported regardless of where they sit in the tree.
    fn lower(
        &self,
        schema: &Schema,
        criterion: &Criterion,
        aliases: &mut BTreeSet<String>,
    ) -> Result<Option<Criterion>> {
        let (kind, junction) = match criterion {
            Criterion::Restriction(r) => {
                return Ok(self
                    .lower_restriction(schema, r, aliases)?
                    .map(Criterion::Restriction))
            }
            Criterion::Conjunction(j) => (JunctionType::And, j),
            Criterion::Disjunction(j) => (JunctionType::Or, j),
        };

        let mut lowered = Junction::new();
        let mut junction_aliases = BTreeSet::new();
        let mut persisted = true;
        for child in junction.criteria() {
            match self.lower(schema, child, &mut junction_aliases)? {
                Some(child) => lowered.add(child),
                None => persisted = false,
            }
        }

        if !persisted {
            return Ok(None);
        }
        aliases.append(&mut junction_aliases);
        Ok(Some(Criterion::junction(kind, lowered)))
    }

    fn lower_restriction(
        &self,
        schema: &Schema,
        restriction: &Restriction,
        aliases: &mut BTreeSet<String>,
    ) -> Result<Option<Restriction>> {
        let path = PropertyPath::resolve(self.provider.as_ref(), schema, restriction.path())
            .map_err(|err| match err {
                SchemaError::UnknownProperty { .. } => PlanError::UnknownPath {
                    path: restriction.path().to_string(),
                    type_name: schema.name().to_string(),
                },
                other => PlanError::Schema(other),
            })?;
        if !path.is_persisted() {
            return Ok(None);
        }

        let prefixes = path.prefixes();
        let property = path.terminal().name();
        let store_path = match prefixes.last() {
            Some(prefix) => StorePath::aliased(Alias::new(prefix.as_str()).name(), property),
            None => StorePath::root(property),
        };
        aliases.extend(prefixes);
        Ok(Some(restriction.with_store_path(store_path)))
    }
}
