//! Filter string parsing
//!
//! A filter is `path:operator[:value]`. The string is split into at most three
//! segments, so the value itself may contain `:` (times, URLs):
//!
//! ```text
//! parent.parent.id:in:[a,b]     created:gt:2003-01-01T10:00
//! └────┬────────┘ └┬┘ └─┬─┘
//!    path    operator  value
//! ```
//!
//! Two pseudo-paths are recognised when the schema has no property of that
//! name: `identifiable` (id, code, name and shortName at once) and `$query`
//! (free text, expanded by the engine).

use std::sync::Arc;

use metaquery_criteria::{Criterion, Junction, JunctionType, MatchMode, Query, Restriction};
use metaquery_schema::{Property, PropertyPath, Schema, SchemaError, SchemaProvider, ValueType};
use tracing::{debug, trace};

use crate::convert::{convert, convert_list};
use crate::error::{QueryParserError, Result};
use crate::OperatorToken;

/// Pseudo-path matching on id, code, name and shortName at once
pub const IDENTIFIABLE: &str = "identifiable";

/// Pseudo-path carrying free text for the engine to expand
pub const QUERY_PATH: &str = "$query";

/// Turns filter strings into a [`Query`] against a schema provider
#[derive(Clone)]
pub struct QueryParser {
    provider: Arc<dyn SchemaProvider>,
}

impl QueryParser {
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn SchemaProvider> {
        &self.provider
    }

    /// Parse `filters` for `type_name`, combining them under `root_junction`
    pub fn parse<S: AsRef<str>>(
        &self,
        type_name: &str,
        filters: &[S],
        root_junction: JunctionType,
    ) -> Result<Query> {
        let schema = self.provider.require_schema(type_name)?;
        let mut query = Query::with_junction(Arc::clone(&schema), root_junction);

        for filter in filters {
            let criterion = self.parse_filter(&schema, filter.as_ref())?;
            trace!(filter = filter.as_ref(), %criterion, "parsed filter");
            for restriction in criterion.restrictions() {
                for prefix in path_prefixes(restriction.path()) {
                    query.add_alias(prefix);
                }
            }
            query.add(criterion);
        }

        debug!(
            type_name,
            filters = filters.len(),
            aliases = query.aliases().len(),
            root = ?root_junction,
            "parsed query"
        );
        Ok(query)
    }

    /// Parse one `path:operator[:value]` filter
    pub fn parse_filter(&self, schema: &Schema, filter: &str) -> Result<Criterion> {
        let parts: Vec<&str> = filter.splitn(3, ':').collect();
        let (path, operator, value) = match parts.as_slice() {
            [path, operator] => (*path, *operator, None),
            [path, operator, value] => (*path, *operator, Some(*value)),
            _ => return Err(QueryParserError::MalformedFilter(filter.to_string())),
        };
        if path.is_empty() || operator.is_empty() {
            return Err(QueryParserError::MalformedFilter(filter.to_string()));
        }

        match path {
            IDENTIFIABLE if !schema.has_property(IDENTIFIABLE) => {
                self.identifiable(schema, operator, value)
            }
            QUERY_PATH if !schema.has_property(QUERY_PATH) => {
                let text = value.ok_or_else(|| QueryParserError::MissingValue(operator.to_string()))?;
                Ok(Restriction::eq(QUERY_PATH, text).into())
            }
            _ => self
                .build_restriction(schema, path, operator, value)
                .map(Criterion::from),
        }
    }

    /// Terminal property of `path`, or `None` if some segment does not exist
    ///
    /// Structural errors, such as continuing past a simple property, are
    /// still errors.
    pub fn get_property(&self, schema: &Schema, path: &str) -> Result<Option<Arc<Property>>> {
        match PropertyPath::resolve(self.provider.as_ref(), schema, path) {
            Ok(resolved) => Ok(Some(Arc::clone(resolved.terminal()))),
            Err(SchemaError::UnknownProperty { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Build the restriction for one parsed filter
    pub fn build_restriction(
        &self,
        schema: &Schema,
        path: &str,
        operator: &str,
        value: Option<&str>,
    ) -> Result<Restriction> {
        let token = OperatorToken::lex(operator)
            .ok_or_else(|| QueryParserError::UnknownOperator(operator.to_string()))?;
        let property = self
            .get_property(schema, path)?
            .ok_or_else(|| QueryParserError::UnknownPath {
                path: path.to_string(),
                type_name: schema.name().to_string(),
            })?;

        let (path, value_type) = if token.requires_value() {
            self.comparison_target(path, &property)?
        } else {
            (path.to_string(), property.value_type().clone())
        };
        let raw = || value.ok_or_else(|| QueryParserError::MissingValue(operator.to_string()));
        let scalar = |raw: &str| convert(&value_type, raw);

        let restriction = match token {
            OperatorToken::Eq => Restriction::eq(path, scalar(raw()?)?),
            OperatorToken::IEq => Restriction::ilike(path, raw()?, MatchMode::Exact),
            OperatorToken::Ne => Restriction::ne(path, scalar(raw()?)?),
            OperatorToken::Gt => Restriction::gt(path, scalar(raw()?)?),
            OperatorToken::Lt => Restriction::lt(path, scalar(raw()?)?),
            OperatorToken::Ge => Restriction::ge(path, scalar(raw()?)?),
            OperatorToken::Le => Restriction::le(path, scalar(raw()?)?),

            OperatorToken::Like => Restriction::like(path, raw()?, MatchMode::Anywhere),
            OperatorToken::NotLike => Restriction::not_like(path, raw()?, MatchMode::Anywhere),
            OperatorToken::StartLike => Restriction::like(path, raw()?, MatchMode::Start),
            OperatorToken::NotStartLike => Restriction::not_like(path, raw()?, MatchMode::Start),
            OperatorToken::EndLike => Restriction::like(path, raw()?, MatchMode::End),
            OperatorToken::NotEndLike => Restriction::not_like(path, raw()?, MatchMode::End),
            OperatorToken::ILike => Restriction::ilike(path, raw()?, MatchMode::Anywhere),
            OperatorToken::NotILike => Restriction::not_ilike(path, raw()?, MatchMode::Anywhere),
            OperatorToken::StartILike => Restriction::ilike(path, raw()?, MatchMode::Start),
            OperatorToken::NotStartILike => Restriction::not_ilike(path, raw()?, MatchMode::Start),
            OperatorToken::EndILike => Restriction::ilike(path, raw()?, MatchMode::End),
            OperatorToken::NotEndILike => Restriction::not_ilike(path, raw()?, MatchMode::End),

            OperatorToken::Token => Restriction::token(path, raw()?),
            OperatorToken::NotToken => Restriction::not_token(path, raw()?),

            OperatorToken::In => Restriction::is_in(path, convert_list(&value_type, raw()?)?)?,
            OperatorToken::NotIn => Restriction::not_in(path, convert_list(&value_type, raw()?)?)?,

            OperatorToken::Null => Restriction::is_null(path),
            OperatorToken::NotNull => Restriction::is_not_null(path),
            OperatorToken::Empty => Restriction::is_empty(path),
            OperatorToken::NotEmpty => Restriction::is_not_empty(path),
        };
        Ok(restriction)
    }

    /// Where a value comparison lands: references compare by the referenced
    /// object's `id`
    fn comparison_target(&self, path: &str, property: &Property) -> Result<(String, ValueType)> {
        if let Some(target) = property.referenced_type() {
            let target = self.provider.require_schema(target)?;
            if let Some(id) = target.property("id") {
                return Ok((format!("{}.id", path), id.value_type().clone()));
            }
        }
        Ok((path.to_string(), property.value_type().clone()))
    }

    fn identifiable(&self, schema: &Schema, operator: &str, value: Option<&str>) -> Result<Criterion> {
        let mut junction = Junction::new();
        for path in ["id", "code"] {
            if schema.has_property(path) {
                junction.add(self.build_restriction(schema, path, "eq", value)?);
            }
        }
        for path in ["name", "shortName"] {
            if schema.has_property(path) {
                junction.add(self.build_restriction(schema, path, operator, value)?);
            }
        }
        Ok(Criterion::Disjunction(junction))
    }
}

/// Dotted prefixes of a path's non-terminal segments
fn path_prefixes(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.split('.').collect();
    (1..segments.len()).map(|n| segments[..n].join(".")).collect()
}
