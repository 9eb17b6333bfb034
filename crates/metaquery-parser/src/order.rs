//! Order string parsing: `property[:asc|desc|iasc|idesc]`

use std::sync::Arc;

use metaquery_criteria::{Direction, Order};
use metaquery_schema::Schema;

use crate::error::{QueryParserError, Result};

pub fn parse_orders<S: AsRef<str>>(schema: &Schema, orders: &[S]) -> Result<Vec<Order>> {
    orders.iter().map(|o| parse_order(schema, o.as_ref())).collect()
}

pub fn parse_order(schema: &Schema, order: &str) -> Result<Order> {
    let (name, direction) = order.split_once(':').unwrap_or((order, "asc"));
    let (direction, ignore_case) = match direction {
        "asc" => (Direction::Ascending, false),
        "desc" => (Direction::Descending, false),
        "iasc" => (Direction::Ascending, true),
        "idesc" => (Direction::Descending, true),
        _ => return Err(QueryParserError::InvalidOrder(order.to_string())),
    };
    let property = schema
        .property(name)
        .ok_or_else(|| QueryParserError::UnknownPath {
            path: name.to_string(),
            type_name: schema.name().to_string(),
        })?;
    Ok(Order::new(Arc::clone(property), direction).ignore_case(ignore_case))
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaquery_schema::{Property, ValueType};

    fn schema() -> Schema {
        Schema::new("OrganisationUnit")
            .with_property(Property::new("name", ValueType::String))
            .with_property(Property::new("level", ValueType::Integer))
    }

    #[test]
    fn test_directions() {
        let orders = parse_orders(&schema(), &["name:iasc", "level:desc", "level"]).unwrap();
        let rendered: Vec<String> = orders.iter().map(Order::to_string).collect();
        assert_eq!(rendered, vec!["name:iasc", "level:desc", "level:asc"]);
        assert!(orders[0].is_ignore_case());
    }

    #[test]
    fn test_invalid_direction() {
        let err = parse_order(&schema(), "name:up").unwrap_err();
        assert_eq!(err, QueryParserError::InvalidOrder("name:up".into()));
    }

    #[test]
    fn test_unknown_property() {
        assert!(matches!(
            parse_order(&schema(), "code:asc").unwrap_err(),
            QueryParserError::UnknownPath { .. }
        ));
    }
}
