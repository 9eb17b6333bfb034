//! Filter text to typed values

use metaquery_schema::{Timestamp, Value, ValueType};

use crate::error::{QueryParserError, Result};

fn conversion_error(raw: &str, target: &ValueType) -> QueryParserError {
    QueryParserError::Conversion {
        value: raw.to_string(),
        target: target.to_string(),
    }
}

/// Convert one raw value to the declared type
///
/// Collections convert against their item type; references are compared by
/// id, so their raw value stays a string.
pub fn convert(value_type: &ValueType, raw: &str) -> Result<Value> {
    match value_type {
        ValueType::String | ValueType::Reference(_) => Ok(Value::String(raw.to_string())),
        ValueType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| conversion_error(raw, value_type)),
        ValueType::Float => raw
            .trim()
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| conversion_error(raw, value_type)),
        ValueType::Double => raw
            .trim()
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| conversion_error(raw, value_type)),
        ValueType::Boolean => match raw {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(conversion_error(raw, value_type)),
        },
        ValueType::Date => Timestamp::parse(raw)
            .map(Value::Date)
            .map_err(|_| conversion_error(raw, value_type)),
        ValueType::Enum(enum_type) => {
            if enum_type.contains(raw) {
                Ok(Value::Enum(raw.to_string()))
            } else {
                Err(QueryParserError::InvalidEnum {
                    value: raw.to_string(),
                    enum_name: enum_type.name.clone(),
                    legal: enum_type.variants.join(", "),
                })
            }
        }
        ValueType::Collection(item) => convert(item, raw),
    }
}

/// Convert a `[a,b,c]` list; a bare value is a one-element list
pub fn convert_list(value_type: &ValueType, raw: &str) -> Result<Vec<Value>> {
    let raw = raw.trim();
    let inner = match raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => inner,
        None => raw,
    };
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|item| convert(value_type, item.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaquery_schema::EnumType;

    #[test]
    fn test_scalars() {
        assert_eq!(convert(&ValueType::Integer, "42").unwrap(), Value::Integer(42));
        assert_eq!(convert(&ValueType::Double, "2.5").unwrap(), Value::Double(2.5));
        assert_eq!(convert(&ValueType::Boolean, "true").unwrap(), Value::Boolean(true));
        assert_eq!(convert(&ValueType::String, "a:b").unwrap(), Value::from("a:b"));
    }

    #[test]
    fn test_conversion_failure_names_value_and_type() {
        let err = convert(&ValueType::Integer, "abc").unwrap_err();
        assert_eq!(
            err,
            QueryParserError::Conversion {
                value: "abc".into(),
                target: ValueType::Integer.to_string(),
            }
        );
        assert!(convert(&ValueType::Boolean, "TRUE").is_err());
    }

    #[test]
    fn test_year_date() {
        let value = convert(&ValueType::Date, "2003").unwrap();
        assert_eq!(value, Value::Date(Timestamp::from_ymd(2003, 1, 1).unwrap()));
    }

    #[test]
    fn test_enum_lists_legal_values() {
        let kind = ValueType::Enum(EnumType::new("ValueKind", &["NUMBER", "TEXT"]));
        assert_eq!(convert(&kind, "TEXT").unwrap(), Value::Enum("TEXT".into()));
        match convert(&kind, "text").unwrap_err() {
            QueryParserError::InvalidEnum { legal, .. } => assert_eq!(legal, "NUMBER, TEXT"),
            other => panic!("expected enum error, got {:?}", other),
        }
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            convert_list(&ValueType::Integer, "[1, 2,3]").unwrap(),
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
        assert_eq!(convert_list(&ValueType::String, "abc").unwrap(), vec![Value::from("abc")]);
        assert!(convert_list(&ValueType::String, "[]").unwrap().is_empty());
        assert!(convert_list(&ValueType::Integer, "[1,x]").is_err());
    }
}
