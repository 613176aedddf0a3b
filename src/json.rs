// ABOUTME: JSON parse/stringify bridging serde_json's preserve-order Value and our runtime Value

use crate::error::AislError;
use crate::value::{OrderedMap, Value};

pub fn parse(text: &str) -> Result<Value, AislError> {
    let parsed: serde_json::Value =
        serde_json::from_str(text).map_err(|e| AislError::invalid_arguments("json_parse", e.to_string()))?;
    Ok(from_serde(&parsed))
}

pub fn stringify(v: &Value) -> Result<String, AislError> {
    let serde_value = to_serde(v)?;
    serde_json::to_string(&serde_value).map_err(|e| AislError::Runtime(e.to_string()))
}

fn from_serde(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Unit,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Value::Int(n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64))
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Array(items) => Value::new_array(items.iter().map(from_serde).collect()),
        serde_json::Value::Object(entries) => {
            let mut map = OrderedMap::new();
            for (k, val) in entries {
                map.set(k.clone(), from_serde(val));
            }
            Value::new_map(map)
        }
    }
}

fn to_serde(v: &Value) -> Result<serde_json::Value, AislError> {
    Ok(match v {
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Decimal(s) => serde_json::Value::String(s.clone()),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Unit => serde_json::Value::Null,
        Value::Array(items) => {
            let converted: Result<Vec<_>, _> = items.borrow().iter().map(to_serde).collect();
            serde_json::Value::Array(converted?)
        }
        Value::Map(map) => {
            let mut obj = serde_json::Map::new();
            for (k, val) in map.borrow().entries() {
                obj.insert(k.clone(), to_serde(val)?);
            }
            serde_json::Value::Object(obj)
        }
        other => {
            return Err(AislError::invalid_arguments(
                "json_stringify",
                format!("cannot serialize a {} to JSON", other.kind_name()),
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preserves_object_key_order() {
        let value = parse(r#"{"b": 1, "a": 2}"#).unwrap();
        if let Value::Map(map) = value {
            assert_eq!(map.borrow().keys(), &["b".to_string(), "a".to_string()]);
        } else {
            panic!("expected map");
        }
    }

    #[test]
    fn parse_distinguishes_int_and_float() {
        assert!(matches!(parse("5").unwrap(), Value::Int(5)));
        assert!(matches!(parse("5.0").unwrap(), Value::Float(f) if f == 5.0));
    }

    #[test]
    fn null_becomes_unit_and_back() {
        assert!(matches!(parse("null").unwrap(), Value::Unit));
        assert_eq!(stringify(&Value::Unit).unwrap(), "null");
    }

    #[test]
    fn stringify_then_parse_roundtrips_array() {
        let original = Value::new_array(vec![Value::Int(1), Value::Str("x".into()), Value::Bool(true)]);
        let text = stringify(&original).unwrap();
        let reparsed = parse(&text).unwrap();
        assert!(crate::value::values_equal(&original, &reparsed));
    }
}
