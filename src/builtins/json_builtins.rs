//! JSON construction/parsing builtins. `json_get`/`json_set`/`json_has`/
//! `json_delete`/`json_push`/`json_length`/`json_type` operate directly on
//! the already-parsed `Map`/`Array` representation — there is no separate
//! JSON document type once a value has been parsed.

use crate::error::AislError;
use crate::json;
use crate::value::{OrderedMap, Value};

fn expect_str<'a>(v: &'a Value, name: &str) -> Result<&'a str, AislError> {
    match v {
        Value::Str(s) => Ok(s),
        other => Err(AislError::invalid_arguments(name, format!("expected string, got {}", other.kind_name()))),
    }
}

pub fn json_new_object(_args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::new_map(OrderedMap::new()))
}

pub fn json_new_array(_args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::new_array(Vec::new()))
}

pub fn json_parse(args: &[Value]) -> Result<Value, AislError> {
    json::parse(expect_str(&args[0], "json_parse")?)
}

pub fn json_stringify(args: &[Value]) -> Result<Value, AislError> {
    json::stringify(&args[0]).map(Value::Str)
}

pub fn json_get(args: &[Value]) -> Result<Value, AislError> {
    let key = expect_str(&args[1], "json_get")?;
    match &args[0] {
        Value::Map(map) => map.borrow().get(key).cloned().ok_or_else(|| AislError::KeyNotFound(key.to_string())),
        other => Err(AislError::type_mismatch("map", other.kind_name())),
    }
}

pub fn json_set(args: &[Value]) -> Result<Value, AislError> {
    let key = expect_str(&args[1], "json_set")?;
    match &args[0] {
        Value::Map(map) => {
            map.borrow_mut().set(key.to_string(), args[2].clone());
            Ok(Value::Unit)
        }
        other => Err(AislError::type_mismatch("map", other.kind_name())),
    }
}

pub fn json_has(args: &[Value]) -> Result<Value, AislError> {
    let key = expect_str(&args[1], "json_has")?;
    match &args[0] {
        Value::Map(map) => Ok(Value::Bool(map.borrow().has(key))),
        other => Err(AislError::type_mismatch("map", other.kind_name())),
    }
}

pub fn json_delete(args: &[Value]) -> Result<Value, AislError> {
    let key = expect_str(&args[1], "json_delete")?;
    match &args[0] {
        Value::Map(map) => {
            map.borrow_mut().delete(key);
            Ok(Value::Unit)
        }
        other => Err(AislError::type_mismatch("map", other.kind_name())),
    }
}

pub fn json_push(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Array(items) => {
            items.borrow_mut().push(args[1].clone());
            Ok(Value::Unit)
        }
        other => Err(AislError::type_mismatch("array", other.kind_name())),
    }
}

pub fn json_length(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Array(items) => Ok(Value::Int(items.borrow().len() as i64)),
        Value::Map(map) => Ok(Value::Int(map.borrow().len() as i64)),
        other => Err(AislError::type_mismatch("array or map", other.kind_name())),
    }
}

pub fn json_type(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Str(
        match &args[0] {
            Value::Map(_) => "object",
            Value::Array(_) => "array",
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Unit => "unit",
            _ => "unknown",
        }
        .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_roundtrips_through_get_set() {
        let obj = json_new_object(&[]).unwrap();
        json_set(&[obj.clone(), Value::Str("a".into()), Value::Int(1)]).unwrap();
        assert!(matches!(json_get(&[obj.clone(), Value::Str("a".into())]).unwrap(), Value::Int(1)));
        assert!(matches!(json_has(&[obj.clone(), Value::Str("a".into())]).unwrap(), Value::Bool(true)));
        json_delete(&[obj.clone(), Value::Str("a".into())]).unwrap();
        assert!(matches!(json_has(&[obj, Value::Str("a".into())]).unwrap(), Value::Bool(false)));
    }

    #[test]
    fn array_push_and_length() {
        let arr = json_new_array(&[]).unwrap();
        json_push(&[arr.clone(), Value::Int(1)]).unwrap();
        json_push(&[arr.clone(), Value::Int(2)]).unwrap();
        assert!(matches!(json_length(&[arr]).unwrap(), Value::Int(2)));
    }

    #[test]
    fn json_type_names_match_stringified_kinds() {
        assert!(matches!(json_type(&[Value::new_map(OrderedMap::new())]).unwrap(), Value::Str(s) if s == "object"));
        assert!(matches!(json_type(&[Value::new_array(vec![])]).unwrap(), Value::Str(s) if s == "array"));
    }
}
