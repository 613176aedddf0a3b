//! Map operations on the shared, mutable, insertion-ordered `map` value.

use crate::error::AislError;
use crate::value::{deep_copy_value, OrderedMap, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn expect_map(v: &Value, name: &str) -> Result<Rc<RefCell<OrderedMap>>, AislError> {
    match v {
        Value::Map(m) => Ok(m.clone()),
        other => Err(AislError::invalid_arguments(name, format!("expected map, got {}", other.kind_name()))),
    }
}

fn expect_key(v: &Value, name: &str) -> Result<String, AislError> {
    match v {
        Value::Str(s) => Ok(s.clone()),
        other => Err(AislError::invalid_arguments(name, format!("expected string key, got {}", other.kind_name()))),
    }
}

pub fn map_new(_args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::new_map(OrderedMap::new()))
}

pub fn map_set(args: &[Value]) -> Result<Value, AislError> {
    let map = expect_map(&args[0], "map_set")?;
    let key = expect_key(&args[1], "map_set")?;
    map.borrow_mut().set(key, args[2].clone());
    Ok(Value::Unit)
}

/// Missing key is a `RuntimeError`, not an `Unit`.
pub fn map_get(args: &[Value]) -> Result<Value, AislError> {
    let map = expect_map(&args[0], "map_get")?;
    let key = expect_key(&args[1], "map_get")?;
    let borrowed = map.borrow();
    borrowed.get(&key).cloned().ok_or_else(|| AislError::KeyNotFound(key))
}

pub fn map_has(args: &[Value]) -> Result<Value, AislError> {
    let map = expect_map(&args[0], "map_has")?;
    let key = expect_key(&args[1], "map_has")?;
    Ok(Value::Bool(map.borrow().has(&key)))
}

pub fn map_delete(args: &[Value]) -> Result<Value, AislError> {
    let map = expect_map(&args[0], "map_delete")?;
    let key = expect_key(&args[1], "map_delete")?;
    Ok(Value::Bool(map.borrow_mut().delete(&key).is_some()))
}

pub fn map_keys(args: &[Value]) -> Result<Value, AislError> {
    let map = expect_map(&args[0], "map_keys")?;
    let keys = map.borrow().keys().iter().map(|k| Value::Str(k.clone())).collect();
    Ok(Value::new_array(keys))
}

pub fn map_copy(args: &[Value]) -> Result<Value, AislError> {
    Ok(deep_copy_value(&args[0]))
}

/// Array of `{key, value}` maps, in insertion order.
pub fn map_entries(args: &[Value]) -> Result<Value, AislError> {
    let map = expect_map(&args[0], "map_entries")?;
    let borrowed = map.borrow();
    let entries = borrowed
        .entries()
        .map(|(k, v)| {
            let mut entry = OrderedMap::new();
            entry.set("key".to_string(), Value::Str(k.clone()));
            entry.set("value".to_string(), v.clone());
            Value::new_map(entry)
        })
        .collect();
    Ok(Value::new_array(entries))
}

pub fn map_length(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Int(expect_map(&args[0], "map_length")?.borrow().len() as i64))
}

pub fn map_values(args: &[Value]) -> Result<Value, AislError> {
    let map = expect_map(&args[0], "map_values")?;
    let borrowed = map.borrow();
    Ok(Value::new_array(borrowed.entries().map(|(_, v)| v.clone()).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_is_runtime_error() {
        let map = Value::new_map(OrderedMap::new());
        assert!(matches!(map_get(&[map, Value::Str("x".into())]), Err(AislError::KeyNotFound(_))));
    }

    #[test]
    fn set_mutates_shared_map() {
        let map = Value::new_map(OrderedMap::new());
        map_set(&[map.clone(), Value::Str("a".into()), Value::Int(1)]).unwrap();
        assert!(matches!(map_has(&[map, Value::Str("a".into())]).unwrap(), Value::Bool(true)));
    }

    #[test]
    fn entries_preserve_insertion_order() {
        let map = Value::new_map(OrderedMap::new());
        map_set(&[map.clone(), Value::Str("b".into()), Value::Int(2)]).unwrap();
        map_set(&[map.clone(), Value::Str("a".into()), Value::Int(1)]).unwrap();
        let keys = map_keys(&[map]).unwrap();
        if let Value::Array(items) = keys {
            let items = items.borrow();
            assert!(matches!(&items[0], Value::Str(s) if s == "b"));
            assert!(matches!(&items[1], Value::Str(s) if s == "a"));
        }
    }
}
