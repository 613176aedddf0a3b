//! Array operations on the shared, mutable `array` value.

use crate::error::AislError;
use crate::value::{deep_copy_value, values_equal, Value};

fn expect_array(v: &Value, name: &str) -> Result<std::rc::Rc<std::cell::RefCell<Vec<Value>>>, AislError> {
    match v {
        Value::Array(items) => Ok(items.clone()),
        other => Err(AislError::invalid_arguments(name, format!("expected array, got {}", other.kind_name()))),
    }
}

fn expect_index(v: &Value, name: &str) -> Result<i64, AislError> {
    match v {
        Value::Int(i) => Ok(*i),
        other => Err(AislError::invalid_arguments(name, format!("expected int, got {}", other.kind_name()))),
    }
}

fn bounds_check(index: i64, len: usize) -> Result<usize, AislError> {
    if index < 0 || index as usize >= len {
        return Err(AislError::IndexOutOfBounds { index, length: len });
    }
    Ok(index as usize)
}

pub fn array_new(_args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::new_array(Vec::new()))
}

pub fn array_push(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_push")?;
    items.borrow_mut().push(args[1].clone());
    Ok(Value::Unit)
}

pub fn array_get(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_get")?;
    let idx = expect_index(&args[1], "array_get")?;
    let items = items.borrow();
    let idx = bounds_check(idx, items.len())?;
    Ok(items[idx].clone())
}

pub fn array_set(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_set")?;
    let idx = expect_index(&args[1], "array_set")?;
    let mut items = items.borrow_mut();
    let idx = bounds_check(idx, items.len())?;
    items[idx] = args[2].clone();
    Ok(Value::Unit)
}

pub fn array_length(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Int(expect_array(&args[0], "array_length")?.borrow().len() as i64))
}

pub fn array_copy(args: &[Value]) -> Result<Value, AislError> {
    Ok(deep_copy_value(&args[0]))
}

/// Sorts by type-homogeneous comparison; mixed element types are an error.
pub fn array_sort(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_sort")?;
    let mut borrowed = items.borrow_mut();
    for pair in borrowed.windows(2) {
        if std::mem::discriminant(&pair[0]) != std::mem::discriminant(&pair[1]) {
            return Err(AislError::invalid_arguments("array_sort", "array elements must share one type"));
        }
    }
    let mut err = None;
    borrowed.sort_by(|a, b| match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Decimal(x), Value::Decimal(y)) => match crate::bigdecimal::compare(x, y) {
            Ok(o) => o.cmp(&0),
            Err(e) => {
                err = Some(e);
                std::cmp::Ordering::Equal
            }
        },
        _ => {
            err = Some(AislError::invalid_arguments("array_sort", "unsupported element type"));
            std::cmp::Ordering::Equal
        }
    });
    if let Some(e) = err {
        return Err(e);
    }
    Ok(Value::Unit)
}

pub fn array_reverse(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_reverse")?;
    items.borrow_mut().reverse();
    Ok(Value::Unit)
}

pub fn array_contains(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_contains")?;
    Ok(Value::Bool(items.borrow().iter().any(|v| values_equal(v, &args[1]))))
}

pub fn array_index_of(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_index_of")?;
    let idx = items.borrow().iter().position(|v| values_equal(v, &args[1]));
    Ok(Value::Int(idx.map(|i| i as i64).unwrap_or(-1)))
}

pub fn array_pop(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_pop")?;
    items
        .borrow_mut()
        .pop()
        .ok_or_else(|| AislError::invalid_arguments("array_pop", "array is empty"))
}

pub fn array_remove(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_remove")?;
    let idx = expect_index(&args[1], "array_remove")?;
    let mut items = items.borrow_mut();
    let idx = bounds_check(idx, items.len())?;
    Ok(items.remove(idx))
}

pub fn array_slice(args: &[Value]) -> Result<Value, AislError> {
    let items = expect_array(&args[0], "array_slice")?;
    let start = expect_index(&args[1], "array_slice")?;
    let len = expect_index(&args[2], "array_slice")?;
    if start < 0 || len < 0 {
        return Err(AislError::invalid_arguments("array_slice", "start and len must be non-negative"));
    }
    let items = items.borrow();
    let start = (start as usize).min(items.len());
    let end = (start + len as usize).min(items.len());
    Ok(Value::new_array(items[start..end].to_vec()))
}

pub fn array_concat(args: &[Value]) -> Result<Value, AislError> {
    let a = expect_array(&args[0], "array_concat")?;
    let b = expect_array(&args[1], "array_concat")?;
    let mut combined = a.borrow().clone();
    combined.extend(b.borrow().iter().cloned());
    Ok(Value::new_array(combined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_mutates_shared_array() {
        let arr = Value::new_array(vec![Value::Int(1)]);
        array_push(&[arr.clone(), Value::Int(2)]).unwrap();
        if let Value::Array(items) = arr {
            assert_eq!(items.borrow().len(), 2);
        } else {
            panic!("expected array");
        }
    }

    #[test]
    fn get_out_of_bounds_errors() {
        let arr = Value::new_array(vec![Value::Int(1)]);
        assert!(matches!(array_get(&[arr, Value::Int(5)]), Err(AislError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn sort_rejects_mixed_types() {
        let arr = Value::new_array(vec![Value::Int(1), Value::Str("x".into())]);
        assert!(array_sort(&[arr]).is_err());
    }

    #[test]
    fn index_of_missing_is_negative_one() {
        let arr = Value::new_array(vec![Value::Int(1)]);
        assert!(matches!(array_index_of(&[arr, Value::Int(9)]).unwrap(), Value::Int(-1)));
    }

    #[test]
    fn copy_is_deep() {
        let arr = Value::new_array(vec![Value::Int(1)]);
        let copy = array_copy(&[arr.clone()]).unwrap();
        array_push(&[copy, Value::Int(2)]).unwrap();
        if let Value::Array(items) = arr {
            assert_eq!(items.borrow().len(), 1);
        }
    }
}
