//! Comparisons: eq, ne, lt, gt, le, ge, not.
//!
//! `eq`/`ne` accept any same-type pair and use structural equality on
//! arrays and maps; the ordering comparisons only accept `(int,int)`,
//! `(float,float)`, or `(decimal,decimal)`.

use crate::bigdecimal;
use crate::error::AislError;
use crate::value::{values_equal, Value};

pub fn eq(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(values_equal(&args[0], &args[1])))
}

pub fn ne(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(!values_equal(&args[0], &args[1])))
}

fn ordering(name: &str, args: &[Value]) -> Result<std::cmp::Ordering, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => {
            a.partial_cmp(b).ok_or_else(|| AislError::invalid_arguments(name, "NaN is not orderable"))
        }
        (Value::Decimal(a), Value::Decimal(b)) => {
            Ok(bigdecimal::compare(a, b)?.cmp(&0))
        }
        (a, b) => Err(AislError::invalid_arguments(
            name,
            format!("mismatched operand types ({}, {})", a.kind_name(), b.kind_name()),
        )),
    }
}

pub fn lt(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(ordering("lt", args)?.is_lt()))
}

pub fn gt(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(ordering("gt", args)?.is_gt()))
}

pub fn le(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(ordering("le", args)?.is_le()))
}

pub fn ge(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(ordering("ge", args)?.is_ge()))
}

pub fn not(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(AislError::type_mismatch("bool", other.kind_name())),
    }
}
