//! `type_of`, `is_array`, `is_object`.

use crate::error::AislError;
use crate::value::Value;

pub fn type_of(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Str(args[0].type_of_name().to_string()))
}

pub fn is_array(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(matches!(args[0], Value::Array(_))))
}

pub fn is_object(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(matches!(args[0], Value::Map(_))))
}
