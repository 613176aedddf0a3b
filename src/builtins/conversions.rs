//! Explicit casts and string<->value conversions. AISL has no implicit
//! numeric promotion, so every cross-type move goes through one of these.

use crate::bigdecimal;
use crate::error::AislError;
use crate::value::Value;

pub fn cast_int_float(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        other => Err(AislError::type_mismatch("int", other.kind_name())),
    }
}

/// Truncates toward zero.
pub fn cast_float_int(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Float(f) => Ok(Value::Int(f.trunc() as i64)),
        other => Err(AislError::type_mismatch("float", other.kind_name())),
    }
}

pub fn cast_int_decimal(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Decimal(bigdecimal::normalize(&i.to_string())?)),
        other => Err(AislError::type_mismatch("int", other.kind_name())),
    }
}

/// Truncates toward zero.
pub fn cast_decimal_int(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Decimal(s) => {
            let whole = s.split('.').next().unwrap_or(s);
            whole
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| AislError::Runtime(format!("cannot cast decimal '{s}' to int")))
        }
        other => Err(AislError::type_mismatch("decimal", other.kind_name())),
    }
}

pub fn cast_float_decimal(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Float(f) => Ok(Value::Decimal(bigdecimal::normalize(&format!("{f}"))?)),
        other => Err(AislError::type_mismatch("float", other.kind_name())),
    }
}

pub fn cast_decimal_float(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Decimal(s) => s
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| AislError::Runtime(format!("cannot cast decimal '{s}' to float"))),
        other => Err(AislError::type_mismatch("decimal", other.kind_name())),
    }
}

pub fn string_from_int(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Str(i.to_string())),
        other => Err(AislError::type_mismatch("int", other.kind_name())),
    }
}

pub fn string_from_float(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Float(f) => Ok(Value::Str(f.to_string())),
        other => Err(AislError::type_mismatch("float", other.kind_name())),
    }
}

pub fn string_from_bool(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Bool(b) => Ok(Value::Str(b.to_string())),
        other => Err(AislError::type_mismatch("bool", other.kind_name())),
    }
}

pub fn string_to_int(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| AislError::Runtime(format!("'{s}' is not a valid int"))),
        other => Err(AislError::type_mismatch("string", other.kind_name())),
    }
}

pub fn string_to_float(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| AislError::Runtime(format!("'{s}' is not a valid float"))),
        other => Err(AislError::type_mismatch("string", other.kind_name())),
    }
}

/// One UTF-8 (ASCII-range) character from its code point.
pub fn char_from_code(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Int(i) => {
            let c = u8::try_from(*i)
                .ok()
                .map(|b| b as char)
                .ok_or_else(|| AislError::Runtime(format!("{i} is not a valid ASCII code point")))?;
            Ok(Value::Str(c.to_string()))
        }
        other => Err(AislError::type_mismatch("int", other.kind_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_int_truncates_toward_zero() {
        assert!(matches!(cast_float_int(&[Value::Float(-1.9)]).unwrap(), Value::Int(-1)));
    }

    #[test]
    fn string_to_int_rejects_non_numeric() {
        assert!(string_to_int(&[Value::Str("abc".into())]).is_err());
    }

    #[test]
    fn char_from_code_roundtrip() {
        assert!(matches!(char_from_code(&[Value::Int(65)]).unwrap(), Value::Str(s) if s == "A"));
    }
}
