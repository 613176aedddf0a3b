//! Arithmetic: add, sub, mul, div, mod, neg, abs, min, max, sqrt, pow,
//! floor, ceil, round, and the bitwise family.
//!
//! `add/sub/mul/div/min/max` require both arguments to share the same
//! numeric type (`int`, `float`, or `decimal`); mixed types are an
//! `InvalidArguments` error, matching the language's no-implicit-conversion
//! rule.

use crate::bigdecimal;
use crate::error::AislError;
use crate::value::Value;

fn mismatch(name: &str, a: &Value, b: &Value) -> AislError {
    AislError::invalid_arguments(name, format!("mismatched operand types ({}, {})", a.kind_name(), b.kind_name()))
}

/// `(int,int)`, `(float,float)`, or `(decimal,decimal)` — same-type only.
pub fn add(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(bigdecimal::add(a, b)?)),
        (a, b) => Err(mismatch("add", a, b)),
    }
}

pub fn sub(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(bigdecimal::sub(a, b)?)),
        (a, b) => Err(mismatch("sub", a, b)),
    }
}

pub fn mul(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(bigdecimal::mul(a, b)?)),
        (a, b) => Err(mismatch("mul", a, b)),
    }
}

pub fn div(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(_), Value::Int(0)) => Err(AislError::DivisionByZero),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_div(*b))),
        (Value::Float(_), Value::Float(b)) if *b == 0.0 => Err(AislError::DivisionByZero),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
        (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(bigdecimal::div(a, b, None)?)),
        (a, b) => Err(mismatch("div", a, b)),
    }
}

/// `mod(int,int)` only; `mod(x, 0)` is `DivisionByZero`.
pub fn modulo(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(_), Value::Int(0)) => Err(AislError::DivisionByZero),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_rem(*b))),
        (a, b) => Err(mismatch("mod", a, b)),
    }
}

pub fn neg(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Int(a) => Ok(Value::Int(a.wrapping_neg())),
        Value::Float(a) => Ok(Value::Float(-a)),
        Value::Decimal(a) => Ok(Value::Decimal(bigdecimal::neg(a)?)),
        other => Err(AislError::type_mismatch("int, float, or decimal", other.kind_name())),
    }
}

pub fn abs(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Int(a) => Ok(Value::Int(a.wrapping_abs())),
        Value::Float(a) => Ok(Value::Float(a.abs())),
        Value::Decimal(a) => Ok(Value::Decimal(bigdecimal::abs(a)?)),
        other => Err(AislError::type_mismatch("int, float, or decimal", other.kind_name())),
    }
}

pub fn min(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(*a.min(b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a.min(*b))),
        (Value::Decimal(a), Value::Decimal(b)) => {
            let ordering = bigdecimal::compare(a, b)?;
            Ok(Value::Decimal(if ordering <= 0 { a.clone() } else { b.clone() }))
        }
        (a, b) => Err(mismatch("min", a, b)),
    }
}

pub fn max(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(*a.max(b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a.max(*b))),
        (Value::Decimal(a), Value::Decimal(b)) => {
            let ordering = bigdecimal::compare(a, b)?;
            Ok(Value::Decimal(if ordering >= 0 { a.clone() } else { b.clone() }))
        }
        (a, b) => Err(mismatch("max", a, b)),
    }
}

pub fn sqrt(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Float(f) => Ok(Value::Float(f.sqrt())),
        other => Err(AislError::type_mismatch("float", other.kind_name())),
    }
}

pub fn pow(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a.powf(*b))),
        (a, b) => Err(mismatch("pow", a, b)),
    }
}

pub fn floor(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Float(f) => Ok(Value::Int(f.floor() as i64)),
        other => Err(AislError::type_mismatch("float", other.kind_name())),
    }
}

pub fn ceil(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Float(f) => Ok(Value::Int(f.ceil() as i64)),
        other => Err(AislError::type_mismatch("float", other.kind_name())),
    }
}

pub fn round(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Float(f) => Ok(Value::Int(f.round() as i64)),
        other => Err(AislError::type_mismatch("float", other.kind_name())),
    }
}

pub fn bit_and(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a & b)),
        (a, b) => Err(mismatch("bit_and", a, b)),
    }
}

pub fn bit_or(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a | b)),
        (a, b) => Err(mismatch("bit_or", a, b)),
    }
}

pub fn bit_xor(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a ^ b)),
        (a, b) => Err(mismatch("bit_xor", a, b)),
    }
}

pub fn bit_not(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Int(a) => Ok(Value::Int(!a)),
        other => Err(AislError::type_mismatch("int", other.kind_name())),
    }
}

/// Logical (unsigned) shift on the 64-bit representation.
pub fn bit_shift_left(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(((*a as u64) << (*b as u64 & 63)) as i64)),
        (a, b) => Err(mismatch("bit_shift_left", a, b)),
    }
}

pub fn bit_shift_right(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(((*a as u64) >> (*b as u64 & 63)) as i64)),
        (a, b) => Err(mismatch("bit_shift_right", a, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_requires_matching_types() {
        let err = add(&[Value::Int(1), Value::Float(2.0)]).unwrap_err();
        assert!(matches!(err, AislError::InvalidArguments { .. }));
    }

    #[test]
    fn div_by_zero_int() {
        assert!(matches!(div(&[Value::Int(1), Value::Int(0)]), Err(AislError::DivisionByZero)));
    }

    #[test]
    fn modulo_requires_ints() {
        assert!(matches!(modulo(&[Value::Int(7), Value::Int(3)]).unwrap(), Value::Int(1)));
        assert!(matches!(modulo(&[Value::Int(7), Value::Int(0)]), Err(AislError::DivisionByZero)));
    }

    #[test]
    fn bit_shift_is_logical() {
        assert!(matches!(bit_shift_right(&[Value::Int(-1), Value::Int(60)]).unwrap(), Value::Int(15)));
    }

    #[test]
    fn min_max_decimal() {
        let a = Value::Decimal("1.50".into());
        let b = Value::Decimal("2".into());
        assert!(matches!(min(&[a.clone(), b.clone()]).unwrap(), Value::Decimal(_)));
        assert!(matches!(max(&[a, b]).unwrap(), Value::Decimal(_)));
    }
}
