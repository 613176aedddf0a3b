//! Process args/env: `argv`, `argv_count`, `getenv`, `exit`.
//!
//! The driver stashes the script's own argv once at startup in thread-local
//! storage, and these builtins read it back without threading state through
//! the evaluator.

use crate::error::AislError;
use crate::value::Value;
use std::cell::RefCell;

thread_local! {
    static ARGV: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Called once by the driver before evaluation starts.
pub fn set_argv(args: Vec<String>) {
    ARGV.with(|a| *a.borrow_mut() = args);
}

pub fn argv(_args: &[Value]) -> Result<Value, AislError> {
    Ok(ARGV.with(|a| Value::new_array(a.borrow().iter().map(|s| Value::Str(s.clone())).collect())))
}

pub fn argv_count(_args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Int(ARGV.with(|a| a.borrow().len() as i64)))
}

pub fn getenv(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Str(name) => Ok(Value::Str(std::env::var(name).unwrap_or_default())),
        other => Err(AislError::type_mismatch("string", other.kind_name())),
    }
}

pub fn exit(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Int(code) => std::process::exit(*code as i32),
        other => Err(AislError::type_mismatch("int", other.kind_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_reflects_set_argv() {
        set_argv(vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(argv_count(&[]).unwrap(), Value::Int(2)));
        let result = argv(&[]).unwrap();
        if let Value::Array(items) = result {
            assert_eq!(items.borrow().len(), 2);
        } else {
            panic!("expected array");
        }
    }

    #[test]
    fn getenv_missing_is_empty_string() {
        let result = getenv(&[Value::Str("AISL_DEFINITELY_UNSET_VAR".into())]).unwrap();
        assert!(matches!(result, Value::Str(s) if s.is_empty()));
    }
}
