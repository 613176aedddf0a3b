//! Regex builtins backed by the `regex` crate. `regex_compile` just stores
//! the pattern verbatim — compilation (and its errors) happen lazily at
//! each call site, since `Value` has no dedicated regex variant.

use crate::error::AislError;
use crate::value::Value;
use regex::Regex;

fn expect_str<'a>(v: &'a Value, name: &str) -> Result<&'a str, AislError> {
    match v {
        Value::Str(s) => Ok(s),
        other => Err(AislError::invalid_arguments(name, format!("expected string, got {}", other.kind_name()))),
    }
}

fn compile(pattern: &str) -> Result<Regex, AislError> {
    Regex::new(pattern).map_err(|e| AislError::invalid_arguments("regex", e.to_string()))
}

pub fn regex_compile(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Str(expect_str(&args[0], "regex_compile")?.to_string()))
}

pub fn regex_match(args: &[Value]) -> Result<Value, AislError> {
    let re = compile(expect_str(&args[0], "regex_match")?)?;
    let text = expect_str(&args[1], "regex_match")?;
    Ok(Value::Bool(re.is_match(text)))
}

pub fn regex_find(args: &[Value]) -> Result<Value, AislError> {
    let re = compile(expect_str(&args[0], "regex_find")?)?;
    let text = expect_str(&args[1], "regex_find")?;
    Ok(Value::Str(re.find(text).map(|m| m.as_str().to_string()).unwrap_or_default()))
}

pub fn regex_find_all(args: &[Value]) -> Result<Value, AislError> {
    let re = compile(expect_str(&args[0], "regex_find_all")?)?;
    let text = expect_str(&args[1], "regex_find_all")?;
    let matches = re.find_iter(text).map(|m| Value::Str(m.as_str().to_string())).collect();
    Ok(Value::new_array(matches))
}

pub fn regex_replace(args: &[Value]) -> Result<Value, AislError> {
    let re = compile(expect_str(&args[0], "regex_replace")?)?;
    let text = expect_str(&args[1], "regex_replace")?;
    let repl = expect_str(&args[2], "regex_replace")?;
    Ok(Value::Str(re.replace_all(text, repl).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_reports_presence_only() {
        let re = Value::Str("a+b".into());
        assert!(matches!(regex_match(&[re, Value::Str("xxaaabxx".into())]).unwrap(), Value::Bool(true)));
    }

    #[test]
    fn find_returns_empty_string_on_no_match() {
        let re = Value::Str("z+".into());
        assert!(matches!(regex_find(&[re, Value::Str("abc".into())]).unwrap(), Value::Str(s) if s.is_empty()));
    }

    #[test]
    fn find_all_collects_every_match() {
        let re = Value::Str(r"\d+".into());
        let result = regex_find_all(&[re, Value::Str("a1 b22 c333".into())]).unwrap();
        if let Value::Array(items) = result {
            let rendered: Vec<String> = items.borrow().iter().map(|v| match v { Value::Str(s) => s.clone(), _ => String::new() }).collect();
            assert_eq!(rendered, vec!["1", "22", "333"]);
        } else {
            panic!("expected array");
        }
    }

    #[test]
    fn replace_is_global() {
        let re = Value::Str("a".into());
        let result = regex_replace(&[re, Value::Str("banana".into()), Value::Str("o".into())]).unwrap();
        assert!(matches!(result, Value::Str(s) if s == "bonono"));
    }
}
