//! String primitives, operating on UTF-8 `string` values and byte offsets
//! except where noted.

use crate::error::AislError;
use crate::value::{string_of_value, Value};

fn expect_str<'a>(v: &'a Value, name: &str) -> Result<&'a str, AislError> {
    match v {
        Value::Str(s) => Ok(s),
        other => Err(AislError::invalid_arguments(name, format!("expected string, got {}", other.kind_name()))),
    }
}

fn expect_int(v: &Value, name: &str) -> Result<i64, AislError> {
    match v {
        Value::Int(i) => Ok(*i),
        other => Err(AislError::invalid_arguments(name, format!("expected int, got {}", other.kind_name()))),
    }
}

pub fn string_length(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Int(expect_str(&args[0], "string_length")?.len() as i64))
}

pub fn string_concat(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Str(format!(
        "{}{}",
        expect_str(&args[0], "string_concat")?,
        expect_str(&args[1], "string_concat")?
    )))
}

pub fn string_equals(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(
        expect_str(&args[0], "string_equals")? == expect_str(&args[1], "string_equals")?,
    ))
}

pub fn string_slice(args: &[Value]) -> Result<Value, AislError> {
    let s = expect_str(&args[0], "string_slice")?;
    let start = expect_int(&args[1], "string_slice")?;
    let len = expect_int(&args[2], "string_slice")?;
    if start < 0 || len < 0 {
        return Err(AislError::invalid_arguments("string_slice", "start and len must be non-negative"));
    }
    let (start, len) = (start as usize, len as usize);
    let bytes = s.as_bytes();
    let end = (start + len).min(bytes.len());
    let start = start.min(bytes.len());
    let slice = &bytes[start..end];
    String::from_utf8(slice.to_vec())
        .map(Value::Str)
        .map_err(|_| AislError::invalid_arguments("string_slice", "slice does not fall on a UTF-8 boundary"))
}

/// Byte code at index `i`.
pub fn string_get(args: &[Value]) -> Result<Value, AislError> {
    let s = expect_str(&args[0], "string_get")?;
    let i = expect_int(&args[1], "string_get")?;
    let bytes = s.as_bytes();
    if i < 0 || i as usize >= bytes.len() {
        return Err(AislError::IndexOutOfBounds { index: i, length: bytes.len() });
    }
    Ok(Value::Int(bytes[i as usize] as i64))
}

/// `{}` placeholders replaced in order by `string_of_value` of each arg.
pub fn string_format(args: &[Value]) -> Result<Value, AislError> {
    let template = expect_str(&args[0], "string_format")?;
    let mut out = String::with_capacity(template.len());
    let mut rest = &args[1..];
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'}') {
            chars.next();
            let (value, tail) = rest.split_first().ok_or_else(|| {
                AislError::invalid_arguments("string_format", "not enough arguments for template placeholders")
            })?;
            out.push_str(&string_of_value(value));
            rest = tail;
        } else {
            out.push(c);
        }
    }
    Ok(Value::Str(out))
}

/// -1 if missing, 0 if `needle` is empty.
pub fn string_find(args: &[Value]) -> Result<Value, AislError> {
    let haystack = expect_str(&args[0], "string_find")?;
    let needle = expect_str(&args[1], "string_find")?;
    if needle.is_empty() {
        return Ok(Value::Int(0));
    }
    Ok(Value::Int(haystack.find(needle).map(|i| i as i64).unwrap_or(-1)))
}

pub fn string_to_upper(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Str(expect_str(&args[0], "string_to_upper")?.to_uppercase()))
}

pub fn string_to_lower(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Str(expect_str(&args[0], "string_to_lower")?.to_lowercase()))
}

/// Empty delimiter yields one array entry per character.
pub fn string_split(args: &[Value]) -> Result<Value, AislError> {
    let s = expect_str(&args[0], "string_split")?;
    let delim = expect_str(&args[1], "string_split")?;
    let parts: Vec<Value> = if delim.is_empty() {
        s.chars().map(|c| Value::Str(c.to_string())).collect()
    } else {
        s.split(delim).map(|part| Value::Str(part.to_string())).collect()
    };
    Ok(Value::new_array(parts))
}

pub fn string_join(args: &[Value]) -> Result<Value, AislError> {
    let items = match &args[0] {
        Value::Array(items) => items.borrow(),
        other => return Err(AislError::type_mismatch("array", other.kind_name())),
    };
    let delim = expect_str(&args[1], "string_join")?;
    let rendered: Vec<String> = items.iter().map(string_of_value).collect();
    Ok(Value::Str(rendered.join(delim)))
}

pub fn string_starts_with(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(
        expect_str(&args[0], "string_starts_with")?.starts_with(expect_str(&args[1], "string_starts_with")?),
    ))
}

pub fn string_ends_with(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(
        expect_str(&args[0], "string_ends_with")?.ends_with(expect_str(&args[1], "string_ends_with")?),
    ))
}

pub fn string_contains(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Bool(
        expect_str(&args[0], "string_contains")?.contains(expect_str(&args[1], "string_contains")?),
    ))
}

/// Trims spaces, tabs, CR, LF.
pub fn string_trim(args: &[Value]) -> Result<Value, AislError> {
    Ok(Value::Str(
        expect_str(&args[0], "string_trim")?.trim_matches(|c| " \t\r\n".contains(c)).to_string(),
    ))
}

/// Replaces all occurrences; an empty `old` returns `s` unchanged.
pub fn string_replace(args: &[Value]) -> Result<Value, AislError> {
    let s = expect_str(&args[0], "string_replace")?;
    let old = expect_str(&args[1], "string_replace")?;
    let new = expect_str(&args[2], "string_replace")?;
    if old.is_empty() {
        return Ok(Value::Str(s.to_string()));
    }
    Ok(Value::Str(s.replace(old, new)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_empty_needle_is_zero() {
        assert!(matches!(
            string_find(&[Value::Str("abc".into()), Value::Str("".into())]).unwrap(),
            Value::Int(0)
        ));
    }

    #[test]
    fn format_replaces_placeholders_in_order() {
        let result = string_format(&[
            Value::Str("{} is {}".into()),
            Value::Str("x".into()),
            Value::Int(5),
        ])
        .unwrap();
        assert!(matches!(result, Value::Str(s) if s == "x is 5"));
    }

    #[test]
    fn split_empty_delim_yields_chars() {
        let result = string_split(&[Value::Str("ab".into()), Value::Str("".into())]).unwrap();
        if let Value::Array(items) = result {
            assert_eq!(items.borrow().len(), 2);
        } else {
            panic!("expected array");
        }
    }

    #[test]
    fn replace_empty_old_is_noop() {
        let result = string_replace(&[Value::Str("abc".into()), Value::Str("".into()), Value::Str("x".into())]).unwrap();
        assert!(matches!(result, Value::Str(s) if s == "abc"));
    }

    #[test]
    fn trim_strips_whitespace_family() {
        let result = string_trim(&[Value::Str(" \t a \r\n".into())]).unwrap();
        assert!(matches!(result, Value::Str(s) if s == "a"));
    }
}
