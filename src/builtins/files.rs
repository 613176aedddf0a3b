//! Plain filesystem I/O. AISL scripts run unsandboxed, unlike the
//! capability-restricted host this interpreter was adapted from — every
//! path is resolved the way `std::fs` resolves it.

use crate::error::AislError;
use crate::value::Value;
use std::fs;

fn expect_str<'a>(v: &'a Value, name: &str) -> Result<&'a str, AislError> {
    match v {
        Value::Str(s) => Ok(s),
        other => Err(AislError::invalid_arguments(name, format!("expected string, got {}", other.kind_name()))),
    }
}

fn io_err(e: std::io::Error) -> AislError {
    AislError::IoError(e.to_string())
}

pub fn file_read(args: &[Value]) -> Result<Value, AislError> {
    let path = expect_str(&args[0], "file_read")?;
    fs::read_to_string(path).map(Value::Str).map_err(io_err)
}

pub fn file_write(args: &[Value]) -> Result<Value, AislError> {
    let path = expect_str(&args[0], "file_write")?;
    let content = expect_str(&args[1], "file_write")?;
    fs::write(path, content).map(|_| Value::Bool(true)).map_err(io_err)
}

pub fn file_append(args: &[Value]) -> Result<Value, AislError> {
    use std::io::Write;
    let path = expect_str(&args[0], "file_append")?;
    let content = expect_str(&args[1], "file_append")?;
    let mut f = fs::OpenOptions::new().create(true).append(true).open(path).map_err(io_err)?;
    f.write_all(content.as_bytes()).map_err(io_err)?;
    Ok(Value::Bool(true))
}

pub fn file_exists(args: &[Value]) -> Result<Value, AislError> {
    let path = expect_str(&args[0], "file_exists")?;
    Ok(Value::Bool(std::path::Path::new(path).exists()))
}

pub fn file_size(args: &[Value]) -> Result<Value, AislError> {
    let path = expect_str(&args[0], "file_size")?;
    fs::metadata(path).map(|m| Value::Int(m.len() as i64)).map_err(io_err)
}

pub fn file_delete(args: &[Value]) -> Result<Value, AislError> {
    let path = expect_str(&args[0], "file_delete")?;
    Ok(Value::Bool(fs::remove_file(path).is_ok()))
}

/// Empty array on error, per the calling convention used for reads that
/// are expected to be probed rather than `try`/`catch`-guarded.
pub fn dir_list(args: &[Value]) -> Result<Value, AislError> {
    let path = expect_str(&args[0], "dir_list")?;
    let names = fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| Value::Str(e.file_name().to_string_lossy().into_owned()))
                .collect()
        })
        .unwrap_or_default();
    Ok(Value::new_array(names))
}

pub fn dir_create(args: &[Value]) -> Result<Value, AislError> {
    let path = expect_str(&args[0], "dir_create")?;
    Ok(Value::Bool(fs::create_dir_all(path).is_ok()))
}

pub fn dir_delete(args: &[Value]) -> Result<Value, AislError> {
    let path = expect_str(&args[0], "dir_delete")?;
    Ok(Value::Bool(fs::remove_dir_all(path).is_ok()))
}
