//! Standard I/O: `print`, `println`, `read_line`, `stdin_read_all`.

use crate::error::AislError;
use crate::value::{string_of_value, Value};
use std::io::{self, Read, Write};

pub fn print(args: &[Value]) -> Result<Value, AislError> {
    print!("{}", string_of_value(&args[0]));
    io::stdout().flush().map_err(|e| AislError::IoError(e.to_string()))?;
    Ok(Value::Unit)
}

pub fn println(args: &[Value]) -> Result<Value, AislError> {
    println!("{}", string_of_value(&args[0]));
    Ok(Value::Unit)
}

pub fn read_line(_args: &[Value]) -> Result<Value, AislError> {
    let mut line = String::new();
    io::stdin().read_line(&mut line).map_err(|e| AislError::IoError(e.to_string()))?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::Str(line))
}

pub fn stdin_read_all(_args: &[Value]) -> Result<Value, AislError> {
    let mut out = String::new();
    io::stdin().read_to_string(&mut out).map_err(|e| AislError::IoError(e.to_string()))?;
    Ok(Value::Str(out))
}
