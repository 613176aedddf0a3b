//! `time_now` (Unix seconds) and `sleep` (blocks the whole interpreter —
//! there is no async runtime to hand control back to).

use crate::error::AislError;
use crate::value::Value;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn time_now(_args: &[Value]) -> Result<Value, AislError> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AislError::Runtime(e.to_string()))?
        .as_secs();
    Ok(Value::Int(secs as i64))
}

pub fn sleep(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Int(ms) if *ms >= 0 => {
            std::thread::sleep(Duration::from_millis(*ms as u64));
            Ok(Value::Unit)
        }
        other => Err(AislError::invalid_arguments("sleep", format!("expected non-negative int, got {other:?}"))),
    }
}
