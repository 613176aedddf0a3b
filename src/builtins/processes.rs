//! Subprocess spawning, non-blocking pipe reads, and the tagged pipe IPC
//! framing shared by `channel_send`/`channel_recv`.

use crate::error::AislError;
use crate::handles::{shared_fd, ChannelHandle, SharedFd};
use crate::value::Value;
use std::fs::File;
use std::io::{Read, Write};
use std::os::unix::io::{FromRawFd, IntoRawFd, RawFd};
use std::process::{Command, Stdio};
use std::time::Duration;

fn expect_str<'a>(v: &'a Value, name: &str) -> Result<&'a str, AislError> {
    match v {
        Value::Str(s) => Ok(s),
        other => Err(AislError::invalid_arguments(name, format!("expected string, got {}", other.kind_name()))),
    }
}

/// Runs `f` against the fd as a borrowed `File`, then hands the fd back
/// without letting `File`'s `Drop` close it — the `SharedFd`/`OwnedFd`
/// pair still owns it.
fn with_fd<R>(fd: RawFd, f: impl FnOnce(&mut File) -> std::io::Result<R>) -> std::io::Result<R> {
    let mut file = unsafe { File::from_raw_fd(fd) };
    let result = f(&mut file);
    let _ = file.into_raw_fd();
    result
}

fn set_nonblocking(fd: RawFd, nonblocking: bool) {
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL, 0);
        let flags = if nonblocking { flags | libc::O_NONBLOCK } else { flags & !libc::O_NONBLOCK };
        libc::fcntl(fd, libc::F_SETFL, flags);
    }
}

/// `(cmd)` ⇒ `Process(pid)`, no pipes. `(cmd, args)` ⇒ `Channel` wired to
/// the child's stdin/stdout.
pub fn process_spawn(args: &[Value]) -> Result<Value, AislError> {
    let cmd = expect_str(&args[0], "process_spawn")?;
    if args.len() == 1 {
        let child = Command::new(cmd)
            .spawn()
            .map_err(|e| AislError::IoError(e.to_string()))?;
        return Ok(Value::Process(child.id()));
    }

    let argv: Vec<String> = match &args[1] {
        Value::Array(items) => items
            .borrow()
            .iter()
            .map(|v| match v {
                Value::Str(s) => Ok(s.clone()),
                other => Err(AislError::invalid_arguments("process_spawn", format!("expected string arg, got {}", other.kind_name()))),
            })
            .collect::<Result<_, _>>()?,
        other => return Err(AislError::type_mismatch("array", other.kind_name())),
    };

    let mut child = Command::new(cmd)
        .args(&argv)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| AislError::IoError(e.to_string()))?;

    let pid = child.id();
    let stdin_fd = child.stdin.take().expect("stdin was piped").into_raw_fd();
    let stdout_fd = child.stdout.take().expect("stdout was piped").into_raw_fd();
    // The pipes are detached; `process_wait` reaps the pid via `waitpid`
    // rather than through this `Child` value, so it's fine to drop it here.
    drop(child);

    Ok(Value::Channel(ChannelHandle {
        write: shared_fd(stdin_fd),
        read: shared_fd(stdout_fd),
        pid: Some(pid),
    }))
}

pub fn process_write(args: &[Value]) -> Result<Value, AislError> {
    let data = expect_str(&args[1], "process_write")?;
    match &args[0] {
        Value::Channel(ch) => {
            let fd = ch.write.borrow().as_ref().map(|f| f.raw());
            let Some(fd) = fd else { return Ok(Value::Bool(false)) };
            Ok(Value::Bool(with_fd(fd, |f| f.write_all(data.as_bytes())).is_ok()))
        }
        other => Err(AislError::type_mismatch("channel", other.kind_name())),
    }
}

/// 50 ms bounded poll then a single non-blocking read of up to 4096 bytes.
pub fn process_read(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Channel(ch) => {
            let fd = ch.read.borrow().as_ref().map(|f| f.raw());
            let Some(fd) = fd else { return Ok(Value::Str(String::new())) };
            std::thread::sleep(Duration::from_millis(50));
            set_nonblocking(fd, true);
            let mut buf = [0u8; 4096];
            let n = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
            set_nonblocking(fd, false);
            if n <= 0 {
                return Ok(Value::Str(String::new()));
            }
            Ok(Value::Str(String::from_utf8_lossy(&buf[..n as usize]).into_owned()))
        }
        other => Err(AislError::type_mismatch("channel", other.kind_name())),
    }
}

fn reap(pid: u32) -> i32 {
    let mut status: i32 = 0;
    unsafe {
        libc::waitpid(pid as libc::pid_t, &mut status, 0);
    }
    if libc::WIFEXITED(status) {
        libc::WEXITSTATUS(status)
    } else {
        -1
    }
}

pub fn process_wait(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::Process(pid) => Ok(Value::Int(reap(*pid) as i64)),
        Value::Channel(ch) => {
            ch.write.borrow_mut().take();
            ch.read.borrow_mut().take();
            let pid = ch.pid.ok_or_else(|| AislError::Runtime("channel has no associated process".to_string()))?;
            Ok(Value::Int(reap(pid) as i64))
        }
        other => Err(AislError::type_mismatch("process or channel", other.kind_name())),
    }
}

pub fn process_kill(args: &[Value]) -> Result<Value, AislError> {
    match (&args[0], &args[1]) {
        (Value::Process(pid), Value::Int(sig)) => {
            Ok(Value::Bool(unsafe { libc::kill(*pid as libc::pid_t, *sig as i32) } == 0))
        }
        (a, b) => Err(AislError::invalid_arguments(
            "process_kill",
            format!("expected (process, int), got ({}, {})", a.kind_name(), b.kind_name()),
        )),
    }
}

pub fn process_exec(args: &[Value]) -> Result<Value, AislError> {
    let cmd = expect_str(&args[0], "process_exec")?;
    let status = Command::new("/bin/sh")
        .arg("-c")
        .arg(cmd)
        .status()
        .map_err(|e| AislError::IoError(e.to_string()))?;
    Ok(Value::Int(status.code().unwrap_or(-1) as i64))
}

pub fn channel_new(_args: &[Value]) -> Result<Value, AislError> {
    let mut fds = [0i32; 2];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        return Err(AislError::IoError("failed to create pipe".to_string()));
    }
    Ok(Value::Channel(ChannelHandle {
        read: shared_fd(fds[0]),
        write: shared_fd(fds[1]),
        pid: None,
    }))
}

fn tag_and_payload(v: &Value) -> Result<(u8, String), AislError> {
    match v {
        Value::Int(i) => Ok((b'i', i.to_string())),
        Value::Float(f) => Ok((b'f', f.to_string())),
        Value::Bool(b) => Ok((b'b', b.to_string())),
        Value::Str(s) => Ok((b's', s.clone())),
        other => Err(AislError::invalid_arguments("channel_send", format!("unsendable value type: {}", other.kind_name()))),
    }
}

fn channel_fd(v: &Value, end: impl Fn(&ChannelHandle) -> &SharedFd, name: &str) -> Result<RawFd, AislError> {
    match v {
        Value::Channel(ch) => end(ch)
            .borrow()
            .as_ref()
            .map(|f| f.raw())
            .ok_or_else(|| AislError::Runtime(format!("{name}: channel end already closed"))),
        other => Err(AislError::type_mismatch("channel", other.kind_name())),
    }
}

pub fn channel_send(args: &[Value]) -> Result<Value, AislError> {
    let fd = channel_fd(&args[0], |ch| &ch.write, "channel_send")?;
    let (tag, payload) = tag_and_payload(&args[1])?;
    let mut frame = Vec::with_capacity(5 + payload.len());
    let len = (1 + payload.len()) as u32;
    frame.extend_from_slice(&len.to_le_bytes());
    frame.push(tag);
    frame.extend_from_slice(payload.as_bytes());
    with_fd(fd, |f| f.write_all(&frame)).map_err(|e| AislError::IoError(e.to_string()))?;
    Ok(Value::Bool(true))
}

pub fn channel_recv(args: &[Value]) -> Result<Value, AislError> {
    let fd = channel_fd(&args[0], |ch| &ch.read, "channel_recv")?;
    with_fd(fd, |f| {
        let mut len_buf = [0u8; 4];
        f.read_exact(&mut len_buf)?;
        let len = u32::from_le_bytes(len_buf) as usize;
        let mut body = vec![0u8; len];
        f.read_exact(&mut body)?;
        Ok(body)
    })
    .map_err(|e| AislError::IoError(e.to_string()))
    .map(|body| decode_tagged(&body))
}

fn decode_tagged(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Str(String::new());
    }
    let tag = body[0];
    let payload = String::from_utf8_lossy(&body[1..]).into_owned();
    match tag {
        b'i' => payload.parse::<i64>().map(Value::Int).unwrap_or(Value::Str(payload)),
        b'f' => payload.parse::<f64>().map(Value::Float).unwrap_or(Value::Str(payload)),
        b'b' => payload.parse::<bool>().map(Value::Bool).unwrap_or(Value::Str(payload)),
        b's' => Value::Str(payload),
        _ => Value::Str(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_new_creates_distinct_fds() {
        let ch = channel_new(&[]).unwrap();
        if let Value::Channel(h) = ch {
            let read_fd = h.read.borrow().as_ref().unwrap().raw();
            let write_fd = h.write.borrow().as_ref().unwrap().raw();
            assert_ne!(read_fd, write_fd);
        } else {
            panic!("expected channel");
        }
    }

    #[test]
    fn send_then_recv_roundtrips_int() {
        let ch = channel_new(&[]).unwrap();
        channel_send(&[ch.clone(), Value::Int(42)]).unwrap();
        let result = channel_recv(&[ch]).unwrap();
        assert!(matches!(result, Value::Int(42)));
    }

    #[test]
    fn send_then_recv_roundtrips_string() {
        let ch = channel_new(&[]).unwrap();
        channel_send(&[ch.clone(), Value::Str("hello".into())]).unwrap();
        let result = channel_recv(&[ch]).unwrap();
        assert!(matches!(result, Value::Str(s) if s == "hello"));
    }

    #[test]
    fn decode_unknown_tag_degrades_to_string() {
        let mut body = vec![b'?'];
        body.extend_from_slice(b"raw");
        assert!(matches!(decode_tagged(&body), Value::Str(s) if s == "raw"));
    }
}
