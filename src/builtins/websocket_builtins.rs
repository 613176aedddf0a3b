//! `ws_accept`, `ws_connect`, `ws_send`, `ws_receive`, `ws_close` — thin
//! wrappers over the framing/handshake logic in [`crate::websocket`].

use crate::error::AislError;
use crate::handles::{SocketHandle, WsStream};
use crate::value::Value;
use crate::websocket;
use std::cell::RefCell;
use std::rc::Rc;

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

pub fn ws_accept(args: &[Value]) -> Result<Value, AislError> {
    let mut transport = match &args[0] {
        Value::Socket(sock) => match sock.borrow_mut().take() {
            Some(SocketHandle::Stream(s)) => WsStream::Plain(s),
            _ => return Err(AislError::Runtime("ws_accept: expected a connected stream socket".to_string())),
        },
        Value::TlsSocket(tls) => match tls.borrow_mut().take() {
            Some(s) => WsStream::Tls(Box::new(s)),
            None => return Err(AislError::Runtime("ws_accept: tls socket already closed".to_string())),
        },
        other => return Err(AislError::type_mismatch("socket", other.kind_name())),
    };
    websocket::server_handshake(&mut transport)?;
    Ok(Value::WsSocket(Rc::new(RefCell::new(Some(transport)))))
}

pub fn ws_connect(args: &[Value]) -> Result<Value, AislError> {
    let host = expect_str(&args[0], "ws_connect")?;
    let port = expect_int(&args[1], "ws_connect")?;
    let path = expect_str(&args[2], "ws_connect")?;
    let stream = std::net::TcpStream::connect((host, port as u16)).map_err(|e| AislError::IoError(e.to_string()))?;
    let mut transport = WsStream::Plain(stream);
    websocket::client_handshake(&mut transport, host, path)?;
    Ok(Value::WsSocket(Rc::new(RefCell::new(Some(transport)))))
}

pub fn ws_send(args: &[Value]) -> Result<Value, AislError> {
    let msg = expect_str(&args[1], "ws_send")?;
    match &args[0] {
        Value::WsSocket(ws) => {
            let mut borrowed = ws.borrow_mut();
            let stream = borrowed.as_mut().ok_or_else(|| AislError::Runtime("ws_send: socket closed".to_string()))?;
            websocket::write_frame(stream, websocket::OPCODE_TEXT, msg.as_bytes())?;
            Ok(Value::Unit)
        }
        other => Err(AislError::type_mismatch("ws-socket", other.kind_name())),
    }
}

pub fn ws_receive(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::WsSocket(ws) => {
            let mut borrowed = ws.borrow_mut();
            let stream = borrowed.as_mut().ok_or_else(|| AislError::Runtime("ws_receive: socket closed".to_string()))?;
            Ok(Value::Str(websocket::receive_text(stream)?))
        }
        other => Err(AislError::type_mismatch("ws-socket", other.kind_name())),
    }
}

pub fn ws_close(args: &[Value]) -> Result<Value, AislError> {
    match &args[0] {
        Value::WsSocket(ws) => {
            if let Some(stream) = ws.borrow_mut().as_mut() {
                let _ = websocket::write_frame(stream, websocket::OPCODE_CLOSE, &[]);
            }
            ws.borrow_mut().take();
            Ok(Value::Unit)
        }
        other => Err(AislError::type_mismatch("ws-socket", other.kind_name())),
    }
}
