// ABOUTME: RFC 6455 handshake and frame codec shared by ws_accept/ws_connect/ws_send/ws_receive

use crate::error::AislError;
use base64::Engine;
use sha1::{Digest, Sha1};
use std::io::{BufRead, BufReader, Read, Write};

const MAGIC_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

pub const OPCODE_TEXT: u8 = 0x1;
pub const OPCODE_CLOSE: u8 = 0x8;
pub const OPCODE_PING: u8 = 0x9;
pub const OPCODE_PONG: u8 = 0xA;

fn accept_key(client_key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(client_key.as_bytes());
    hasher.update(MAGIC_GUID.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

/// Reads the HTTP upgrade request line-by-line until the blank line,
/// extracts `Sec-WebSocket-Key`, and writes the `101 Switching Protocols`
/// response.
pub fn server_handshake<S: Read + Write>(stream: &mut S) -> Result<(), AislError> {
    let mut reader = BufReader::new(&mut *stream);
    let mut client_key = None;
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).map_err(|e| AislError::IoError(e.to_string()))?;
        if n == 0 || line == "\r\n" || line == "\n" {
            break;
        }
        if let Some(rest) = line.to_ascii_lowercase().strip_prefix("sec-websocket-key:") {
            let _ = rest;
            if let Some(value) = line.splitn(2, ':').nth(1) {
                client_key = Some(value.trim().to_string());
            }
        }
    }
    let client_key = client_key.ok_or_else(|| AislError::Runtime("missing Sec-WebSocket-Key header".to_string()))?;
    let accept = accept_key(&client_key);
    let response = format!(
        "HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Accept: {accept}\r\n\r\n"
    );
    stream.write_all(response.as_bytes()).map_err(|e| AislError::IoError(e.to_string()))?;
    Ok(())
}

/// Sends the client upgrade request and consumes the response up to the
/// blank line. Response contents aren't validated beyond being readable —
/// a non-101 response still leaves the stream usable as a raw framed
/// connection.
pub fn client_handshake<S: Read + Write>(stream: &mut S, host: &str, path: &str) -> Result<(), AislError> {
    let key = base64::engine::general_purpose::STANDARD.encode(b"aisl-ws-key-0000");
    let request = format!(
        "GET {path} HTTP/1.1\r\nHost: {host}\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Key: {key}\r\nSec-WebSocket-Version: 13\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).map_err(|e| AislError::IoError(e.to_string()))?;

    let mut reader = BufReader::new(&mut *stream);
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).map_err(|e| AislError::IoError(e.to_string()))?;
        if n == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }
    Ok(())
}

/// Writes an unmasked frame with the given opcode, FIN=1, and the 7-bit /
/// 16-bit / 64-bit extended length encoding.
pub fn write_frame<S: Write>(stream: &mut S, opcode: u8, payload: &[u8]) -> Result<(), AislError> {
    let mut frame = Vec::with_capacity(payload.len() + 10);
    frame.push(0x80 | (opcode & 0x0F));
    let len = payload.len();
    if len < 126 {
        frame.push(len as u8);
    } else if len <= u16::MAX as usize {
        frame.push(126);
        frame.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        frame.push(127);
        frame.extend_from_slice(&(len as u64).to_be_bytes());
    }
    frame.extend_from_slice(payload);
    stream.write_all(&frame).map_err(|e| AislError::IoError(e.to_string()))
}

pub struct Frame {
    pub opcode: u8,
    pub payload: Vec<u8>,
}

fn read_exact<S: Read>(stream: &mut S, n: usize) -> Result<Vec<u8>, AislError> {
    let mut buf = vec![0u8; n];
    stream.read_exact(&mut buf).map_err(|e| AislError::IoError(e.to_string()))?;
    Ok(buf)
}

/// Reads one frame, unmasking the payload if the MASK bit is set (as it
/// always is for client-to-server frames).
pub fn read_frame<S: Read>(stream: &mut S) -> Result<Frame, AislError> {
    let header = read_exact(stream, 2)?;
    let opcode = header[0] & 0x0F;
    let masked = header[1] & 0x80 != 0;
    let mut len = (header[1] & 0x7F) as u64;

    if len == 126 {
        let ext = read_exact(stream, 2)?;
        len = u16::from_be_bytes([ext[0], ext[1]]) as u64;
    } else if len == 127 {
        let ext = read_exact(stream, 8)?;
        len = u64::from_be_bytes(ext.try_into().unwrap());
    }

    let mask_key = if masked { Some(read_exact(stream, 4)?) } else { None };
    let mut payload = read_exact(stream, len as usize)?;
    if let Some(key) = mask_key {
        for (i, byte) in payload.iter_mut().enumerate() {
            *byte ^= key[i % 4];
        }
    }
    Ok(Frame { opcode, payload })
}

/// Reads frames until a text frame yields a payload, a close frame yields
/// `""`, handling ping/pong transparently per the protocol.
pub fn receive_text<S: Read + Write>(stream: &mut S) -> Result<String, AislError> {
    loop {
        let frame = read_frame(stream)?;
        match frame.opcode {
            OPCODE_TEXT => return Ok(String::from_utf8_lossy(&frame.payload).into_owned()),
            OPCODE_CLOSE => return Ok(String::new()),
            OPCODE_PING => write_frame(stream, OPCODE_PONG, &frame.payload)?,
            OPCODE_PONG => {}
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_key_matches_rfc6455_example() {
        // RFC 6455 §1.3 worked example.
        assert_eq!(accept_key("dGhlIHNhbXBsZSBub25jZQ=="), "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
    }

    #[test]
    fn small_and_extended_frame_lengths_roundtrip() {
        for len in [10usize, 200, 70000] {
            let payload = vec![b'x'; len];
            let mut buf = Vec::new();
            write_frame(&mut buf, OPCODE_TEXT, &payload).unwrap();
            let mut cursor = std::io::Cursor::new(buf);
            let frame = read_frame(&mut cursor).unwrap();
            assert_eq!(frame.opcode, OPCODE_TEXT);
            assert_eq!(frame.payload.len(), len);
        }
    }

    #[test]
    fn masked_payload_is_unmasked_on_read() {
        let payload = b"hello".to_vec();
        let key = [1u8, 2, 3, 4];
        let mut masked_payload = payload.clone();
        for (i, b) in masked_payload.iter_mut().enumerate() {
            *b ^= key[i % 4];
        }
        let mut frame_bytes = vec![0x80 | OPCODE_TEXT, 0x80 | (payload.len() as u8)];
        frame_bytes.extend_from_slice(&key);
        frame_bytes.extend_from_slice(&masked_payload);
        let mut cursor = std::io::Cursor::new(frame_bytes);
        let frame = read_frame(&mut cursor).unwrap();
        assert_eq!(frame.payload, payload);
    }
}
