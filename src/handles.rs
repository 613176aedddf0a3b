// ABOUTME: OS resource handles backing sockets, WebSocket transports, and subprocess channels

use std::cell::RefCell;
use std::net::TcpStream;
use std::net::TcpListener;
use std::os::unix::io::RawFd;
use std::rc::Rc;

/// A raw file descriptor that closes itself on drop. Used for bare pipe ends
/// (`channel_new`) and for subprocess stdio pipes detached from `Child`.
/// Explicit `*_close`/`process_wait` calls take the fd out first, so the
/// drop glue only fires as a backstop against leaking fds from a panicking
/// script.
#[derive(Debug)]
pub struct OwnedFd(RawFd);

impl OwnedFd {
    pub fn new(fd: RawFd) -> Self {
        OwnedFd(fd)
    }

    pub fn raw(&self) -> RawFd {
        self.0
    }
}

impl Drop for OwnedFd {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.0);
        }
    }
}

pub type SharedFd = Rc<RefCell<Option<OwnedFd>>>;

pub fn shared_fd(fd: RawFd) -> SharedFd {
    Rc::new(RefCell::new(Some(OwnedFd::new(fd))))
}

/// Either end of a plain TCP socket: a listening socket (produced by
/// `tcp_listen`) or a connected stream (`tcp_connect`/`tcp_accept`).
#[derive(Debug)]
pub enum SocketHandle {
    Listener(TcpListener),
    Stream(TcpStream),
}

pub type SharedSocket = Rc<RefCell<Option<SocketHandle>>>;

/// The transport underlying a `VWsSocket`: a WebSocket frame layer runs over
/// either a plain or a TLS-wrapped stream.
pub enum WsStream {
    Plain(TcpStream),
    Tls(Box<native_tls::TlsStream<TcpStream>>),
}

impl std::io::Read for WsStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            WsStream::Plain(s) => s.read(buf),
            WsStream::Tls(s) => s.read(buf),
        }
    }
}

impl std::io::Write for WsStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            WsStream::Plain(s) => s.write(buf),
            WsStream::Tls(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            WsStream::Plain(s) => s.flush(),
            WsStream::Tls(s) => s.flush(),
        }
    }
}

pub type SharedWsStream = Rc<RefCell<Option<WsStream>>>;

/// A subprocess/pipe channel: a write end, a read end, and (for
/// `process_spawn`) the child's pid so `process_wait` can reap it.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    pub write: SharedFd,
    pub read: SharedFd,
    pub pid: Option<u32>,
}
