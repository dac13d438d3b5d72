use std::io::{self, Read, Write};
use std::mem;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::time::Duration;

use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::{Result, TransportError};
use crate::sys;

/// A connected RFCOMM stream — implements Read + Write.
///
/// Created by [`RfcommStream::connect`]. The underlying descriptor is
/// owned by the stream and closed when it is dropped, on every exit path.
pub struct RfcommStream {
    fd: OwnedFd,
}

impl RfcommStream {
    /// Connect to a remote device and channel (blocking).
    ///
    /// Fails if the remote is unreachable, not paired, or refuses the
    /// channel. There is no retry; the error propagates to the caller.
    pub fn connect(endpoint: &Endpoint) -> Result<Self> {
        let fd = rfcomm_socket()?;

        let sa = sys::sockaddr_from_endpoint(endpoint);
        // SAFETY: `sa` is a fully initialized sockaddr_rc and the length
        // argument matches its size; `fd` is an open socket descriptor
        // owned by this call.
        let rc = unsafe {
            libc::connect(
                fd.as_raw_fd(),
                (&sa as *const sys::sockaddr_rc).cast::<libc::sockaddr>(),
                mem::size_of::<sys::sockaddr_rc>() as libc::socklen_t,
            )
        };
        if rc != 0 {
            return Err(TransportError::Connect {
                endpoint: *endpoint,
                source: io::Error::last_os_error(),
            });
        }

        debug!(%endpoint, "connected to rfcomm endpoint");
        Ok(Self { fd })
    }

    /// The endpoint of the connected peer.
    pub fn peer_addr(&self) -> Result<Endpoint> {
        let mut sa = sys::sockaddr_rc {
            rc_family: 0,
            rc_bdaddr: sys::bdaddr_t { b: [0; 6] },
            rc_channel: 0,
        };
        let mut len = mem::size_of::<sys::sockaddr_rc>() as libc::socklen_t;

        // SAFETY: `sa` and `len` are valid writable pointers for the
        // provided sizes, and the descriptor is an open socket owned by
        // this stream.
        let rc = unsafe {
            libc::getpeername(
                self.fd.as_raw_fd(),
                (&mut sa as *mut sys::sockaddr_rc).cast::<libc::sockaddr>(),
                &mut len,
            )
        };
        if rc != 0 {
            return Err(TransportError::Io(io::Error::last_os_error()));
        }

        Ok(sys::endpoint_from_sockaddr(&sa))
    }

    /// Set a send timeout on the stream via `SO_SNDTIMEO`.
    ///
    /// `None` leaves writes fully blocking (the default). With a timeout
    /// armed, a write that stalls past the deadline fails with
    /// `WouldBlock`.
    pub fn set_send_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        let tv = match timeout {
            Some(d) => libc::timeval {
                tv_sec: d.as_secs() as libc::time_t,
                tv_usec: d.subsec_micros() as libc::suseconds_t,
            },
            // Zero disables the timeout.
            None => libc::timeval {
                tv_sec: 0,
                tv_usec: 0,
            },
        };

        // SAFETY: `tv` is a fully initialized timeval and the length
        // argument matches its size; the descriptor is an open socket
        // owned by this stream.
        let rc = unsafe {
            libc::setsockopt(
                self.fd.as_raw_fd(),
                libc::SOL_SOCKET,
                libc::SO_SNDTIMEO,
                (&tv as *const libc::timeval).cast::<libc::c_void>(),
                mem::size_of::<libc::timeval>() as libc::socklen_t,
            )
        };
        if rc != 0 {
            return Err(TransportError::Io(io::Error::last_os_error()));
        }
        Ok(())
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "bluetooth-rfcomm"
    }
}

impl Read for RfcommStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // SAFETY: `buf` is a valid writable region of the given length and
        // the descriptor is an open socket owned by this stream.
        let n = unsafe {
            libc::read(
                self.fd.as_raw_fd(),
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }
}

impl Write for RfcommStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // SAFETY: `buf` is a valid readable region of the given length and
        // the descriptor is an open socket owned by this stream.
        let n = unsafe {
            libc::write(
                self.fd.as_raw_fd(),
                buf.as_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        // Socket writes are not buffered in userspace.
        Ok(())
    }
}

impl std::fmt::Debug for RfcommStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RfcommStream")
            .field("fd", &self.fd.as_raw_fd())
            .finish()
    }
}

/// Probe whether this system can create RFCOMM sockets at all.
///
/// Creates and immediately closes a socket without connecting anywhere.
pub fn rfcomm_available() -> Result<()> {
    rfcomm_socket().map(drop)
}

fn rfcomm_socket() -> Result<OwnedFd> {
    // SAFETY: plain socket(2) call; the returned descriptor is checked
    // before use.
    let fd = unsafe {
        libc::socket(
            libc::AF_BLUETOOTH,
            libc::SOCK_STREAM | libc::SOCK_CLOEXEC,
            sys::BTPROTO_RFCOMM,
        )
    };
    if fd < 0 {
        let source = io::Error::last_os_error();
        return Err(match source.raw_os_error() {
            Some(libc::EAFNOSUPPORT) | Some(libc::EPROTONOSUPPORT) => {
                TransportError::Unsupported(source)
            }
            _ => TransportError::Socket(source),
        });
    }
    // SAFETY: `fd` is a freshly created, open descriptor not owned by
    // anything else.
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}
