use std::io::{BufRead, ErrorKind, Write};
use std::time::Duration;

use bytes::BytesMut;
use tracing::{debug, info};

use crate::error::{RelayError, Result};

/// Reserved input line that terminates the relay loop.
///
/// Compared exactly: case variants and whitespace-padded variants do not
/// terminate.
pub const SENTINEL: &str = "quit";

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Relay loop configuration.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Input line that ends the loop. Exact match, case sensitive.
    pub sentinel: String,
    /// Append a trailing `\n` to each transmitted line.
    pub append_newline: bool,
    /// Send timeout applied when the relay is constructed over an RFCOMM
    /// stream. `None` keeps writes fully blocking.
    pub send_timeout: Option<Duration>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            sentinel: SENTINEL.to_string(),
            append_newline: false,
            send_timeout: None,
        }
    }
}

/// Why the relay loop exited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// The sentinel line was read.
    Sentinel,
    /// The input stream ended before the sentinel arrived.
    InputExhausted,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitReason::Sentinel => "sentinel",
            ExitReason::InputExhausted => "input-exhausted",
        }
    }
}

/// Totals for a completed relay run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelaySummary {
    pub lines_sent: u64,
    pub bytes_sent: u64,
    pub exit: ExitReason,
}

/// Forwards input lines to any `Write` sink until the sentinel.
pub struct Relay<W> {
    sink: W,
    buf: BytesMut,
    config: RelayConfig,
}

impl<W: Write> Relay<W> {
    /// Create a relay with default configuration.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, RelayConfig::default())
    }

    /// Create a relay with explicit configuration.
    pub fn with_config(sink: W, config: RelayConfig) -> Self {
        Self {
            sink,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Run the loop: read one line at a time (blocking), transmit its
    /// UTF-8 bytes, stop on the sentinel or on end-of-input.
    ///
    /// The sentinel line itself is never transmitted. End-of-input is a
    /// normal exit, reported as [`ExitReason::InputExhausted`].
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<RelaySummary> {
        let mut line = String::new();
        let mut lines_sent = 0u64;
        let mut bytes_sent = 0u64;

        loop {
            line.clear();
            let n = input.read_line(&mut line).map_err(RelayError::Input)?;
            if n == 0 {
                info!(lines_sent, bytes_sent, "input exhausted, closing relay");
                return Ok(RelaySummary {
                    lines_sent,
                    bytes_sent,
                    exit: ExitReason::InputExhausted,
                });
            }

            strip_line_terminator(&mut line);
            if line == self.config.sentinel {
                info!(lines_sent, bytes_sent, "sentinel received, closing relay");
                return Ok(RelaySummary {
                    lines_sent,
                    bytes_sent,
                    exit: ExitReason::Sentinel,
                });
            }

            let sent = self.send_line(&line)?;
            lines_sent += 1;
            bytes_sent += sent as u64;
        }
    }

    /// Encode and transmit a single line.
    ///
    /// Completes short writes. `Interrupted` is retried; `WouldBlock` is
    /// a transmission failure — with a send timeout armed it is the
    /// timeout firing, and without one a blocking sink never returns it.
    fn send_line(&mut self, line: &str) -> Result<usize> {
        self.buf.clear();
        self.buf.extend_from_slice(line.as_bytes());
        if self.config.append_newline {
            self.buf.extend_from_slice(b"\n");
        }

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.sink.write(&self.buf[offset..]) {
                Ok(0) => return Err(RelayError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(RelayError::Transmission(err)),
            }
        }

        self.flush()?;
        debug!(bytes = self.buf.len(), "line transmitted");
        Ok(self.buf.len())
    }

    /// Flush the underlying sink.
    fn flush(&mut self) -> Result<()> {
        loop {
            match self.sink.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(RelayError::Transmission(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consume the relay and return the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Current relay configuration.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

#[cfg(target_os = "linux")]
impl Relay<btline_transport::RfcommStream> {
    /// Create a relay over an RFCOMM stream and apply the configured send
    /// timeout to the socket.
    pub fn with_config_rfcomm(
        stream: btline_transport::RfcommStream,
        config: RelayConfig,
    ) -> std::result::Result<Self, btline_transport::TransportError> {
        stream.set_send_timeout(config.send_timeout)?;
        Ok(Self::with_config(stream, config))
    }
}

/// Remove the trailing `\n` (and a preceding `\r`, if any) left by
/// `read_line`. Interior or leading whitespace is preserved.
fn strip_line_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Records each write call separately, preserving boundaries.
    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<Vec<u8>>,
        flushes: usize,
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn run_relay(input: &str) -> (RelaySummary, Vec<Vec<u8>>) {
        let mut relay = Relay::new(RecordingSink::default());
        let summary = relay.run(Cursor::new(input.to_string())).unwrap();
        (summary, relay.into_inner().writes)
    }

    #[test]
    fn transmits_exact_utf8_bytes() {
        let (summary, writes) = run_relay("hello\nquit\n");
        assert_eq!(writes, vec![b"hello".to_vec()]);
        assert_eq!(summary.lines_sent, 1);
        assert_eq!(summary.bytes_sent, 5);
        assert_eq!(summary.exit, ExitReason::Sentinel);
    }

    #[test]
    fn only_exact_sentinel_terminates() {
        let (summary, writes) = run_relay("Quit\nQUIT\n quit\nquit\n");
        assert_eq!(
            writes,
            vec![b"Quit".to_vec(), b"QUIT".to_vec(), b" quit".to_vec()]
        );
        assert_eq!(summary.exit, ExitReason::Sentinel);
    }

    #[test]
    fn sentinel_line_is_not_transmitted() {
        let (summary, writes) = run_relay("quit\n");
        assert!(writes.is_empty());
        assert_eq!(summary.lines_sent, 0);
        assert_eq!(summary.bytes_sent, 0);
        assert_eq!(summary.exit, ExitReason::Sentinel);
    }

    #[test]
    fn writes_arrive_in_input_order() {
        let (summary, writes) = run_relay("hello\nworld\nquit\n");
        assert_eq!(writes, vec![b"hello".to_vec(), b"world".to_vec()]);
        assert_eq!(summary.lines_sent, 2);
        assert_eq!(summary.bytes_sent, 10);
    }

    #[test]
    fn lines_after_sentinel_are_ignored() {
        let (summary, writes) = run_relay("quit\nhello\n");
        assert!(writes.is_empty());
        assert_eq!(summary.exit, ExitReason::Sentinel);
    }

    #[test]
    fn input_exhaustion_exits_gracefully() {
        let (summary, writes) = run_relay("hello\n");
        assert_eq!(writes, vec![b"hello".to_vec()]);
        assert_eq!(summary.exit, ExitReason::InputExhausted);
    }

    #[test]
    fn final_line_without_terminator_is_transmitted() {
        let (summary, writes) = run_relay("hello");
        assert_eq!(writes, vec![b"hello".to_vec()]);
        assert_eq!(summary.exit, ExitReason::InputExhausted);
    }

    #[test]
    fn crlf_terminator_is_stripped() {
        let (summary, writes) = run_relay("hello\r\nquit\r\n");
        assert_eq!(writes, vec![b"hello".to_vec()]);
        assert_eq!(summary.exit, ExitReason::Sentinel);
    }

    #[test]
    fn interior_carriage_return_is_preserved() {
        let (_, writes) = run_relay("he\rllo\nquit\n");
        assert_eq!(writes, vec![b"he\rllo".to_vec()]);
    }

    #[test]
    fn empty_line_counts_but_sends_nothing() {
        let (summary, writes) = run_relay("\nquit\n");
        assert!(writes.is_empty());
        assert_eq!(summary.lines_sent, 1);
        assert_eq!(summary.bytes_sent, 0);
    }

    #[test]
    fn append_newline_adds_one_terminator() {
        let config = RelayConfig {
            append_newline: true,
            ..RelayConfig::default()
        };
        let mut relay = Relay::with_config(RecordingSink::default(), config);
        let summary = relay.run(Cursor::new("hello\nquit\n")).unwrap();
        assert_eq!(relay.into_inner().writes, vec![b"hello\n".to_vec()]);
        assert_eq!(summary.bytes_sent, 6);
    }

    #[test]
    fn deterministic_across_runs() {
        let first = run_relay("alpha\nbeta\nquit\n");
        let second = run_relay("alpha\nbeta\nquit\n");
        assert_eq!(first.1, second.1);
        assert_eq!(first.0, second.0);
    }

    #[test]
    fn custom_sentinel_is_honored() {
        let config = RelayConfig {
            sentinel: "EXIT".to_string(),
            ..RelayConfig::default()
        };
        let mut relay = Relay::with_config(RecordingSink::default(), config);
        let summary = relay.run(Cursor::new("quit\nEXIT\n")).unwrap();
        assert_eq!(relay.into_inner().writes, vec![b"quit".to_vec()]);
        assert_eq!(summary.exit, ExitReason::Sentinel);
    }

    #[test]
    fn short_writes_are_completed() {
        struct OneBytePerCall {
            data: Vec<u8>,
            calls: usize,
        }

        impl Write for OneBytePerCall {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.calls += 1;
                self.data.push(buf[0]);
                Ok(1)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let sink = OneBytePerCall {
            data: Vec::new(),
            calls: 0,
        };
        let mut relay = Relay::new(sink);
        let summary = relay.run(Cursor::new("hello\nquit\n")).unwrap();
        let sink = relay.into_inner();
        assert_eq!(sink.data, b"hello");
        assert_eq!(sink.calls, 5);
        assert_eq!(summary.bytes_sent, 5);
    }

    #[test]
    fn interrupted_write_is_retried() {
        struct InterruptedOnce {
            interrupted: bool,
            data: Vec<u8>,
        }

        impl Write for InterruptedOnce {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut relay = Relay::new(InterruptedOnce {
            interrupted: false,
            data: Vec::new(),
        });
        relay.run(Cursor::new("hello\nquit\n")).unwrap();
        assert_eq!(relay.into_inner().data, b"hello");
    }

    #[test]
    fn zero_length_write_is_connection_closed() {
        struct ZeroWriter;

        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut relay = Relay::new(ZeroWriter);
        let err = relay.run(Cursor::new("hello\nquit\n")).unwrap_err();
        assert!(matches!(err, RelayError::ConnectionClosed));
    }

    #[test]
    fn would_block_write_is_transmission_error() {
        struct BlockedWriter;

        impl Write for BlockedWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(ErrorKind::WouldBlock))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut relay = Relay::new(BlockedWriter);
        let err = relay.run(Cursor::new("hello\nquit\n")).unwrap_err();
        assert!(matches!(err, RelayError::Transmission(_)));
    }

    #[test]
    fn input_error_propagates() {
        struct FailingReader;

        impl std::io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("tty gone"))
            }
        }

        let mut relay = Relay::new(RecordingSink::default());
        let err = relay
            .run(std::io::BufReader::new(FailingReader))
            .unwrap_err();
        assert!(matches!(err, RelayError::Input(_)));
        assert!(relay.get_ref().writes.is_empty());
    }

    #[test]
    fn each_line_is_flushed() {
        let mut relay = Relay::new(RecordingSink::default());
        relay.run(Cursor::new("a\nb\nquit\n")).unwrap();
        assert_eq!(relay.get_ref().flushes, 2);
    }

    #[test]
    fn strip_line_terminator_variants() {
        for (input, expected) in [
            ("hello\n", "hello"),
            ("hello\r\n", "hello"),
            ("hello", "hello"),
            ("hello\r", "hello\r"),
            ("\n", ""),
            ("", ""),
        ] {
            let mut line = input.to_string();
            strip_line_terminator(&mut line);
            assert_eq!(line, expected, "input {input:?}");
        }
    }
}
