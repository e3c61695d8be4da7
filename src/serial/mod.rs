//! # Serial Module
//!
//! Reads the one sensor line a run works with.
//!
//! [`SerialReader::read`] opens the configured port, waits a bounded time for
//! a newline-terminated line and decodes it. Serial failures (the port cannot
//! be opened, the wait times out, the stream fails) are reported on stdout and
//! produce an absent [`Reading`]; an interruption ends the wait cleanly the
//! same way. Only a line that is not valid UTF-8 fails the run.
//!
//! Once a port was opened, `Serial port closed.` is reported on the same
//! writer whichever way the read ended. [`ScopedPort`] additionally logs the
//! closure when it is dropped.

pub mod data;
pub mod encoding;
pub mod port;

use log::{info, warn};
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

pub use data::{ABSENT_READING, Reading};
pub use port::{PortSettings, ScopedPort, open_port};

use crate::error::{Result, SerialOllamaError};

/// Reads a single line from a serial endpoint.
pub struct SerialReader {
    settings: PortSettings,
}

impl SerialReader {
    pub fn new(settings: PortSettings) -> Self {
        SerialReader { settings }
    }

    /// get port settings
    pub fn settings(&self) -> &PortSettings {
        &self.settings
    }

    /// Opens the configured port and reads one reading from it.
    ///
    /// `interrupt` resolving before a line arrives aborts the wait.
    pub async fn read<F, W>(&self, interrupt: F, out: &mut W) -> Result<Reading>
    where
        F: Future<Output = ()>,
        W: Write,
    {
        let port = match open_port(&self.settings) {
            Ok(port) => port,
            Err(e) => {
                writeln!(out, "Serial Error: {e}")?;
                return Ok(Reading::absent());
            }
        };
        writeln!(
            out,
            "Connected to {} at {} baud.",
            self.settings.port_name, self.settings.baud_rate
        )?;
        self.read_from(port, interrupt, out).await
    }

    /// Reads one reading from an already open port, which is closed on return.
    pub async fn read_from<R, F, W>(
        &self,
        port: ScopedPort<R>,
        interrupt: F,
        out: &mut W,
    ) -> Result<Reading>
    where
        R: AsyncRead + Unpin,
        F: Future<Output = ()>,
        W: Write,
    {
        let result = read_line(port, &self.settings, interrupt).await;
        let reading = match result {
            Ok(line) => {
                writeln!(out, "Received: {line}")?;
                Ok(Reading::new(line))
            }
            Err(SerialOllamaError::Interrupted) => {
                warn!("Serial wait on {} interrupted", self.settings.port_name);
                writeln!(out, "\nExiting program...")?;
                Ok(Reading::absent())
            }
            Err(e) if e.is_serial_failure() => {
                writeln!(out, "Serial Error: {e}")?;
                Ok(Reading::absent())
            }
            Err(e) => Err(e),
        };
        // read_line has dropped the port by now
        writeln!(out, "Serial port closed.")?;
        reading
    }
}

/// Waits for one line on `port`, bounded by `settings.line_wait`.
///
/// The port is dropped, and so closed, before this returns.
pub async fn read_line<R, F>(
    port: ScopedPort<R>,
    settings: &PortSettings,
    interrupt: F,
) -> Result<String>
where
    R: AsyncRead + Unpin,
    F: Future<Output = ()>,
{
    let mut reader = BufReader::new(port);
    let mut buffer = Vec::new();
    let wait = settings.line_wait;

    let received = tokio::select! {
        biased;
        received = tokio::time::timeout(wait, reader.read_until(b'\n', &mut buffer)) => received,
        () = interrupt => return Err(SerialOllamaError::Interrupted),
    };

    match received {
        Err(_) => Err(SerialOllamaError::connection_timeout(&settings.port_name, wait)),
        Ok(Err(e)) => Err(SerialOllamaError::port_read(e.to_string())),
        Ok(Ok(0)) => Err(SerialOllamaError::port_read(format!(
            "{} closed before any data arrived",
            settings.port_name
        ))),
        Ok(Ok(n)) => {
            info!("Read {n} bytes from {}", settings.port_name);
            encoding::decode_line(&buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::pending;
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, DuplexStream};

    fn settings() -> PortSettings {
        PortSettings::new("mem0", 9600).with_line_wait(Duration::from_millis(50))
    }

    fn printed(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    /// Writing to the device side fails once the reader dropped its end.
    async fn assert_port_closed(mut device: DuplexStream) {
        let err = device.write_all(b"late data\n").await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_reader_keeps_settings() {
        let reader = SerialReader::new(settings());
        assert_eq!(reader.settings().port_name, "mem0");
        assert_eq!(reader.settings().line_wait, Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_port_closed_after_line() {
        let (mut device, host) = tokio::io::duplex(64);
        device.write_all(b"23.5\n").await.unwrap();
        let reader = SerialReader::new(settings());
        let mut out = Vec::new();
        let reading = reader
            .read_from(ScopedPort::new("mem0", host), pending(), &mut out)
            .await
            .unwrap();
        assert_eq!(reading.value(), Some("23.5"));
        assert_port_closed(device).await;
        assert_eq!(printed(out), "Received: 23.5\nSerial port closed.\n");
    }

    #[tokio::test]
    async fn test_port_closed_after_timeout() {
        let (device, host) = tokio::io::duplex(64);
        let reader = SerialReader::new(settings());
        let mut out = Vec::new();
        reader
            .read_from(ScopedPort::new("mem0", host), pending(), &mut out)
            .await
            .unwrap();
        assert_port_closed(device).await;
        assert!(printed(out).ends_with("Serial port closed.\n"));
    }

    #[tokio::test]
    async fn test_port_closed_after_interrupt() {
        let (device, host) = tokio::io::duplex(64);
        let reader = SerialReader::new(settings().with_line_wait(Duration::from_secs(60)));
        let mut out = Vec::new();
        reader
            .read_from(ScopedPort::new("mem0", host), async {}, &mut out)
            .await
            .unwrap();
        assert_port_closed(device).await;
        assert_eq!(printed(out), "\nExiting program...\nSerial port closed.\n");
    }

    #[tokio::test]
    async fn test_port_closed_after_decode_error() {
        let (mut device, host) = tokio::io::duplex(64);
        device.write_all(&[0xFF, 0xFE, b'\n']).await.unwrap();
        let reader = SerialReader::new(settings());
        let mut out = Vec::new();
        let err = reader
            .read_from(ScopedPort::new("mem0", host), pending(), &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, SerialOllamaError::Encoding(_)));
        assert_port_closed(device).await;
        assert_eq!(printed(out), "Serial port closed.\n");
    }

    #[tokio::test]
    async fn test_read_trims_line() {
        let reader = SerialReader::new(settings());
        let port = ScopedPort::new("mem0", &b"  23.5\r\n"[..]);
        let mut out = Vec::new();
        let reading = reader.read_from(port, pending(), &mut out).await.unwrap();
        assert_eq!(reading, Reading::new("23.5"));
        assert!(printed(out).contains("Received: 23.5"));
    }

    #[tokio::test]
    async fn test_read_only_first_line() {
        let reader = SerialReader::new(settings());
        let port = ScopedPort::new("mem0", &b"31.2\n99.9\n"[..]);
        let reading = reader.read_from(port, pending(), &mut Vec::new()).await.unwrap();
        assert_eq!(reading.value(), Some("31.2"));
    }

    #[tokio::test]
    async fn test_read_unterminated_line_at_eof() {
        let port = ScopedPort::new("mem0", &b"24.0"[..]);
        let line = read_line(port, &settings(), pending()).await.unwrap();
        assert_eq!(line, "24.0");
    }

    #[tokio::test]
    async fn test_read_times_out() {
        let (_writer, silent) = tokio::io::duplex(64);
        let port = ScopedPort::new("mem0", silent);
        let err = read_line(port, &settings(), pending()).await.unwrap_err();
        assert!(matches!(err, SerialOllamaError::ConnectionTimeout { .. }));
    }

    #[tokio::test]
    async fn test_timeout_reports_absence() {
        let (_writer, silent) = tokio::io::duplex(64);
        let reader = SerialReader::new(settings());
        let mut out = Vec::new();
        let reading = reader
            .read_from(ScopedPort::new("mem0", silent), pending(), &mut out)
            .await
            .unwrap();
        assert!(reading.is_absent());
        assert!(printed(out).starts_with("Serial Error: "));
    }

    #[tokio::test]
    async fn test_interrupt_is_clean_exit() {
        let (_writer, silent) = tokio::io::duplex(64);
        let reader = SerialReader::new(settings().with_line_wait(Duration::from_secs(60)));
        let mut out = Vec::new();
        let reading = reader
            .read_from(ScopedPort::new("mem0", silent), async {}, &mut out)
            .await
            .unwrap();
        assert!(reading.is_absent());
        assert!(printed(out).contains("Exiting program..."));
    }

    #[tokio::test]
    async fn test_closed_stream_reports_absence() {
        let reader = SerialReader::new(settings());
        let mut out = Vec::new();
        let reading = reader
            .read_from(ScopedPort::new("mem0", &b""[..]), pending(), &mut out)
            .await
            .unwrap();
        assert!(reading.is_absent());
        assert!(printed(out).contains("closed before any data arrived"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_fails_run() {
        let reader = SerialReader::new(settings());
        let port = ScopedPort::new("mem0", &[0xFFu8, 0xFE, b'\n'][..]);
        let err = reader
            .read_from(port, pending(), &mut Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SerialOllamaError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_open_failure_reports_absence() {
        let settings = PortSettings::new("/dev/serial-ollama-missing-port", 9600);
        let reader = SerialReader::new(settings);
        let mut out = Vec::new();
        let reading = reader.read(pending(), &mut out).await.unwrap();
        assert!(reading.is_absent());
        let out = printed(out);
        assert!(out.starts_with("Serial Error: "));
        assert!(out.contains("/dev/serial-ollama-missing-port"));
        assert!(!out.contains("Serial port closed."));
    }
}
