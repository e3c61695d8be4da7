use log::{error, info};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};
use tokio_serial::SerialPortBuilderExt;
pub use tokio_serial::{DataBits, FlowControl, Parity, SerialStream, StopBits};

use crate::error::{Result, SerialOllamaError};

/// serial port baud rate
pub const COMMON_BAUD_RATES: &[u32] = &[
    4800, 9600, 19200, 38400, 57600, 115200, 230400, 460800, 500000, 576000, 921600, 1000000,
    1500000, 2000000,
];

/// Default device the sensor is attached to.
pub const DEFAULT_PORT_NAME: &str = "/dev/ttyUSB0";

/// Default baud rate of the sensor feed.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// serial port settings
#[derive(Clone, Debug, PartialEq)]
pub struct PortSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
    /// driver level timeout handed to the port builder
    pub timeout: Duration,
    /// upper bound on the wait for one complete line
    pub line_wait: Duration,
}

/// serial port settings implementation
impl PortSettings {
    /// serial port settings initialization
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        PortSettings {
            port_name: port_name.into(),
            baud_rate,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
            timeout: Duration::from_secs(1),
            line_wait: Duration::from_secs(30),
        }
    }

    /// replace the line wait
    #[must_use]
    pub fn with_line_wait(mut self, line_wait: Duration) -> Self {
        self.line_wait = line_wait;
        self
    }

    /// whether the baud rate is one of [`COMMON_BAUD_RATES`]
    pub fn is_common_baud_rate(&self) -> bool {
        COMMON_BAUD_RATES.contains(&self.baud_rate)
    }

    /// human readable frame description, e.g. `9600 8N1`
    pub fn describe(&self) -> String {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        let data_bits = match self.data_bits {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let stop_bits = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        format!("{} {data_bits}{parity}{stop_bits}", self.baud_rate)
    }
}

impl Default for PortSettings {
    fn default() -> Self {
        Self::new(DEFAULT_PORT_NAME, DEFAULT_BAUD_RATE)
    }
}

/// open serial port
pub fn open_port(settings: &PortSettings) -> Result<ScopedPort<SerialStream>> {
    match tokio_serial::new(settings.port_name.as_str(), settings.baud_rate)
        .data_bits(settings.data_bits)
        .parity(settings.parity)
        .stop_bits(settings.stop_bits)
        .flow_control(settings.flow_control)
        .timeout(settings.timeout)
        .open_native_async()
    {
        Ok(stream) => {
            info!("Opened serial port {} ({})", settings.port_name, settings.describe());
            Ok(ScopedPort::new(settings.port_name.clone(), stream))
        }
        Err(e) => {
            error!("Unable to open serial port {}: {}", settings.port_name, e);
            Err(SerialOllamaError::port_open(&settings.port_name, e.to_string()))
        }
    }
}

/// An open serial stream that logs its closure when dropped.
///
/// Dropping the wrapped stream releases the device, so every exit path out of
/// a read (success, error or interruption) closes the port.
pub struct ScopedPort<R> {
    port_name: String,
    stream: R,
}

impl<R> ScopedPort<R> {
    pub fn new(port_name: impl Into<String>, stream: R) -> Self {
        ScopedPort {
            port_name: port_name.into(),
            stream,
        }
    }

    /// get port name
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ScopedPort<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.stream).poll_read(cx, buf)
    }
}

impl<R> Drop for ScopedPort<R> {
    fn drop(&mut self) {
        info!("Serial port {} closed.", self.port_name);
    }
}
