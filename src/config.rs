//! # Config Module
//!
//! All parameters of a run, gathered in one value that is handed to the
//! serial reader and the prompt pipeline.

use log::warn;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SerialOllamaError};
use crate::llm::LlmSettings;
use crate::metrics::DEFAULT_CPU_SAMPLE_INTERVAL;
use crate::serial::PortSettings;

/// Temperature above which the model is asked to raise the alert.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 30.0;

/// File the model reply is written to.
pub const DEFAULT_OUTPUT_PATH: &str = "OutputOllama.txt";

/// Run configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub serial: PortSettings,
    pub llm: LlmSettings,
    pub alert_threshold: f64,
    pub output_path: PathBuf,
    pub cpu_sample_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            serial: PortSettings::default(),
            llm: LlmSettings::default(),
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            cpu_sample_interval: DEFAULT_CPU_SAMPLE_INTERVAL,
        }
    }
}

impl AppConfig {
    /// Checks the configuration before anything is opened.
    pub fn validate(&self) -> Result<()> {
        if self.serial.port_name.trim().is_empty() {
            return Err(SerialOllamaError::invalid_config("serial port name is empty"));
        }
        if self.serial.baud_rate == 0 {
            return Err(SerialOllamaError::invalid_config("baud rate must be positive"));
        }
        if self.serial.line_wait.is_zero() {
            return Err(SerialOllamaError::invalid_config("line wait must be positive"));
        }
        if !self.serial.is_common_baud_rate() {
            warn!("Unusual baud rate {} for {}", self.serial.baud_rate, self.serial.port_name);
        }
        if self.llm.host.trim().is_empty() {
            return Err(SerialOllamaError::invalid_config("chat host is empty"));
        }
        if self.llm.model.trim().is_empty() {
            return Err(SerialOllamaError::invalid_config("model name is empty"));
        }
        if !self.alert_threshold.is_finite() {
            return Err(SerialOllamaError::invalid_config(format!(
                "alert threshold {} is not a finite number",
                self.alert_threshold
            )));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(SerialOllamaError::invalid_config("output path is empty"));
        }
        Ok(())
    }
}
