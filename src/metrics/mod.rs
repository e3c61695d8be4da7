//! # Metrics Module
//!
//! Point-in-time host utilization reported next to the model reply.

use async_trait::async_trait;
use log::debug;
use std::fmt;
use std::time::Duration;
use sysinfo::System;

use crate::error::{Result, SerialOllamaError};

/// Default window the CPU usage is averaged over.
pub const DEFAULT_CPU_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Host CPU and memory utilization, in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostMetrics {
    pub cpu_percent: f32,
    pub memory_percent: f64,
}

impl fmt::Display for HostMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CPU Usage: {:.1}%", self.cpu_percent)?;
        write!(f, "Memory Usage: {:.1}%", self.memory_percent)
    }
}

/// Source of [`HostMetrics`] samples.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsSampler: Send + Sync {
    async fn sample(&self) -> Result<HostMetrics>;
}

/// Samples the host through `sysinfo`.
pub struct SysinfoSampler {
    cpu_interval: Duration,
}

impl SysinfoSampler {
    pub fn new(cpu_interval: Duration) -> Self {
        SysinfoSampler {
            // sysinfo needs at least this long between refreshes for a usable delta
            cpu_interval: cpu_interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    /// get cpu sample interval
    pub fn cpu_interval(&self) -> Duration {
        self.cpu_interval
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_SAMPLE_INTERVAL)
    }
}

#[async_trait]
impl MetricsSampler for SysinfoSampler {
    async fn sample(&self) -> Result<HostMetrics> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SerialOllamaError::metrics(
                "host metrics are not supported on this platform",
            ));
        }

        let mut sys = System::new();
        sys.refresh_cpu_usage();
        tokio::time::sleep(self.cpu_interval).await;
        sys.refresh_cpu_usage();
        let cpu_percent = sys.global_cpu_usage();

        sys.refresh_memory();
        let memory_percent = memory_percent(sys.used_memory(), sys.total_memory())?;

        debug!("Sampled cpu {cpu_percent:.1}% memory {memory_percent:.1}%");
        Ok(HostMetrics {
            cpu_percent,
            memory_percent,
        })
    }
}

/// Share of `total` that is `used`, in percent.
pub fn memory_percent(used: u64, total: u64) -> Result<f64> {
    if total == 0 {
        return Err(SerialOllamaError::metrics("total memory reported as zero"));
    }
    Ok(used as f64 / total as f64 * 100.0)
}
