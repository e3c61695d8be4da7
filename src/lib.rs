//! # Serial Ollama
//!
//! Reads one sensor value from a serial port and asks a locally hosted
//! language model about it.
//!
//! A run opens the serial port, waits a bounded time for one line, embeds the
//! line in a fixed instruction, sends it to an Ollama chat endpoint, and
//! reports the reply with the response time and host CPU/memory usage. The
//! reply is also written to a single output file that each run overwrites.
//!
//! ## Architecture
//!
//! The project is organized into the following modules:
//!
//! - [`serial`]: Bounded single-line serial reads
//! - [`llm`]: Chat-completion client abstraction and the Ollama client
//! - [`metrics`]: Host CPU and memory sampling
//! - [`pipeline`]: Prompt construction, reporting and output file
//! - [`config`]: Run configuration passed to every component
//! - [`interrupt`]: Ctrl-C handling shared by the run stages
//! - [`error`]: Custom error types for the application

pub mod config;
pub mod error;
pub mod interrupt;
pub mod llm;
pub mod metrics;
pub mod pipeline;
pub mod serial;

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::*;
    pub use crate::llm::{ChatClient, OllamaClient};
    pub use crate::metrics::{MetricsSampler, SysinfoSampler};
    pub use crate::pipeline::{PromptPipeline, PromptResult};
    pub use crate::serial::{Reading, SerialReader};
}
