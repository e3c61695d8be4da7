//! # Pipeline Module
//!
//! Turns one [`Reading`] into a model reply.
//!
//! The reading is embedded verbatim in a fixed instruction, sent to the chat
//! client as a single user message, and the reply is reported together with
//! the response time and a host metrics sample before it is written to the
//! output file. The reply is opaque text: it is neither parsed nor checked
//! against the JSON shape the instruction asks for, and the alert decision is
//! left entirely to the model.

pub mod output;

use log::{debug, info, warn};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::error::{Result, SerialOllamaError};
use crate::llm::{ChatClient, ChatRequest};
use crate::metrics::{HostMetrics, MetricsSampler};
use crate::serial::Reading;

/// Builds the instruction sent to the model.
///
/// # Examples
///
/// ```
/// use serial_ollama::pipeline::build_prompt;
/// use serial_ollama::serial::Reading;
///
/// let prompt = build_prompt(&Reading::new("23.5"), 30.0);
/// assert!(prompt.contains("value as 23.5."));
/// assert!(prompt.contains("more than 30 degrees Celsius"));
/// ```
pub fn build_prompt(reading: &Reading, alert_threshold: f64) -> String {
    format!(
        "Return a JSON with key as 'temperature' and value as {reading}. \
         If the value is more than {alert_threshold} degrees Celsius, \
         the key 'alert' should be positive, else negative."
    )
}

/// Outcome of one successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptResult {
    pub reply: String,
    pub response_time: Duration,
    pub metrics: HostMetrics,
}

/// Sends a reading to the model and records the reply.
pub struct PromptPipeline<C, M> {
    client: C,
    sampler: M,
    model: String,
    alert_threshold: f64,
    output_path: PathBuf,
}

impl<C, M> PromptPipeline<C, M>
where
    C: ChatClient,
    M: MetricsSampler,
{
    pub fn new(config: &AppConfig, client: C, sampler: M) -> Self {
        PromptPipeline {
            client,
            sampler,
            model: config.llm.model.clone(),
            alert_threshold: config.alert_threshold,
            output_path: config.output_path.clone(),
        }
    }

    /// get output path
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Runs the prompt for `reading`, reporting progress on `out`.
    ///
    /// Any failure is returned before the output file is touched.
    pub async fn run<W: Write>(&self, reading: &Reading, out: &mut W) -> Result<PromptResult> {
        let prompt = build_prompt(reading, self.alert_threshold);
        debug!("Prompt: {prompt}");
        let request = ChatRequest::single_user(&self.model, prompt);

        let start = Instant::now();
        let reply = self.client.chat(&request).await?.into_content();
        let response_time = start.elapsed();
        info!("Model {} answered in {:.2}s", self.model, response_time.as_secs_f64());

        writeln!(out, "\nOllama Response:")?;
        writeln!(out, "{reply}")?;

        let metrics = self.sampler.sample().await?;
        writeln!(out, "\nMetrics:")?;
        writeln!(out, "Response Time: {:.2} seconds", response_time.as_secs_f64())?;
        writeln!(out, "{metrics}")?;

        output::write_reply(&self.output_path, &reply)?;

        Ok(PromptResult {
            reply,
            response_time,
            metrics,
        })
    }

    /// Like [`run`](Self::run), but gives up with
    /// [`SerialOllamaError::Interrupted`] once `interrupt` resolves.
    ///
    /// The output file is left alone when the run is interrupted before it is
    /// written.
    pub async fn run_until<W, F>(
        &self,
        reading: &Reading,
        interrupt: F,
        out: &mut W,
    ) -> Result<PromptResult>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = interrupt => {
                warn!("Prompt for model {} interrupted", self.model);
                Err(SerialOllamaError::Interrupted)
            }
            result = self.run(reading, out) => result,
        }
    }
}
