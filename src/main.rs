use std::io::Write;
use std::process::ExitCode;

use log::{error, info};
use serial_ollama::interrupt;
use serial_ollama::prelude::*;

/// Exit status of a run stopped by Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT: u8 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logger();

    let config = AppConfig::default();
    let result = run(&config).await;

    match &result {
        Err(SerialOllamaError::Interrupted) => report("\nExiting program..."),
        Err(e) => {
            error!("Run failed: {e}");
            report(&format!("An error occurred: {e}"));
        }
        Ok(_) => {}
    }
    report("Execution completed.");

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(SerialOllamaError::Interrupted) => ExitCode::from(INTERRUPTED_EXIT),
        Err(_) => ExitCode::FAILURE,
    }
}

/// Prints a closing line; stdout failures can only be logged at this point.
fn report(line: &str) {
    report_to(&mut std::io::stdout(), line);
}

fn report_to<W: Write>(out: &mut W, line: &str) -> bool {
    match writeln!(out, "{line}") {
        Ok(()) => true,
        Err(e) => {
            error!("Unable to print \"{line}\": {e}");
            false
        }
    }
}

async fn run(config: &AppConfig) -> Result<PromptResult> {
    config.validate()?;
    let mut stdout = std::io::stdout();

    let reader = SerialReader::new(config.serial.clone());
    let reading = reader.read(interrupt::ctrl_c(), &mut stdout).await?;
    match reading.value() {
        Some(value) => writeln!(stdout, "From DHT11: {value}")?,
        None => writeln!(stdout, "No data received from DHT11.")?,
    }

    let pipeline = PromptPipeline::new(
        config,
        OllamaClient::new(&config.llm),
        SysinfoSampler::new(config.cpu_sample_interval),
    );
    let result = pipeline
        .run_until(&reading, interrupt::ctrl_c(), &mut stdout)
        .await?;
    info!("Reply saved to {}", pipeline.output_path().display());
    Ok(result)
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
