//! # Interrupt Module
//!
//! Ctrl-C as a future the run stages race against.

use log::error;

/// Resolves on the next Ctrl-C.
///
/// Installing the listener replaces the default SIGINT behavior for the rest
/// of the process, so every stage that can block must race against one of
/// these. If the listener cannot be installed this never resolves.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
