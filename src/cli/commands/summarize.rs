//! Summarize command implementation.

use super::report;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(url: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Summarize, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(&settings)?;
    let mut session = Session::new();

    let spinner = Output::spinner("Fetching transcript and summarizing...");
    let result = orchestrator.summarize(&mut session, Some(url)).await;
    spinner.finish_and_clear();

    match result {
        Ok(summary) => {
            println!("\n{}\n", summary.trim());
            Ok(())
        }
        Err(e) => {
            report(&e);
            Err(e.into())
        }
    }
}
