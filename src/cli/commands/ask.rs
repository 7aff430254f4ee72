//! Ask command implementation.

use super::report;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(url: &str, question: &str, show_context: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(&settings)?;
    let mut session = Session::new();

    let spinner = Output::spinner("Fetching transcript and searching...");
    let result = orchestrator
        .answer_with_context(&mut session, Some(url), Some(question))
        .await;
    spinner.finish_and_clear();

    let answer = match result {
        Ok(answer) => answer,
        Err(e) => {
            report(&e);
            return Err(e.into());
        }
    };

    println!("\n{}\n", answer.text.trim());

    if show_context {
        Output::header("Context");
        for chunk in &answer.context {
            Output::context(chunk.order, chunk.score, &chunk.content);
        }
    }

    Ok(())
}
