//! Transcript command implementation.

use super::report;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::YtqaError;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(url: &str, json: bool, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;
    let mut session = Session::new();

    let spinner = Output::spinner("Fetching transcript...");
    let result = orchestrator.fetch_into(&mut session, url).await;
    spinner.finish_and_clear();

    if let Err(e) = result {
        report(&e);
        return Err(e.into());
    }

    let Some(fetched) = session.transcript().filter(|_| session.is_fetched()) else {
        report(&YtqaError::NoTranscript);
        return Ok(());
    };

    if let Some(track) = &fetched.track {
        Output::note(&format!(
            "{} transcript, {}",
            if track.is_generated { "Generated" } else { "Manual" },
            track.display_language()
        ));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&fetched.segments)?);
    } else {
        print!("{}", fetched.normalized.text);
    }

    if fetched.normalized.skipped > 0 {
        Output::warning(&format!(
            "Skipped {} incomplete segments",
            fetched.normalized.skipped
        ));
    }

    Ok(())
}
