//! Chunks command implementation.

use super::report;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::YtqaError;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;

/// Run the chunks command.
pub async fn run_chunks(url: &str, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;
    let mut session = Session::new();

    let spinner = Output::spinner("Fetching transcript...");
    let result = orchestrator.fetch_into(&mut session, url).await;
    spinner.finish_and_clear();

    if let Err(e) = result {
        report(&e);
        return Err(e.into());
    }

    let Some(text) = session.normalized_text() else {
        report(&YtqaError::NoTranscript);
        return Ok(());
    };

    let chunks = orchestrator.chunk(text);

    Output::header("Chunks");
    Output::kv("Chunk size", &settings.chunking.chunk_size.to_string());
    Output::kv("Overlap", &settings.chunking.chunk_overlap.to_string());
    Output::kv("Transcript", &format!("{} chars", text.chars().count()));

    for (index, chunk) in chunks.iter().enumerate() {
        Output::chunk(index, chunk);
    }

    println!();
    Output::success(&format!("{} chunks", chunks.len()));
    Ok(())
}
