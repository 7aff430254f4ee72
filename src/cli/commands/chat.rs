//! Interactive chat command.
//!
//! Keeps one [`Session`] for the whole conversation, so with the default
//! fetch policies a loaded video is reused for every question until another
//! one is loaded with `/load`.

use super::report;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// A line of chat input.
#[derive(Debug, PartialEq)]
enum ChatInput<'a> {
    Empty,
    Exit,
    Clear,
    Load(&'a str),
    Summarize,
    Status,
    Question(&'a str),
}

impl<'a> ChatInput<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return Self::Exit;
        }
        match line.split_once(char::is_whitespace) {
            Some(("/load", url)) => Self::Load(url.trim()),
            _ => match line {
                "/clear" => Self::Clear,
                "/summarize" => Self::Summarize,
                "/status" => Self::Status,
                _ => Self::Question(line),
            },
        }
    }
}

/// Run the interactive chat command.
pub async fn run_chat(url: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(&settings)?;
    let mut session = Session::new();
    let mut current_url = url;

    if let Some(url) = &current_url {
        load(&orchestrator, &mut session, url).await;
    }

    println!("\n{}", style("ytqa chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask questions, or use /load <url>, /summarize, /status, /clear. Type 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match ChatInput::parse(&line) {
            ChatInput::Empty => continue,
            ChatInput::Exit => {
                Output::info("Goodbye!");
                break;
            }
            ChatInput::Clear => {
                session.clear();
                current_url = None;
                Output::info("Transcript cleared.");
            }
            ChatInput::Load(url) => {
                if load(&orchestrator, &mut session, url).await {
                    current_url = Some(url.to_string());
                }
            }
            ChatInput::Status => {
                let status = session.status();
                Output::kv("Video", status.video_id.as_deref().unwrap_or("none"));
                Output::kv("Language", status.language.as_deref().unwrap_or("none"));
                Output::kv("Segments", &status.segments.to_string());
                Output::kv("Characters", &status.characters.to_string());
            }
            ChatInput::Summarize => {
                let spinner = Output::spinner("Summarizing...");
                let result = orchestrator.summarize(&mut session, current_url.as_deref()).await;
                spinner.finish_and_clear();
                print_reply(result);
            }
            ChatInput::Question(question) => {
                let spinner = Output::spinner("Thinking...");
                let result = orchestrator
                    .answer(&mut session, current_url.as_deref(), Some(question))
                    .await;
                spinner.finish_and_clear();
                print_reply(result);
            }
        }
    }

    Ok(())
}

/// Fetch `url` into the session. A failed fetch keeps the previous transcript.
async fn load(orchestrator: &Orchestrator, session: &mut Session, url: &str) -> bool {
    let spinner = Output::spinner("Fetching transcript...");
    let result = orchestrator.fetch_into(session, url).await;
    spinner.finish_and_clear();

    match result {
        Ok(()) if session.is_fetched() => {
            let status = session.status();
            Output::success(&format!(
                "Loaded {} ({}, {} segments)",
                status.video_id.unwrap_or_default(),
                status.language.unwrap_or_default(),
                status.segments
            ));
            true
        }
        Ok(()) => {
            report(&crate::error::YtqaError::NoTranscript);
            true
        }
        Err(e) => {
            report(&e);
            false
        }
    }
}

fn print_reply(result: crate::error::Result<String>) {
    match result {
        Ok(reply) => println!("\n{} {}\n", style("ytqa:").cyan().bold(), reply.trim()),
        Err(e) => report(&e),
    }
}
