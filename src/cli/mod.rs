//! CLI module for ytqa.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// ytqa - Summarize YouTube videos and ask questions about them
///
/// Fetches a video's English transcript and sends it to an OpenAI-compatible
/// model endpoint, either whole for a summary or as retrieved chunks for
/// question answering.
#[derive(Parser, Debug)]
#[command(name = "ytqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a video
    Summarize {
        /// Video URL (https://www.youtube.com/watch?v=...)
        url: String,
    },

    /// Ask a single question about a video
    Ask {
        /// Video URL (https://www.youtube.com/watch?v=...)
        url: String,

        /// The question to ask
        question: String,

        /// Also print the retrieved context chunks
        #[arg(long)]
        show_context: bool,
    },

    /// Start an interactive session for one or more videos
    Chat {
        /// Video to load before the first question
        url: Option<String>,
    },

    /// Print the normalized transcript of a video
    Transcript {
        /// Video URL (https://www.youtube.com/watch?v=...)
        url: String,

        /// Print the raw segments as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Show how a video's transcript is split into chunks
    Chunks {
        /// Video URL (https://www.youtube.com/watch?v=...)
        url: String,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from([
            "ytqa",
            "-vv",
            "ask",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "what is it about?",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Ask { url, question, show_context } => {
                assert!(url.ends_with("dQw4w9WgXcQ"));
                assert_eq!(question, "what is it about?");
                assert!(!show_context);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_chat_without_url() {
        let cli = Cli::parse_from(["ytqa", "chat"]);
        assert!(matches!(cli.command, Commands::Chat { url: None }));
    }
}
