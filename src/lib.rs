//! ytqa - YouTube transcript summaries and question answering
//!
//! Fetches the English transcript of a YouTube video and hands it to an
//! OpenAI-compatible model endpoint.
//!
//! # Overview
//!
//! ytqa allows you to:
//! - Summarize a video from its full transcript
//! - Ask questions about a video, answered from the most relevant transcript chunks
//! - Serve both over a small HTTP API with per-client sessions
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt templates
//! - `transcript_source` - Caption track listing, selection and fetching
//! - `transcript` - Segment normalization
//! - `chunking` - Recursive character splitting
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory similarity search
//! - `rag` - Retrieval over transcript chunks
//! - `llm` - Text generation
//! - `session` - Per-conversation transcript cache
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use ytqa::config::Settings;
//! use ytqa::orchestrator::Orchestrator;
//! use ytqa::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!     let mut session = Session::new();
//!
//!     let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
//!     let summary = orchestrator.summarize(&mut session, Some(url)).await?;
//!     println!("{}", summary);
//!
//!     let answer = orchestrator
//!         .answer(&mut session, None, Some("Who is singing?"))
//!         .await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod session;
pub mod transcript;
pub mod transcript_source;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, YtqaError};
