//! CLI command implementations.

mod ask;
mod chat;
mod chunks;
mod config;
mod serve;
mod summarize;
mod transcript;

pub use ask::run_ask;
pub use chat::run_chat;
pub use chunks::run_chunks;
pub use config::run_config;
pub use serve::{router, run_serve, AppState};
pub use summarize::run_summarize;
pub use transcript::run_transcript;

use crate::cli::Output;
use crate::error::YtqaError;
use tracing::warn;

/// Print a pipeline error for the terminal user.
fn report(error: &YtqaError) {
    if error.is_user_error() {
        Output::warning(&error.to_string());
    } else {
        warn!("{}", error);
        Output::error(&error.user_message());
    }
}
