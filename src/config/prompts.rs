//! Prompt templates for ytqa.
//!
//! The defaults target Granite-style role-delimited completion models and are
//! byte-for-byte the templates the hosted model was tuned against. They can be
//! replaced by placing `summary.toml` or `qa.toml` in the custom prompts
//! directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub summary: SummaryPrompt,
    pub qa: QaPrompt,
}

/// Prompt used to summarize a whole transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompt {
    /// Template with a `{{transcript}}` placeholder.
    pub template: String,
}

impl Default for SummaryPrompt {
    fn default() -> Self {
        Self {
            template: concat!(
                "\n",
                "    <|begin_of_text|><|start_header_id|>system<|end_header_id|>\n",
                "    You are an AI assistant tasked with summarizing YouTube video transcripts. Provide concise, informative summaries that capture the main points of the video content.\n",
                " \n",
                "    Instructions:\n",
                "    1. Summarize the transcript in a single concise paragraph.\n",
                "    2. Ignore any timestamps in your summary.\n",
                "    3. Focus on the spoken content (Text) of the video.\n",
                " \n",
                "    Note: In the transcript, \"Text\" refers to the spoken words in the video, and \"start\" indicates the timestamp when that part begins in the video.<|eot_id|><|start_header_id|>user<|end_header_id|>\n",
                "    Please summarize the following YouTube video transcript:\n",
                " \n",
                "    {{transcript}}<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n",
                "    ",
            )
            .to_string(),
        }
    }
}

/// Prompt used to answer a question from retrieved context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompt {
    /// Template with `{{context}}` and `{{question}}` placeholders.
    pub template: String,
}

impl Default for QaPrompt {
    fn default() -> Self {
        Self {
            template: concat!(
                "\n",
                "    <|begin_of_text|><|start_header_id|>system<|end_header_id|>\n",
                "    You are an expert assistant providing detailed and accurate answers based on the following video content. Your responses should be:\n",
                "    1. Precise and free from repetition\n",
                "    2. Consistent with the information provided in the video\n",
                "    3. Well-organized and easy to understand\n",
                "    4. Focused on addressing the user's question directly\n",
                "    If you encounter conflicting information in the video content, use your best judgment to provide the most likely correct answer based on context.\n",
                "    Note: In the transcript, \"Text\" refers to the spoken words in the video, and \"start\" indicates the timestamp when that part begins in the video.<|eot_id|>\n",
                " \n",
                "    <|start_header_id|>user<|end_header_id|>\n",
                "    Relevant Video Context: {{context}}\n",
                "    Based on the above context, please answer the following question:\n",
                "    {{question}}<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n",
                "    ",
            )
            .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, applying overrides from `custom_dir` when present.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Self::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }

            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is single-pass, so a transcript that happens to contain
    /// `{{question}}` is left alone.
    pub fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            result.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            match after.find("}}") {
                Some(close) => {
                    let key = &after[..close];
                    match vars.get(key) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after[close + 2..];
                }
                None => {
                    result.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Build the summarization prompt.
    pub fn summary_prompt(&self, transcript: &str) -> String {
        let vars = HashMap::from([("transcript", transcript)]);
        Self::render(&self.summary.template, &vars)
    }

    /// Build the question-answering prompt.
    pub fn qa_prompt(&self, context: &str, question: &str) -> String {
        let vars = HashMap::from([("context", context), ("question", question)]);
        Self::render(&self.qa.template, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let vars = HashMap::from([("name", "Alice"), ("count", "5")]);

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_leaves_unknown_and_injected_placeholders() {
        let vars = HashMap::from([("transcript", "say {{question}}")]);
        let result = Prompts::render("{{transcript}} / {{other}} / {{", &vars);
        assert_eq!(result, "say {{question}} / {{other}} / {{");
    }

    #[test]
    fn test_summary_prompt_is_exact() {
        let prompt = Prompts::default().summary_prompt("Text: hi Start: 0.0\n");
        assert!(prompt.starts_with(
            "\n    <|begin_of_text|><|start_header_id|>system<|end_header_id|>\n    You are an AI assistant"
        ));
        assert!(prompt.contains("video content.\n \n    Instructions:\n"));
        assert!(prompt.ends_with(
            "transcript:\n \n    Text: hi Start: 0.0\n<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n    "
        ));
    }

    #[test]
    fn test_qa_prompt_is_exact() {
        let prompt = Prompts::default().qa_prompt("CTX", "Why?");
        assert!(prompt.contains("in the video.<|eot_id|>\n \n    <|start_header_id|>user<|end_header_id|>\n"));
        assert!(prompt.ends_with(
            "    Relevant Video Context: CTX\n    Based on the above context, please answer the following question:\n    Why?<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n    "
        ));
    }

    #[test]
    fn test_custom_prompts_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("qa.toml"),
            "template = \"Q: {{question}} C: {{context}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str()).unwrap();
        assert_eq!(prompts.qa_prompt("c", "q"), "Q: q C: c");
        assert_eq!(prompts.summary.template, SummaryPrompt::default().template);
    }
}
