//! Prompt templates and assembly.
//!
//! Every operation maps to one system instruction plus ordered user
//! texts. Assembly is the only place that decides what the backend sees,
//! so the transport layers never touch template strings.

use serde::Deserialize;

use crate::error::{MuninError, Result};
use crate::types::Operation;

/// System prompt templates, one per operation.
///
/// Deserialized straight from the `[prompts]` config section; the
/// defaults are usable as-is and deployments override individual fields.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptSet {
    #[serde(default = "default_translate")]
    pub translate: String,
    /// Used for translate requests that carry surrounding context. The
    /// wording tells the model the first user message is the context and
    /// the second is the text to translate; [`PromptSet::build`] relies
    /// on exactly that ordering.
    #[serde(default = "default_translate_with_context")]
    pub translate_with_context: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_summarize")]
    pub summarize: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            translate: default_translate(),
            translate_with_context: default_translate_with_context(),
            format: default_format(),
            summarize: default_summarize(),
        }
    }
}

fn default_translate() -> String {
    "You are a translation assistant. Translate the following text between \
     English and Chinese, replying with the translation only."
        .to_string()
}

fn default_translate_with_context() -> String {
    "You are a translation assistant. The first message is the surrounding \
     context, the second is the text to translate. Translate the text \
     between English and Chinese as it is used in that context, replying \
     with the translation only."
        .to_string()
}

fn default_format() -> String {
    "You are a text formatting assistant. Correct the spelling, spacing and \
     punctuation of the following text, replying with the corrected text \
     only."
        .to_string()
}

fn default_summarize() -> String {
    "You are a summarization assistant. Summarize the following text in a \
     few plain sentences, replying with the summary only."
        .to_string()
}

/// An assembled prompt: one system instruction plus ordered user texts.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub texts: Vec<String>,
}

impl PromptSet {
    /// Assemble the prompt for one request.
    ///
    /// Translate requests with a non-empty context use the context-aware
    /// template and send the context before the keyword. Context is
    /// ignored for format and summarize.
    pub fn build(&self, operation: Operation, keyword: &str, context: &str) -> Prompt {
        match operation {
            Operation::Translate if !context.is_empty() => Prompt {
                system: self.translate_with_context.clone(),
                texts: vec![context.to_string(), keyword.to_string()],
            },
            Operation::Translate => Prompt {
                system: self.translate.clone(),
                texts: vec![keyword.to_string()],
            },
            Operation::Format => Prompt {
                system: self.format.clone(),
                texts: vec![keyword.to_string()],
            },
            Operation::Summarize => Prompt {
                system: self.summarize.clone(),
                texts: vec![keyword.to_string()],
            },
        }
    }

    /// Reject empty templates before the server starts taking requests.
    pub fn validate(&self) -> Result<()> {
        for (name, template) in [
            ("translate", &self.translate),
            ("translate_with_context", &self.translate_with_context),
            ("format", &self.format),
            ("summarize", &self.summarize),
        ] {
            if template.trim().is_empty() {
                return Err(MuninError::Configuration(format!(
                    "prompt template '{name}' is empty"
                )));
            }
        }
        Ok(())
    }
}
