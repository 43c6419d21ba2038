pub mod openai;
pub mod prompt_builder;
mod prompts;

use crate::error::GenerationError;
use crate::generation::GenerationResult;
use prompt_builder::PromptPair;

/// Trait for talking to an LLM (real backend or dummy).
pub trait LlmClient {
    /// One request/response cycle turning the prompts into a PR title and description.
    fn generate_pr(&self, prompts: &PromptPair) -> Result<GenerationResult, GenerationError>;
}

/// Dummy client for development with --no-model.
pub struct NoopClient;

impl LlmClient for NoopClient {
    fn generate_pr(&self, prompts: &PromptPair) -> Result<GenerationResult, GenerationError> {
        let mut description = String::from("Dummy PR description for testing (LLM disabled)\n\n");
        description.push_str("```text\n");
        description.push_str(prompts.user.trim_end());
        description.push_str("\n```\n");

        Ok(GenerationResult {
            title: "Dummy PR title".to_string(),
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_client_echoes_prompt() {
        let prompts = PromptPair {
            system: "sys".into(),
            user: "Commits:\n1. fix bug\n".into(),
        };
        let result = NoopClient.generate_pr(&prompts).unwrap();
        assert_eq!(result.title, "Dummy PR title");
        assert!(result.description.contains("1. fix bug"));
    }
}
