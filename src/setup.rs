use log::debug;

use crate::error::GenerationError;
use crate::llm::openai::OpenAiClient;
use crate::llm::{LlmClient, NoopClient};
use crate::profiles::CredentialProfile;

/// Build the LLM client for the active profile, or the dummy one with `--no-model`.
pub fn build_llm_client(
    profile: &CredentialProfile,
    no_model: bool,
) -> Result<Box<dyn LlmClient>, GenerationError> {
    if no_model {
        debug!("Model disabled; using NoopClient");
        return Ok(Box::new(NoopClient));
    }

    debug!(
        "Using OpenAiClient with profile {:?}, model {} at {}",
        profile.name, profile.model, profile.base_url
    );
    Ok(Box::new(OpenAiClient::new(profile)?))
}
