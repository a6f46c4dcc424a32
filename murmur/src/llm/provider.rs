use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{MurmurError, Result};
use crate::llm::api::LlmApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

/// The structured-extraction capability: a cloneable handle over an
/// OpenAI-compatible chat-completions backend. Constructed once at startup
/// and injected into the webhook pipeline; when no backend is configured the
/// handle stays inert and every call reports the reason.
#[derive(Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    model: Option<String>,
    client: Option<LlmApiClient>,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided");
        };

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => match &config.base_url {
                Some(base_url) => LlmBackend::OpenAICompatible {
                    base_url: base_url.clone(),
                },
                None => {
                    return Self::unavailable(&format!(
                        "Unknown provider in model: {}",
                        config.model
                    ))
                }
            },
        };

        match LlmApiClient::new(config) {
            Ok(client) => Self {
                backend,
                model: Some(config.model.clone()),
                client: Some(client),
            },
            Err(error) => Self::unavailable(&error.to_string()),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            model: None,
            client: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    /// Configured model name, as given in `LLM_MODEL`.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Request a single JSON object from the model: `instruction` is the
    /// system message, `input` the user message.
    pub async fn complete_json(&self, instruction: &str, input: &str) -> Result<Value> {
        match &self.client {
            Some(client) => client.complete_json(instruction, input).await,
            None => Err(MurmurError::ExtractionUnavailable(self.unavailable_reason())),
        }
    }

    pub async fn complete_structured<T: DeserializeOwned>(
        &self,
        instruction: &str,
        input: &str,
    ) -> Result<T> {
        let json_value = self.complete_json(instruction, input).await?;

        serde_json::from_value(json_value)
            .map_err(|e| MurmurError::Extraction(format!("Failed to deserialize response: {e}")))
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "Extraction backend is not configured".to_string(),
        }
    }
}
