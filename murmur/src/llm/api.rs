use std::time::Duration;

use serde_json::Value;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
        ResponseFormat,
    },
    Client,
};

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{MurmurError, Result},
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

/// How one failed chat call should be handled.
enum Disposition {
    /// Quota or rate-limit pushback; surfaced immediately so the webhook can
    /// report it rather than hammering the backend.
    RateLimited,
    /// Credential problem; retrying cannot help.
    AuthFailed,
    /// Transient upstream trouble worth another attempt.
    Transient,
    Fatal,
}

#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    model: String,
    max_retries: u32,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let (provider, model) = parse_llm_provider_model(&config.model);

        let local_backend = matches!(
            provider.to_lowercase().as_str(),
            "ollama" | "local" | "lmstudio"
        );
        if !local_backend && config.api_key.is_none() {
            return Err(MurmurError::Extraction(
                "API key required for this provider".to_string(),
            ));
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        // Local model names keep their full form; hosted ones drop the
        // provider prefix.
        let model = if provider.eq_ignore_ascii_case("local") {
            config.model.clone()
        } else {
            model.to_string()
        };

        let openai_config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                MurmurError::Extraction(format!("Failed to create LLM HTTP client: {error}"))
            })?;

        // Cap async-openai's internal backoff at our own timeout. Its default
        // max_elapsed_time retries 500s for up to 15 minutes, independent of
        // the retry loop in complete_json().
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(config.timeout_secs)),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            model,
            max_retries: config.max_retries,
        })
    }

    /// One extraction call: system instruction + user utterance, JSON-object
    /// response format, parsed into a `serde_json::Value`.
    pub async fn complete_json(&self, instruction: &str, input: &str) -> Result<Value> {
        if input.trim().is_empty() {
            return Err(MurmurError::Validation("Input cannot be empty".to_string()));
        }

        let mut last_error: Option<MurmurError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay_ms = 100 * 2_u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            let request = self.build_json_request(instruction, input)?;

            let error = match self.client.chat().create(request).await {
                Ok(response) => return parse_json_content(response),
                Err(error) => error,
            };

            match classify(&error) {
                Disposition::RateLimited => {
                    return Err(MurmurError::ExtractionRateLimit { retry_after: None })
                }
                Disposition::AuthFailed => {
                    return Err(MurmurError::Extraction(format!(
                        "Extraction authentication failed: {error}"
                    )))
                }
                Disposition::Transient if attempt < self.max_retries => {
                    last_error = Some(map_openai_error(error));
                }
                Disposition::Transient | Disposition::Fatal => {
                    return Err(map_openai_error(error))
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            MurmurError::Extraction("Extraction call failed after retries".to_string())
        }))
    }

    fn build_json_request(
        &self,
        instruction: &str,
        input: &str,
    ) -> Result<CreateChatCompletionRequest> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(instruction)
                .build()
                .map_err(|error| {
                    MurmurError::Validation(format!("Invalid system prompt: {error}"))
                })?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(input)
                .build()
                .map_err(|error| MurmurError::Validation(format!("Invalid user prompt: {error}")))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|error| MurmurError::Validation(format!("Invalid extraction request: {error}")))
    }
}

fn parse_json_content(response: CreateChatCompletionResponse) -> Result<Value> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| MurmurError::Extraction("Response contained no choices".to_string()))?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(MurmurError::Extraction("No intent detected".to_string()));
    }

    tracing::debug!(response_len = content.len(), "extraction response received");
    serde_json::from_str(&content).map_err(|e| {
        tracing::error!(
            response_preview = %content.chars().take(100).collect::<String>(),
            error = %e,
            "Failed to parse extraction response as JSON"
        );
        MurmurError::Extraction(format!("Failed to parse JSON response: {e}"))
    })
}

fn classify(error: &OpenAIError) -> Disposition {
    match error {
        OpenAIError::Reqwest(reqwest_error) => match reqwest_error.status() {
            Some(reqwest::StatusCode::TOO_MANY_REQUESTS) => Disposition::RateLimited,
            Some(reqwest::StatusCode::UNAUTHORIZED) | Some(reqwest::StatusCode::FORBIDDEN) => {
                Disposition::AuthFailed
            }
            Some(status) if status.is_server_error() => Disposition::Transient,
            Some(_) => Disposition::Fatal,
            None => Disposition::Transient,
        },
        OpenAIError::ApiError(api_error) => {
            if is_rate_limit_api_error(api_error) {
                Disposition::RateLimited
            } else if is_auth_api_error(api_error) {
                Disposition::AuthFailed
            } else if api_error.r#type.is_none() && api_error.code.is_none() {
                Disposition::Transient
            } else {
                Disposition::Fatal
            }
        }
        _ => Disposition::Fatal,
    }
}

fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
    let message = api_error.message.to_lowercase();
    let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
    let code = api_error.code.clone().unwrap_or_default().to_lowercase();

    message.contains("rate limit")
        || message.contains("too many requests")
        || error_type.contains("rate_limit")
        || code.contains("rate_limit")
        || code == "insufficient_quota"
}

fn is_auth_api_error(api_error: &ApiError) -> bool {
    let message = api_error.message.to_lowercase();
    let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
    let code = api_error.code.clone().unwrap_or_default().to_lowercase();

    message.contains("unauthorized")
        || message.contains("forbidden")
        || message.contains("authentication")
        || message.contains("invalid api key")
        || code.contains("invalid_api_key")
        || code.contains("authentication")
        || error_type.contains("authentication")
}

fn map_openai_error(error: OpenAIError) -> MurmurError {
    match error {
        OpenAIError::Reqwest(reqwest_error) => {
            MurmurError::Extraction(format!("Extraction request failed: {reqwest_error}"))
        }
        OpenAIError::ApiError(api_error) => {
            MurmurError::Extraction(format!("Extraction API error: {api_error}"))
        }
        OpenAIError::JSONDeserialize(err) => {
            MurmurError::Extraction(format!("Failed to parse extraction response: {err}"))
        }
        OpenAIError::InvalidArgument(message) => MurmurError::Validation(message),
        other => MurmurError::Extraction(other.to_string()),
    }
}

fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    fn test_llm_config() -> LlmConfig {
        LlmConfig {
            model: "ollama/llama3".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
            max_retries: 0,
        }
    }

    #[test]
    fn json_request_forces_json_object_format() {
        let config = test_llm_config();
        let client = LlmApiClient::new(&config).expect("client should be created");

        let request = client
            .build_json_request("extract the thing", "Send 5 To Bob")
            .expect("request should build");

        assert!(matches!(
            request.response_format,
            Some(ResponseFormat::JsonObject)
        ));
        assert_eq!(request.messages.len(), 2);
    }

    #[test]
    fn api_key_required_for_hosted_providers() {
        let config = LlmConfig {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
            max_retries: 0,
        };
        assert!(LlmApiClient::new(&config).is_err());
    }

    #[test]
    fn provider_default_base_urls() {
        assert_eq!(default_base_url("openai"), OPENAI_BASE_URL);
        assert_eq!(default_base_url("openrouter"), OPENROUTER_BASE_URL);
        assert_eq!(default_base_url("ollama"), OLLAMA_BASE_URL);
    }
}
