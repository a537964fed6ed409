use super::prompt::{build_prompt, strip_code_fences};
use super::{ExistingFile, GenerationService, GenerationServiceFactory};
use crate::context::settings::GenerationSettings;
use crate::error::GenerationError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const ERROR_BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn map_http_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::RequestFailed(format!("request timeout: {error}"))
    } else if error.is_connect() {
        GenerationError::RequestFailed(format!("connection error: {error}"))
    } else {
        GenerationError::Other(format!("HTTP error: {error}"))
    }
}

fn map_status_error(status: u16, body: &str) -> GenerationError {
    let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LIMIT).collect();
    match status {
        401 | 403 => GenerationError::AuthFailed(preview),
        429 => GenerationError::RateLimited(preview),
        404 => GenerationError::ModelNotFound(preview),
        _ => GenerationError::RequestFailed(format!("status {status}: {preview}")),
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    settings: GenerationSettings,
}

impl GeminiClient {
    pub fn new(api_key: String, settings: GenerationSettings) -> Result<Self, GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::AuthFailed("API key is empty".to_string()));
        }

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| GenerationError::Other(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(
        &self,
        description: &str,
        context: &str,
        use_high_quality_model: bool,
        existing_files: &[ExistingFile],
    ) -> Result<String, GenerationError> {
        let model = self.settings.model_for(use_high_quality_model);
        let prompt = build_prompt(description, context, existing_files);
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        tracing::debug!(model, prompt_len = prompt.len(), "sending generation request");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_status_error(status.as_u16(), &body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let parts = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default();
        if parts.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let content: String = parts.into_iter().filter_map(|part| part.text).collect();
        Ok(strip_code_fences(&content))
    }
}

/// Creates [`GeminiClient`]s from the configured settings.
pub struct GeminiServiceFactory {
    settings: GenerationSettings,
}

impl GeminiServiceFactory {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }
}

impl GenerationServiceFactory for GeminiServiceFactory {
    fn create(&self, credential: &str) -> Result<Arc<dyn GenerationService>, GenerationError> {
        let client = GeminiClient::new(credential.to_string(), self.settings.clone())?;
        Ok(Arc::new(client))
    }
}
