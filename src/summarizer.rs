//! Transcript summarization through Google Gemini.
//!
//! [`Summarizer::summarize`] never fails: when the provider is missing or
//! errors out the caller gets a degraded summary built from the first sentence
//! of the transcript, tagged with the reason.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use derive_more::Display;
use serde_derive::{Deserialize, Serialize};

pub const MAX_TRANSCRIPT_CHARS: usize = 3000;
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Display)]
pub enum ProviderError {
    #[display(fmt = "API key not configured")]
    MissingCredentials,
    #[display(fmt = "request failed: {}", _0)]
    Request(String),
    #[display(fmt = "provider returned {}: {}", _0, _1)]
    Status(u16, String),
    #[display(fmt = "provider returned no text")]
    EmptyResponse,
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Request(e.to_string())
    }
}

/// A text-completion backend: prompt in, generated text out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();
        let text = text.trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}

pub struct GeminiProvider {
    api_key: String,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(GeminiProvider {
            api_key: api_key.trim().to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredentials);
        }

        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status(status, body));
        }

        let parsed: GenerateResponse = res.json().await?;
        parsed.into_text().ok_or(ProviderError::EmptyResponse)
    }
}

/// Shared once per process; holds the provider client, if one is configured.
#[derive(Clone, Default)]
pub struct Summarizer {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Summarizer {
            provider: Some(provider),
        }
    }

    /// No provider: every summary takes the fallback path.
    pub fn unconfigured() -> Self {
        Summarizer::default()
    }

    pub async fn summarize(&self, transcript: &str) -> String {
        let Some(provider) = &self.provider else {
            log::warn!("summary requested but no AI provider is configured");
            return fallback_summary(transcript, &ProviderError::MissingCredentials);
        };

        log::info!("generating summary for {} chars of transcript", transcript.chars().count());
        match provider.complete(&build_prompt(transcript)).await {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => fallback_summary(transcript, &ProviderError::EmptyResponse),
            Err(e) => {
                log::error!("AI provider error: {e}");
                fallback_summary(transcript, &e)
            }
        }
    }
}

pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn build_prompt(transcript: &str) -> String {
    format!(
        "Please provide a concise 2-3 sentence summary of the following voice note text. \
         Focus on the main points and key ideas:\n\n{}",
        truncate(transcript, MAX_TRANSCRIPT_CHARS)
    )
}

pub fn fallback_summary(transcript: &str, error: &ProviderError) -> String {
    let first_sentence = transcript.split('.').next().unwrap_or_default().trim();
    format!("Summary: {first_sentence}. [AI error: {error}]")
}
