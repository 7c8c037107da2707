use crate::config::ModelConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model call timed out after {timeout_seconds}s ({attempts} attempt(s))")]
    Timeout { timeout_seconds: u64, attempts: u32 },
    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("model response carried no candidate text")]
    EmptyResponse,
}

/// The single seam the orchestrator needs from a text-generation backend.
pub trait ModelClient {
    fn complete(&self, prompt: &str) -> Result<String, ModelError>;
    fn model_name(&self) -> &str;
}

/// Bounded retry with exponential backoff. Failed attempt `i` (0-based)
/// sleeps `base_delay * 2^i` before the next try; the schedule is the same
/// for timeouts and for every other error.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Result<Self> {
        if attempts == 0 {
            bail!("retry_count must be at least 1");
        }
        Ok(Self {
            attempts,
            base_delay,
        })
    }

    /// Runs `op` up to `attempts` times. Sleeping is delegated to `sleep` so
    /// callers without a network (tests) can record delays instead of waiting.
    /// The last error propagates; a final timeout carries the attempt total.
    pub fn run<T>(
        &self,
        mut op: impl FnMut() -> Result<T, ModelError>,
        mut sleep: impl FnMut(Duration),
    ) -> Result<T, ModelError> {
        let mut attempt = 0u32;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.attempts {
                        return Err(match err {
                            ModelError::Timeout {
                                timeout_seconds, ..
                            } => ModelError::Timeout {
                                timeout_seconds,
                                attempts: attempt,
                            },
                            other => other,
                        });
                    }
                    let delay = self
                        .base_delay
                        .saturating_mul(2u32.saturating_pow(attempt - 1));
                    warn!(
                        "model call failed (attempt {attempt}/{}): {err}; retrying in {delay:?}",
                        self.attempts
                    );
                    sleep(delay);
                }
            }
        }
    }
}

// --- Gemini generateContent wire format ---

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

/// Blocking client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    cfg: ModelConfig,
    api_key: String,
    http: reqwest::blocking::Client,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(cfg: &ModelConfig) -> Result<Self> {
        let api_key = resolve_api_key(cfg)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()
            .context("building HTTP client")?;
        let retry = RetryPolicy::new(
            cfg.retry_count,
            Duration::from_secs(cfg.retry_delay_seconds),
        )?;
        Ok(Self {
            cfg: cfg.clone(),
            api_key,
            http,
            retry,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.cfg.api_base_url.trim_end_matches('/'),
            self.cfg.model,
            self.api_key
        )
    }

    fn send_once(&self, prompt: &str) -> Result<String, ModelError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.cfg.temperature,
                max_output_tokens: self.cfg.max_output_tokens,
                top_p: self.cfg.top_p,
                top_k: self.cfg.top_k,
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ModelError::Transport(format!("decoding response: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ModelError::EmptyResponse)
    }

    fn classify(&self, err: reqwest::Error) -> ModelError {
        if err.is_timeout() {
            ModelError::Timeout {
                timeout_seconds: self.cfg.timeout_seconds,
                attempts: 1,
            }
        } else {
            ModelError::Transport(err.to_string())
        }
    }
}

impl ModelClient for GeminiClient {
    fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        self.retry
            .run(|| self.send_once(prompt), std::thread::sleep)
    }

    fn model_name(&self) -> &str {
        &self.cfg.model
    }
}

pub fn resolve_api_key(cfg: &ModelConfig) -> Result<String> {
    if !cfg.api_key.is_empty() {
        return Ok(cfg.api_key.clone());
    }
    std::env::var(&cfg.api_key_env).with_context(|| {
        format!(
            "no API key: set [model].api_key or the {} environment variable",
            cfg.api_key_env
        )
    })
}
