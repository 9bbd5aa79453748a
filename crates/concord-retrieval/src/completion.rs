//! Remote-completion retrieval.
//!
//! Sends the query to a messages-style completion API and treats each line of
//! the model's reply as one passage. Scores are rank positions (0.0, 1.0, …),
//! keeping the ascending lower-is-better contract shared by all strategies.
//! HTTP failures and malformed responses surface as errors; there is no
//! retry or fallback.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use concord_core::config::CompletionConfig;
use concord_core::error::{ConcordError, Result};
use concord_core::types::{RetrievalStrategy, ScoredVerse};

use crate::Retriever;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Retriever that delegates passage selection to a remote completion API.
pub struct CompletionRetriever {
    http: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

#[derive(Serialize)]
struct CompletionMessage {
    role: &'static str,
    content: String,
}

impl CompletionRetriever {
    /// Create a retriever with an explicit API key.
    pub fn new(config: &CompletionConfig, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key,
        }
    }

    /// Create a retriever reading the API key from the configured
    /// environment variable. Fails (fatally, at startup) when unset.
    pub fn from_env(config: &CompletionConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ConcordError::Completion(format!(
                "Environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        Ok(Self::new(config, api_key))
    }

    fn system_prompt(k: usize) -> String {
        format!(
            "You are a scripture concordance. Given a piece of text, reply \
             with up to {} related passages, one per line, most relevant \
             first. Reply with the passages only, no commentary.",
            k
        )
    }
}

#[async_trait]
impl Retriever for CompletionRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredVerse>> {
        let url = format!("{}/v1/messages", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": Self::system_prompt(k),
            "messages": [CompletionMessage {
                role: "user",
                content: query.to_string(),
            }],
        });

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ConcordError::Completion(e.to_string()))?;

        let status = resp.status();
        let resp_body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ConcordError::Completion(e.to_string()))?;

        if !status.is_success() {
            return Err(ConcordError::Completion(format!(
                "API error {}: {}",
                status, resp_body
            )));
        }

        let passages = parse_completion_response(&resp_body, k)?;
        debug!(returned = passages.len(), requested = k, "Completion retrieval done");
        Ok(passages)
    }

    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Completion
    }
}

/// Extract up to `k` passages from a messages API response.
///
/// Concatenates the text blocks of `content`, then takes non-empty trimmed
/// lines in order, assigning each its rank as the score.
fn parse_completion_response(body: &serde_json::Value, k: usize) -> Result<Vec<ScoredVerse>> {
    let content = body["content"]
        .as_array()
        .ok_or_else(|| ConcordError::Completion("Missing content in response".to_string()))?;

    let text: String = content
        .iter()
        .filter(|block| block["type"].as_str() == Some("text"))
        .filter_map(|block| block["text"].as_str())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(k)
        .enumerate()
        .map(|(rank, line)| ScoredVerse {
            verse: line.to_string(),
            score: rank as f32,
        })
        .collect())
}
