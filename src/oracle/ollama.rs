//! Ollama-backed oracle over the synchronous REST API.
//!
//! Sends `/api/generate` requests with `stream: false`; the reply's
//! `response` field is the generated text, `prompt_eval_count` and
//! `eval_count` the usage accounting.

use std::time::Duration;

use super::{GenerationConfig, Oracle, OracleError, OracleReply, TokenUsage};

/// Connection settings for the Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            timeout_secs: 120,
        }
    }
}

/// Oracle implementation talking to an Ollama server.
pub struct OllamaOracle {
    config: OllamaConfig,
    generation: GenerationConfig,
}

impl OllamaOracle {
    pub fn new(config: OllamaConfig, generation: GenerationConfig) -> Self {
        Self { config, generation }
    }

    /// Check that the server answers a lightweight tags request.
    ///
    /// Call once before kicking off a run; `complete` itself does not
    /// re-probe.
    pub fn probe(&self) -> Result<(), OracleError> {
        let url = format!("{}/api/tags", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(5))
            .build();

        match agent.get(&url).call() {
            Ok(resp) if resp.status() == 200 => Ok(()),
            _ => Err(OracleError::Unavailable {
                url: self.config.base_url.clone(),
            }),
        }
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.generation.model
    }
}

impl Oracle for OllamaOracle {
    fn complete(&self, prompt: &str) -> Result<OracleReply, OracleError> {
        let url = format!("{}/api/generate", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build();

        let body = serde_json::json!({
            "model": self.generation.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.generation.temperature,
                "top_p": self.generation.top_p,
                "num_predict": self.generation.max_tokens,
            },
        });

        let body_str = serde_json::to_string(&body).map_err(|e| OracleError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| OracleError::RequestFailed {
                message: e.to_string(),
            })?;

        let resp_str = resp.into_string().map_err(|e| OracleError::ParseError {
            message: e.to_string(),
        })?;

        let json: serde_json::Value =
            serde_json::from_str(&resp_str).map_err(|e| OracleError::ParseError {
                message: e.to_string(),
            })?;

        let text = json["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| OracleError::ParseError {
                message: "missing 'response' field".into(),
            })?;

        let usage = match (
            json["prompt_eval_count"].as_u64(),
            json["eval_count"].as_u64(),
        ) {
            (None, None) => None,
            (prompt_tokens, completion_tokens) => Some(TokenUsage {
                prompt_tokens: prompt_tokens.unwrap_or(0),
                completion_tokens: completion_tokens.unwrap_or(0),
            }),
        };

        Ok(OracleReply { text, usage })
    }
}

impl std::fmt::Debug for OllamaOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaOracle")
            .field("base_url", &self.config.base_url)
            .field("model", &self.generation.model)
            .finish()
    }
}
