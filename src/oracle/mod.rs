//! Text-generation oracle capability.
//!
//! The tree builder and the narrative stage depend only on this seam: a
//! fixed prompt skeleton, deterministic parameter substitution, and a
//! single synchronous completion method. The shipped backend is an
//! Ollama-style REST client (`ollama`); tests substitute deterministic
//! stubs.

pub mod ollama;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Errors from the oracle subsystem.
#[derive(Debug, Error, Diagnostic)]
pub enum OracleError {
    #[error("oracle endpoint is not reachable at {url}")]
    #[diagnostic(
        code(fallwerk::oracle::unavailable),
        help("Start the server with `ollama serve` or point --base-url at a running instance.")
    )]
    Unavailable { url: String },

    #[error("oracle request failed: {message}")]
    #[diagnostic(
        code(fallwerk::oracle::request_failed),
        help("Check that the server is running and the model is pulled.")
    )]
    RequestFailed { message: String },

    #[error("failed to parse oracle response: {message}")]
    #[diagnostic(
        code(fallwerk::oracle::parse_error),
        help("The model backend returned an unexpected response format.")
    )]
    ParseError { message: String },
}

/// Sampling and decoding parameters for generation calls.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Model name to use.
    pub model: String,
    /// Higher values mean more random completions.
    pub temperature: f64,
    /// Nucleus-sampling parameter.
    pub top_p: f64,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "llama3.2".into(),
            temperature: 1.0,
            top_p: 1.0,
            max_tokens: 2_048,
        }
    }
}

/// Token accounting reported by the backend, when available.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// One oracle reply: generated text plus optional usage accounting.
#[derive(Debug, Clone)]
pub struct OracleReply {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

impl OracleReply {
    /// A reply carrying only text.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

/// Synchronous text-generation capability.
///
/// Implementations are assumed exception-free at the call site: a failed
/// call surfaces as an `Err` and propagates to the caller untouched.
pub trait Oracle {
    fn complete(&self, prompt: &str) -> Result<OracleReply, OracleError>;
}

/// Substitute `{name}` parameters into a prompt skeleton.
///
/// Substitution is purely textual and deterministic: each parameter value
/// is inserted verbatim wherever `{name}` occurs. Unknown placeholders are
/// left untouched.
pub fn render_prompt(skeleton: &str, params: &[(&str, &str)]) -> String {
    let mut out = skeleton.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
