mod error;

use std::time::Duration;

use chat_core::ChatMessage;
use serde::{Deserialize, Serialize};
use url::Url;

pub use error::{ClientError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
pub struct CompletionClient {
    http: reqwest::blocking::Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}

impl CompletionClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    /// Sends the conversation and returns the assistant reply plus the token
    /// usage the endpoint reported, if any.
    pub fn send(&self, messages: &[ChatMessage], model: &str) -> Result<Completion> {
        let url = self.endpoint.join("chat/completions")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest { model, messages })
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        parse_completion(response.json()?)
    }
}

// A base URL without a trailing slash would lose its last path segment on
// join, so force one.
fn normalize_endpoint(endpoint: &str) -> Result<Url> {
    if endpoint.ends_with('/') {
        Ok(Url::parse(endpoint)?)
    } else {
        Ok(Url::parse(&format!("{endpoint}/"))?)
    }
}

fn parse_completion(response: ChatResponse) -> Result<Completion> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ClientError::EmptyChoices)?;
    let usage = response.usage.map(|usage| TokenUsage {
        input_tokens: usage.prompt_tokens.unwrap_or(0),
        output_tokens: usage.completion_tokens.unwrap_or(0),
    });
    Ok(Completion {
        content: choice.message.content.unwrap_or_default(),
        usage,
    })
}
