use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use super::{AgentError, Agents};
use crate::config::LlmConfig;

const FEASIBILITY_PROMPT: &str = "You review requirements for small command-line tools. \
The tool must be implementable as a single Python file using only the standard library. \
Answer YES if the requirements are clear and small enough to implement that way, otherwise answer NO. \
Reply with YES or NO on the first line.";

const GENERATION_PROMPT: &str = "You write single-file Python command-line applications. \
Use argparse for arguments and only the Python standard library. \
Return only the complete program inside one ```python code block.";

const VERIFICATION_PROMPT: &str = "You review Python command-line applications against their requirements. \
Answer YES if the program fully and correctly implements every requirement, otherwise answer NO. \
Reply with YES or NO on the first line.";

const REWRITE_PROMPT: &str = "You refine requirements for Python command-line applications. \
Given the requirements and a program that failed review, rewrite the requirements so they are \
precise, unambiguous and address what the program got wrong. Return only the rewritten requirements.";

static FENCED_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n(.*?)```").ok());

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Agent capabilities backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct LlmAgents {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

impl LlmAgents {
    pub fn new(config: &LlmConfig) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        })
    }

    async fn complete(&self, system: &str, user: String) -> Result<String, AgentError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let content = parse_completion(&body)?;
        debug!(model = %self.model, chars = content.len(), "Model completion received");
        Ok(content)
    }
}

#[async_trait]
impl Agents for LlmAgents {
    async fn evaluate_feasibility(&self, requirements: &str) -> Result<bool, AgentError> {
        let answer = self
            .complete(FEASIBILITY_PROMPT, format!("Requirements:\n{requirements}"))
            .await?;
        parse_verdict(&answer)
    }

    async fn generate_script(&self, requirements: &str) -> Result<String, AgentError> {
        let answer = self
            .complete(GENERATION_PROMPT, format!("Requirements:\n{requirements}"))
            .await?;
        Ok(extract_code(&answer))
    }

    async fn verify_script(&self, requirements: &str, script: &str) -> Result<bool, AgentError> {
        let answer = self
            .complete(
                VERIFICATION_PROMPT,
                format!("Requirements:\n{requirements}\n\nProgram:\n```python\n{script}\n```"),
            )
            .await?;
        parse_verdict(&answer)
    }

    async fn rewrite_requirements(
        &self,
        requirements: &str,
        script: &str,
    ) -> Result<String, AgentError> {
        let answer = self
            .complete(
                REWRITE_PROMPT,
                format!("Requirements:\n{requirements}\n\nRejected program:\n```python\n{script}\n```"),
            )
            .await?;
        Ok(answer.trim().to_string())
    }
}

/// Pull the first choice's text out of a chat completions response body.
pub fn parse_completion(body: &str) -> Result<String, AgentError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AgentError::MalformedResponse(format!("invalid completion body: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(AgentError::EmptyResponse);
    }
    Ok(content)
}

/// Read a YES/NO verdict from the first non-empty line of a model answer.
pub fn parse_verdict(answer: &str) -> Result<bool, AgentError> {
    let first = answer
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or(AgentError::EmptyResponse)?;

    let word: String = first
        .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    match word.to_ascii_uppercase().as_str() {
        "YES" => Ok(true),
        "NO" => Ok(false),
        _ => Err(AgentError::MalformedResponse(format!(
            "expected YES or NO, got '{first}'"
        ))),
    }
}

/// Strip a surrounding fenced code block, if the answer has one.
pub fn extract_code(answer: &str) -> String {
    FENCED_BLOCK
        .as_ref()
        .and_then(|re| re.captures(answer))
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str())
        .unwrap_or(answer)
        .trim()
        .to_string()
}
