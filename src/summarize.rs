use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SUMMARY_PROMPT: &str = "Given a text containing complex information about a specific topic, your role is to act as an expert summarizer with 20 years experience.

Summarize the following transcript, focusing on the most important 20% of the information. Break down complex ideas into easy-to-understand terms. Use bullet points or numbered lists to enhance readability.

Transcript:
";

const SYSTEM_PROMPT: &str = "You are an expert transcript summarizer with 20 years of experience.";

/// Rough character budget for the prompt body, sized to fit the smallest
/// context window among the supported models.
const MAX_PROMPT_CHARS: usize = 16_000;

const MAX_COMPLETION_TOKENS: u32 = 1000;

const GEMINI_MODEL: &str = "gemini-1.5-flash";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const CLAUDE_MODEL: &str = "claude-3-5-haiku-latest";

/// One of the interchangeable hosted text-generation backends. Each variant
/// differs only in request/response shape; `summarize` exposes one normalized
/// call regardless of which backend serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAi,
    Claude,
}

impl Provider {
    /// Human-readable backend name, for confirmation messages.
    pub fn title(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAi => "OpenAI",
            Provider::Claude => "Claude",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAi => write!(f, "openai"),
            Provider::Claude => write!(f, "claude"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            "claude" => Ok(Provider::Claude),
            other => Err(Error::Validation(format!("unsupported AI service: {other}"))),
        }
    }
}

/// Summarize transcript text with the selected backend. A single attempt: a
/// failure on the chosen provider surfaces as-is, never retried elsewhere.
pub async fn summarize(
    client: &reqwest::Client,
    provider: Provider,
    api_key: &str,
    transcript: &str,
) -> Result<String> {
    let prompt = build_prompt(transcript);
    debug!("Summarizing {} chars via {provider}", transcript.len());

    let raw = match provider {
        Provider::Gemini => summarize_gemini(client, api_key, &prompt).await?,
        Provider::OpenAi => summarize_openai(client, api_key, &prompt).await?,
        Provider::Claude => summarize_claude(client, api_key, &prompt).await?,
    };

    Ok(normalize_output(&raw))
}

fn build_prompt(transcript: &str) -> String {
    let mut text = transcript.to_string();
    if text.chars().count() > MAX_PROMPT_CHARS {
        debug!("Prompt transcript truncated to {MAX_PROMPT_CHARS} chars");
        text = text.chars().take(MAX_PROMPT_CHARS).collect();
        text.push_str("... [transcript truncated]");
    }
    format!("{SUMMARY_PROMPT}{text}")
}

/// Line endings vary by backend; collapse them for consistent display.
fn normalize_output(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// Map a non-2xx backend status onto the normalized error set. Gemini rejects
/// bad keys with 400 rather than 401, so its body is inspected too.
fn classify_failure(provider: Provider, status: StatusCode, body: &str) -> Error {
    let auth_rejected = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || (provider == Provider::Gemini
            && status == StatusCode::BAD_REQUEST
            && body.contains("API key not valid"));

    if auth_rejected {
        return Error::Auth(format!("{} rejected the API key ({status})", provider.title()));
    }

    let excerpt: String = body.chars().take(200).collect();
    Error::Upstream(format!("{} API returned {status}: {excerpt}", provider.title()))
}

async fn summarize_gemini(client: &reqwest::Client, api_key: &str, prompt: &str) -> Result<String> {
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{GEMINI_MODEL}:generateContent"
    );

    let body = serde_json::json!({
        "contents": [
            {
                "parts": [
                    { "text": prompt }
                ]
            }
        ]
    });

    let resp = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(classify_failure(Provider::Gemini, status, &body));
    }

    let json: serde_json::Value = resp.json().await?;
    extract_gemini_text(&json)
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    Err(Error::Upstream("unexpected Gemini API response format".to_string()))
}

async fn summarize_openai(client: &reqwest::Client, api_key: &str, prompt: &str) -> Result<String> {
    let body = serde_json::json!({
        "model": OPENAI_MODEL,
        "max_tokens": MAX_COMPLETION_TOKENS,
        "messages": [
            {
                "role": "system",
                "content": SYSTEM_PROMPT
            },
            {
                "role": "user",
                "content": prompt
            }
        ]
    });

    let resp = client
        .post("https://api.openai.com/v1/chat/completions")
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(classify_failure(Provider::OpenAi, status, &body));
    }

    let json: serde_json::Value = resp.json().await?;
    extract_openai_text(&json)
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    Err(Error::Upstream("unexpected OpenAI API response format".to_string()))
}

async fn summarize_claude(client: &reqwest::Client, api_key: &str, prompt: &str) -> Result<String> {
    let body = serde_json::json!({
        "model": CLAUDE_MODEL,
        "max_tokens": MAX_COMPLETION_TOKENS,
        "system": SYSTEM_PROMPT,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ]
    });

    let resp = client
        .post("https://api.anthropic.com/v1/messages")
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(classify_failure(Provider::Claude, status, &body));
    }

    let json: serde_json::Value = resp.json().await?;
    extract_claude_text(&json)
}

fn extract_claude_text(json: &serde_json::Value) -> Result<String> {
    if let Some(content) = json.get("content").and_then(|c| c.as_array()) {
        let text: String = content
            .iter()
            .filter_map(|block| {
                if block.get("type")?.as_str()? == "text" {
                    block.get("text")?.as_str().map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    Err(Error::Upstream("unexpected Claude API response format".to_string()))
}
