use super::LlmClient;
use super::prompt_builder::PromptPair;
use crate::error::GenerationError;
use crate::generation::GenerationResult;
use crate::profiles::CredentialProfile;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FALLBACK_TITLE: &str = "PR Title";
pub const FALLBACK_DESCRIPTION: &str = "No description provided";

const TEMPERATURE: f64 = 0.7;

/// Minimal request/response structs for OpenAI-compatible Chat Completions APIs.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Client for any endpoint speaking the OpenAI chat-completions protocol.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
}

impl OpenAiClient {
    pub fn new(profile: &CredentialProfile) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(OpenAiClient {
            client,
            api_key: profile.api_key.clone(),
            model: profile.model.clone(),
            api_base_url: profile.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url)
    }

    fn call_chat(&self, req: &ChatRequest<'_>) -> Result<String, GenerationError> {
        let url = self.chat_url();

        log::info!("Calling model {:?} at {}", req.model, url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            log::error!("API error: HTTP {} - {}", status.as_u16(), truncate(&body, 500));
            return Err(GenerationError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        resp.text()
            .map_err(|e| GenerationError::Transport(format!("failed to read response body: {e}")))
    }
}

impl LlmClient for OpenAiClient {
    fn generate_pr(&self, prompts: &PromptPair) -> Result<GenerationResult, GenerationError> {
        log::debug!("PR system prompt:\n{}", prompts.system);
        log::trace!("PR user prompt:\n{}", truncate(&prompts.user, 3500));

        let req = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompts.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompts.user,
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let body = self.call_chat(&req)?;
        log::trace!("Raw API response: {}", truncate(&body, 3500));
        parse_chat_response(&body)
    }
}

/// Turn a chat-completions body into a PR result.
///
/// The outer body and the inner `content` must both be JSON; a missing
/// `title` or `description` inside an otherwise valid object gets fallback text.
pub fn parse_chat_response(body: &str) -> Result<GenerationResult, GenerationError> {
    let chat_resp: ChatResponse = serde_json::from_str(body).map_err(|e| {
        GenerationError::MalformedResponse(format!("response body is not valid JSON: {e}"))
    })?;

    if let Some(usage) = &chat_resp.usage {
        log::info!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens
        );
    }

    let content = chat_resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| GenerationError::MalformedResponse("response content is empty".into()))?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| {
        GenerationError::MalformedResponse(format!("content is not valid JSON: {e}"))
    })?;

    let Value::Object(fields) = parsed else {
        return Err(GenerationError::MalformedResponse(
            "content is not a JSON object".into(),
        ));
    };

    Ok(GenerationResult {
        title: text_field(&fields, "title", FALLBACK_TITLE),
        description: text_field(&fields, "description", FALLBACK_DESCRIPTION),
    })
}

fn text_field(fields: &Map<String, Value>, name: &str, fallback: &str) -> String {
    match fields.get(name).and_then(Value::as_str).filter(|s| !s.is_empty()) {
        Some(text) => text.to_string(),
        None => {
            log::warn!("Response is missing '{name}', using fallback text");
            fallback.to_string()
        }
    }
}

/// Truncate long strings for debug logging.
fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!(
            "{}...\n[truncated {} chars]",
            &s[..idx],
            s[idx..].chars().count()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: Value) -> String {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })
        .to_string()
    }

    fn prompts() -> PromptPair {
        PromptPair {
            system: "system text".into(),
            user: "user text".into(),
        }
    }

    fn profile(base_url: &str) -> CredentialProfile {
        let mut p = CredentialProfile::new("mock");
        p.base_url = base_url.to_string();
        p.api_key = "sk-test".into();
        p.model = "gpt-test".into();
        p
    }

    /// Mock servers run on their own thread, so the blocking client can be
    /// driven from the plain test thread.
    fn mock_server() -> (tokio::runtime::Runtime, MockServer) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        (rt, server)
    }

    #[test]
    fn parses_title_and_description() {
        let body = completion(json!(
            json!({"title": "Add login", "description": "## Overview"}).to_string()
        ));
        let result = parse_chat_response(&body).unwrap();
        assert_eq!(result.title, "Add login");
        assert_eq!(result.description, "## Overview");
    }

    #[test]
    fn missing_description_falls_back() {
        let body = completion(json!(r#"{"title":"Fix login bug"}"#));
        let result = parse_chat_response(&body).unwrap();
        assert_eq!(result.title, "Fix login bug");
        assert_eq!(result.description, FALLBACK_DESCRIPTION);
    }

    #[test]
    fn empty_or_non_string_title_falls_back() {
        let body = completion(json!(r#"{"title":"","description":"d"}"#));
        assert_eq!(parse_chat_response(&body).unwrap().title, FALLBACK_TITLE);

        let body = completion(json!(r#"{"title":42,"description":"d"}"#));
        assert_eq!(parse_chat_response(&body).unwrap().title, FALLBACK_TITLE);
    }

    #[test]
    fn missing_content_is_malformed() {
        for body in [
            json!({"choices": []}).to_string(),
            json!({"choices": [{"message": {"role": "assistant"}}]}).to_string(),
            json!({"choices": [{"message": {"content": null}}]}).to_string(),
            completion(json!("")),
        ] {
            let err = parse_chat_response(&body).unwrap_err();
            assert!(matches!(err, GenerationError::MalformedResponse(_)), "{body}");
        }
    }

    #[test]
    fn non_json_bodies_are_malformed() {
        let err = parse_chat_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));

        let err = parse_chat_response(&completion(json!("Here is your PR: ..."))).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));

        let err = parse_chat_response(&completion(json!("[1, 2]"))).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        let out = truncate("请使用简体中文", 3);
        assert!(out.starts_with("请使用..."));
        assert!(out.ends_with("[truncated 4 chars]"));
    }

    #[test]
    fn sends_openai_compatible_request() {
        let (rt, server) = mock_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/v1/chat/completions"))
                .and(header("authorization", "Bearer sk-test"))
                .and(body_partial_json(json!({
                    "model": "gpt-test",
                    "messages": [
                        {"role": "system", "content": "system text"},
                        {"role": "user", "content": "user text"}
                    ],
                    "temperature": 0.7,
                    "response_format": {"type": "json_object"}
                })))
                .respond_with(ResponseTemplate::new(200).set_body_string(completion(json!(
                    r#"{"title":"Add login","description":"Adds login."}"#
                ))))
                .expect(1)
                .mount(&server),
        );

        let client = OpenAiClient::new(&profile(&format!("{}/v1/", server.uri()))).unwrap();
        let result = client.generate_pr(&prompts()).unwrap();
        assert_eq!(
            result,
            GenerationResult {
                title: "Add login".into(),
                description: "Adds login.".into(),
            }
        );
    }

    #[test]
    fn unauthorized_is_request_failed() {
        let (rt, server) = mock_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(
                    ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid api key"}"#),
                )
                .mount(&server),
        );

        let client = OpenAiClient::new(&profile(&server.uri())).unwrap();
        let err = client.generate_pr(&prompts()).unwrap_err();
        match &err {
            GenerationError::RequestFailed { status, body } => {
                assert_eq!(*status, 401);
                assert!(body.contains("invalid api key"));
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        let client = OpenAiClient::new(&profile("http://127.0.0.1:9")).unwrap();
        let err = client.generate_pr(&prompts()).unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }
}
