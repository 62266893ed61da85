use std::time::Duration;

use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use validator::Validate;

use crate::{config::Config, errors::GenerationFailure};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*(.*?)\s*```$").expect("CODE_FENCE is a valid regex pattern")
});

/// One call to the generation collaborator: a prompt plus the JSON Schema the
/// answer must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub schema_name: String,
    pub schema: Value,
}

/// The external model provider. Implementations return the raw JSON value the
/// model produced; typed parsing happens in [`generate_structured`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, GenerationFailure>;
}

/// Output envelope of a generation stage.
pub trait StructuredOutput: DeserializeOwned + JsonSchema + Validate + Send {
    const SCHEMA_NAME: &'static str;
}

pub fn schema_of<T: StructuredOutput>() -> Result<Value, GenerationFailure> {
    serde_json::to_value(schemars::schema_for!(T))
        .map_err(|e| GenerationFailure::schema_violation(T::SCHEMA_NAME, e))
}

/// Single attempt, no retry. The result is parsed and validated against `T`.
pub async fn generate_structured<T: StructuredOutput>(
    client: &dyn GenerationClient,
    prompt: String,
) -> Result<T, GenerationFailure> {
    let request = GenerationRequest {
        prompt,
        schema_name: T::SCHEMA_NAME.to_string(),
        schema: schema_of::<T>()?,
    };

    log::debug!("Requesting '{}' from generation client", T::SCHEMA_NAME);
    let raw = client.generate(request).await.map_err(|e| {
        log::warn!("Generation of '{}' failed ({}): {}", T::SCHEMA_NAME, e.kind(), e);
        e
    })?;

    parse_structured(raw)
}

pub fn parse_structured<T: StructuredOutput>(raw: Value) -> Result<T, GenerationFailure> {
    if raw.is_null() {
        return Err(GenerationFailure::EmptyOutput(T::SCHEMA_NAME.to_string()));
    }

    let parsed: T = serde_json::from_value(raw)
        .map_err(|e| GenerationFailure::schema_violation(T::SCHEMA_NAME, e))?;
    parsed
        .validate()
        .map_err(|e| GenerationFailure::schema_violation(T::SCHEMA_NAME, e))?;

    Ok(parsed)
}

#[derive(Clone, Debug)]
pub struct GenerationSettings {
    pub api_base: String,
    pub api_key: SecretString,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl From<&Config> for GenerationSettings {
    fn from(config: &Config) -> Self {
        Self {
            api_base: config.model_api_base.clone(),
            api_key: config.model_api_key.clone(),
            model: config.model_name.clone(),
            timeout: config.generation_timeout(),
        }
    }
}

// The provider client retries transient failures by default. A zero
// elapsed-time budget makes the first failure final.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// Chat-completions provider speaking the OpenAI wire format.
pub struct OpenAiGenerationClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Option<Duration>,
}

impl OpenAiGenerationClient {
    pub fn new(settings: GenerationSettings) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(settings.api_base)
            .with_api_key(settings.api_key.expose_secret().to_string());

        Self {
            client: Client::with_config(config).with_backoff(single_attempt()),
            model: settings.model,
            timeout: settings.timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_request(&self, request: &GenerationRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema_name,
                    "strict": false,
                    "schema": request.schema
                }
            }
        })
    }
}

#[async_trait]
impl GenerationClient for OpenAiGenerationClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, GenerationFailure> {
        let body = self.chat_request(&request);
        let call = async {
            let response: Result<Value, OpenAIError> = self.client.chat().create_byot(body).await;
            response
        };

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                GenerationFailure::Transport(format!(
                    "Generation request timed out after {}ms",
                    limit.as_millis()
                ))
            })?,
            None => call.await,
        }
        .map_err(|e| GenerationFailure::Transport(e.to_string()))?;

        extract_message_content(&request.schema_name, &response)
    }
}

/// Pull the JSON payload out of a chat-completions response body.
pub(crate) fn extract_message_content(
    schema_name: &str,
    response: &Value,
) -> Result<Value, GenerationFailure> {
    let message = &response["choices"][0]["message"];

    if let Some(refusal) = message["refusal"].as_str().filter(|r| !r.trim().is_empty()) {
        log::warn!("Model refused to produce '{}': {}", schema_name, refusal);
        return Err(GenerationFailure::EmptyOutput(schema_name.to_string()));
    }

    let content = message["content"].as_str().map(str::trim).unwrap_or_default();
    if content.is_empty() {
        return Err(GenerationFailure::EmptyOutput(schema_name.to_string()));
    }

    serde_json::from_str(strip_code_fence(content))
        .map_err(|e| GenerationFailure::schema_violation(schema_name, e))
}

fn strip_code_fence(content: &str) -> &str {
    CODE_FENCE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema, Validate)]
    struct Greeting {
        #[validate(length(min = 1))]
        words: Vec<String>,
    }

    impl StructuredOutput for Greeting {
        const SCHEMA_NAME: &'static str = "greeting";
    }

    fn chat_response(content: Value) -> Value {
        json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
    }

    #[test]
    fn parse_structured_accepts_conforming_value() {
        let parsed: Greeting =
            parse_structured(json!({ "words": ["hello"] })).expect("value should parse");

        assert_eq!(parsed.words, vec!["hello"]);
    }

    #[test]
    fn parse_structured_rejects_null_as_empty_output() {
        let err = parse_structured::<Greeting>(Value::Null).unwrap_err();

        assert_eq!(err, GenerationFailure::EmptyOutput("greeting".to_string()));
    }

    #[test]
    fn parse_structured_rejects_wrong_shape() {
        let err = parse_structured::<Greeting>(json!({ "words": "hello" })).unwrap_err();

        assert_eq!(err.kind(), "schema-violation");
    }

    #[test]
    fn parse_structured_runs_validation_rules() {
        let err = parse_structured::<Greeting>(json!({ "words": [] })).unwrap_err();

        assert_eq!(err.kind(), "schema-violation");
    }

    #[test]
    fn schema_of_describes_output_fields() {
        let schema = schema_of::<Greeting>().expect("schema should build");

        assert!(schema["properties"]["words"].is_object());
    }

    #[tokio::test]
    async fn generate_structured_sends_schema_name_and_prompt() {
        let mut client = MockGenerationClient::new();
        client
            .expect_generate()
            .withf(|req| req.schema_name == "greeting" && req.prompt == "say hi")
            .times(1)
            .returning(|_| Ok(json!({ "words": ["hi"] })));

        let out: Greeting = generate_structured(&client, "say hi".to_string())
            .await
            .expect("generation should succeed");

        assert_eq!(out.words, vec!["hi"]);
    }

    #[tokio::test]
    async fn generate_structured_passes_transport_failure_through() {
        let mut client = MockGenerationClient::new();
        client
            .expect_generate()
            .returning(|_| Err(GenerationFailure::Transport("connection reset".into())));

        let err = generate_structured::<Greeting>(&client, "x".to_string())
            .await
            .unwrap_err();

        assert_eq!(err, GenerationFailure::Transport("connection reset".into()));
    }

    #[test]
    fn extract_message_content_parses_plain_json() {
        let value = extract_message_content("greeting", &chat_response(json!("{\"words\":[\"a\"]}")))
            .expect("content should parse");

        assert_eq!(value, json!({ "words": ["a"] }));
    }

    #[test]
    fn extract_message_content_strips_code_fence() {
        let fenced = "```json\n{\"words\": [\"a\"]}\n```";
        let value = extract_message_content("greeting", &chat_response(json!(fenced)))
            .expect("fenced content should parse");

        assert_eq!(value, json!({ "words": ["a"] }));
    }

    #[test]
    fn extract_message_content_rejects_empty_content() {
        let err = extract_message_content("greeting", &chat_response(json!("   "))).unwrap_err();
        assert_eq!(err, GenerationFailure::EmptyOutput("greeting".into()));

        let err = extract_message_content("greeting", &json!({ "choices": [] })).unwrap_err();
        assert_eq!(err, GenerationFailure::EmptyOutput("greeting".into()));
    }

    #[test]
    fn extract_message_content_rejects_refusal() {
        let response = json!({
            "choices": [ { "message": { "content": null, "refusal": "I can't help with that" } } ]
        });

        let err = extract_message_content("greeting", &response).unwrap_err();
        assert_eq!(err.kind(), "empty-output");
    }

    #[test]
    fn extract_message_content_rejects_non_json() {
        let err = extract_message_content("greeting", &chat_response(json!("Sure! Here you go")))
            .unwrap_err();

        assert_eq!(err.kind(), "schema-violation");
    }

    #[test]
    fn chat_request_carries_model_and_schema() {
        let client = OpenAiGenerationClient::new(GenerationSettings {
            api_base: "http://localhost:9999/v1".to_string(),
            api_key: SecretString::from("key".to_string()),
            model: "test-model".to_string(),
            timeout: None,
        });
        let request = GenerationRequest {
            prompt: "hello".to_string(),
            schema_name: "greeting".to_string(),
            schema: json!({ "type": "object" }),
        };

        let body = client.chat_request(&request);

        assert_eq!(client.model(), "test-model");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["response_format"]["json_schema"]["name"], "greeting");
        assert_eq!(body["response_format"]["json_schema"]["schema"]["type"], "object");
    }

    mod provider {
        use std::sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        };

        use tokio::{
            io::{AsyncReadExt, AsyncWriteExt},
            net::{TcpListener, TcpStream},
        };

        use super::*;

        const CHAT_COMPLETION: &str = r#"{"id":"chatcmpl-1","object":"chat.completion","created":0,"model":"test-model","choices":[{"index":0,"message":{"role":"assistant","content":"{\"words\":[\"hi\"]}"},"finish_reason":"stop"}]}"#;
        const SERVER_ERROR: &str = r#"{"error":{"message":"upstream exploded","type":"server_error","param":null,"code":null}}"#;

        /// Reads one HTTP request: headers plus a `content-length` body.
        async fn read_request(stream: &mut TcpStream) {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => n,
                };
                buf.extend_from_slice(&chunk[..n]);

                if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                    let length = headers
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + length {
                        return;
                    }
                }
            }
        }

        /// Local provider answering every request with `status` and `body`.
        /// Returns its API base and the number of requests served.
        async fn stub_provider(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub provider");
            let addr = listener.local_addr().expect("local addr");
            let requests = Arc::new(AtomicUsize::new(0));
            let counter = requests.clone();

            tokio::spawn(async move {
                while let Ok((mut stream, _)) = listener.accept().await {
                    read_request(&mut stream).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                    let response = format!(
                        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
            });

            (format!("http://{}/v1", addr), requests)
        }

        /// Local provider that accepts requests and never answers.
        async fn silent_provider() -> String {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub provider");
            let addr = listener.local_addr().expect("local addr");

            tokio::spawn(async move {
                let mut held = Vec::new();
                while let Ok((mut stream, _)) = listener.accept().await {
                    read_request(&mut stream).await;
                    held.push(stream);
                }
            });

            format!("http://{}/v1", addr)
        }

        fn client(api_base: String, timeout: Option<Duration>) -> OpenAiGenerationClient {
            OpenAiGenerationClient::new(GenerationSettings {
                api_base,
                api_key: SecretString::from("key".to_string()),
                model: "test-model".to_string(),
                timeout,
            })
        }

        fn greeting_request() -> GenerationRequest {
            GenerationRequest {
                prompt: "say hi".to_string(),
                schema_name: Greeting::SCHEMA_NAME.to_string(),
                schema: schema_of::<Greeting>().expect("schema should build"),
            }
        }

        #[tokio::test]
        async fn generate_returns_message_content() {
            let (api_base, requests) = stub_provider("200 OK", CHAT_COMPLETION).await;

            let value = client(api_base, Some(Duration::from_secs(10)))
                .generate(greeting_request())
                .await
                .expect("generation should succeed");

            assert_eq!(value, json!({ "words": ["hi"] }));
            assert_eq!(requests.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn generate_makes_one_attempt_on_server_error() {
            let (api_base, requests) =
                stub_provider("500 Internal Server Error", SERVER_ERROR).await;

            let err = client(api_base, Some(Duration::from_secs(10)))
                .generate(greeting_request())
                .await
                .unwrap_err();

            assert_eq!(err.kind(), "transport");
            assert!(!err.to_string().contains("timed out"), "{}", err);
            assert_eq!(requests.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn generate_makes_one_attempt_when_rate_limited() {
            let (api_base, requests) = stub_provider("429 Too Many Requests", SERVER_ERROR).await;

            let err = client(api_base, Some(Duration::from_secs(10)))
                .generate(greeting_request())
                .await
                .unwrap_err();

            assert_eq!(err.kind(), "transport");
            assert_eq!(requests.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn generate_times_out_as_transport_failure() {
            let api_base = silent_provider().await;

            let err = client(api_base, Some(Duration::from_millis(200)))
                .generate(greeting_request())
                .await
                .unwrap_err();

            assert_eq!(
                err,
                GenerationFailure::Transport("Generation request timed out after 200ms".into())
            );
        }
    }
}
