/// LLM client: the single point of entry for all model provider calls in Promptlab.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// Everything else depends on the `TextGenerator` / `ChatCompleter` traits,
/// which keeps the synthesizer, refiner and answer generator testable with
/// scripted fakes.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub mod gemini;
pub mod openai;
pub mod prompts;
#[cfg(test)]
pub mod testing;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

/// Total sends per provider call when the provider keeps answering 429.
const MAX_SENDS: u32 = 3;

/// Delay before the first resend; doubled for each one after.
const BACKOFF_BASE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model '{model}' is unavailable")]
    ModelUnavailable { model: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} attempts")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Free-form text generation: one prompt in, raw model text out.
///
/// Output is untrusted. It may wrap a JSON payload in commentary or code
/// fences, or not contain one at all.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Chat completion with an explicit model id so callers can switch to an
/// alternate model when the primary one is unavailable.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, LlmError>;
}

/// Builds the HTTP client shared by both providers.
pub(crate) fn build_http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Sends the request built by `build`, retrying only on 429 with
/// exponential backoff (1s, 2s). Any other status is returned to the caller.
pub(crate) async fn send_with_backoff<F>(build: F) -> Result<Response, LlmError>
where
    F: Fn() -> RequestBuilder,
{
    send_with_backoff_from(BACKOFF_BASE, build).await
}

async fn send_with_backoff_from<F>(base: Duration, build: F) -> Result<Response, LlmError>
where
    F: Fn() -> RequestBuilder,
{
    for attempt in 0..MAX_SENDS {
        if attempt > 0 {
            let delay = base * (1 << (attempt - 1));
            warn!(
                "Provider rate limited attempt {}, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = build().send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            warn!("Provider returned 429: {}", body);
            continue;
        }

        return Ok(response);
    }

    Err(LlmError::RateLimited { retries: MAX_SENDS })
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
    #[serde(default)]
    code: Option<Value>,
}

/// Turns a non-success provider response into an `LlmError`.
///
/// A 404, or an error body whose `code` is `model_not_found`, means the
/// requested model id does not exist for this account.
pub(crate) async fn error_from_response(response: Response, model: &str) -> LlmError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ProviderError>(&body).ok();

    let model_missing = parsed
        .as_ref()
        .and_then(|e| e.error.code.as_ref())
        .and_then(Value::as_str)
        .is_some_and(|code| code == "model_not_found");

    if status == StatusCode::NOT_FOUND || model_missing {
        return LlmError::ModelUnavailable {
            model: model.to_string(),
        };
    }

    LlmError::Api {
        status: status.as_u16(),
        message: parsed.map(|e| e.error.message).unwrap_or(body),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode as HttpStatus, routing::get, Json, Router};
    use serde_json::json;

    use super::testing::serve;
    use super::*;

    async fn provider_stub() -> String {
        serve(
            Router::new()
                .route("/missing", get(|| async { (HttpStatus::NOT_FOUND, "no such model") }))
                .route(
                    "/model-not-found",
                    get(|| async {
                        (
                            HttpStatus::BAD_REQUEST,
                            Json(json!({"error": {
                                "message": "The model `gpt-x` does not exist",
                                "code": "model_not_found"
                            }})),
                        )
                    }),
                )
                .route(
                    "/boom",
                    get(|| async {
                        (
                            HttpStatus::INTERNAL_SERVER_ERROR,
                            Json(json!({"error": {"message": "boom", "code": 500}})),
                        )
                    }),
                )
                .route(
                    "/plain",
                    get(|| async { (HttpStatus::BAD_GATEWAY, "upstream unavailable") }),
                ),
        )
        .await
    }

    async fn mapped_error(base: &str, path: &str) -> LlmError {
        let response = Client::new()
            .get(format!("{base}{path}"))
            .send()
            .await
            .unwrap();
        error_from_response(response, "gpt-x").await
    }

    #[tokio::test]
    async fn test_not_found_status_means_model_unavailable() {
        let base = provider_stub().await;
        let err = mapped_error(&base, "/missing").await;
        assert!(matches!(err, LlmError::ModelUnavailable { ref model } if model == "gpt-x"));
    }

    #[tokio::test]
    async fn test_model_not_found_code_means_model_unavailable() {
        let base = provider_stub().await;
        let err = mapped_error(&base, "/model-not-found").await;
        assert!(matches!(err, LlmError::ModelUnavailable { ref model } if model == "gpt-x"));
    }

    #[tokio::test]
    async fn test_other_failures_map_to_api_error() {
        let base = provider_stub().await;

        let err = mapped_error(&base, "/boom").await;
        assert!(
            matches!(err, LlmError::Api { status: 500, ref message } if message == "boom"),
            "got {err:?}"
        );

        let err = mapped_error(&base, "/plain").await;
        assert!(
            matches!(err, LlmError::Api { status: 502, ref message } if message == "upstream unavailable"),
            "got {err:?}"
        );
    }

    /// Stub that answers 429 for the first `limited` hits, then `status`.
    async fn counting_stub(limited: usize, status: HttpStatus) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/",
                get(
                    move |State(hits): State<Arc<AtomicUsize>>| async move {
                        let seen = hits.fetch_add(1, Ordering::SeqCst);
                        if seen < limited {
                            HttpStatus::TOO_MANY_REQUESTS
                        } else {
                            status
                        }
                    },
                ),
            )
            .with_state(hits.clone());
        (serve(router).await, hits)
    }

    async fn send_to(base: &str) -> Result<Response, LlmError> {
        let client = Client::new();
        send_with_backoff_from(Duration::from_millis(1), || client.get(base)).await
    }

    #[tokio::test]
    async fn test_rate_limit_gives_up_after_three_sends() {
        let (base, hits) = counting_stub(usize::MAX, HttpStatus::OK).await;

        let result = send_to(&base).await;

        assert!(matches!(result, Err(LlmError::RateLimited { retries: 3 })));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rate_limit_recovers_on_later_send() {
        let (base, hits) = counting_stub(1, HttpStatus::OK).await;

        let response = send_to(&base).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_only_rate_limits_are_resent() {
        let (base, hits) = counting_stub(0, HttpStatus::INTERNAL_SERVER_ERROR).await;

        let response = send_to(&base).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}  ";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        let input = "```json\n{\"key\": 1}";
        assert_eq!(strip_json_fences(input), "{\"key\": 1}");
    }

    #[test]
    fn test_provider_error_code_may_be_number_or_string() {
        let gemini: ProviderError =
            serde_json::from_str(r#"{"error":{"code":404,"message":"not found"}}"#).unwrap();
        assert!(gemini.error.code.unwrap().is_number());

        let openai: ProviderError = serde_json::from_str(
            r#"{"error":{"message":"The model does not exist","code":"model_not_found"}}"#,
        )
        .unwrap();
        assert_eq!(openai.error.code.unwrap(), "model_not_found");
    }
}
