use crate::config::ServerConfig;
use crate::coordinator;
use crate::errors::RelayError;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use nittany_core::{CompletionProvider, RelayConfig};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{info, warn};

pub const CORS_ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
pub const CORS_ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Application state shared with all routes. Read-only; each call is independent.
#[derive(Clone)]
pub struct AppState {
    config: Arc<RelayConfig>,
    provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new(config: RelayConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}

/// Builds the router with the chat endpoint mounted at `endpoint`.
///
/// CORS headers are set on every response, whatever the outcome.
pub fn build_router(state: AppState, endpoint: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(endpoint, any(handle_chat))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        .with_state(state)
}

/// Start the HTTP server and run until ctrl-c
pub async fn run_server(
    config: ServerConfig,
    provider: Arc<dyn CompletionProvider>,
) -> anyhow::Result<()> {
    info!(
        addr = %config.http_addr,
        endpoint = %config.endpoint,
        model = %config.provider.model_name,
        provider = provider.provider_name(),
        "Starting HTTP server"
    );

    let state = AppState::new(config.provider.clone(), provider);
    let app = build_router(state, &config.endpoint);

    axum::Server::bind(&config.http_addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start HTTP server: {}", e))
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "nittany-relay is running"
}

/// The relay endpoint. Preflight gets an empty 200, POST is relayed, anything else is 405.
///
/// An unreadable body (including one over the size limit) is answered like a missing message.
async fn handle_chat(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match method {
        Method::OPTIONS => StatusCode::OK.into_response(),
        Method::POST => {
            let body = match body {
                Ok(body) => body,
                Err(rejection) => {
                    warn!(rejection = %rejection, "Could not read request body");
                    return RelayError::Validation.into_response();
                }
            };
            match coordinator::relay_message(&state.config, state.provider.as_ref(), &body).await
            {
                Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
                Err(e) => e.into_response(),
            }
        }
        _ => RelayError::Method.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockOutcome, MockProvider};
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app_with(outcome: MockOutcome, api_key_env: &str) -> (Router, Arc<MockProvider>) {
        let provider = Arc::new(MockProvider::new(outcome));
        let config = RelayConfig {
            api_key_env: api_key_env.to_string(),
            ..RelayConfig::default()
        };
        let state = AppState::new(config, provider.clone());
        (build_router(state, "/api/claude-chat"), provider)
    }

    fn post(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/claude-chat")
            .header(CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn read_body(response: Response) -> Vec<u8> {
        hyper::body::to_bytes(response.into_body())
            .await
            .unwrap()
            .to_vec()
    }

    async fn read_json(response: Response) -> Value {
        serde_json::from_slice(&read_body(response).await).unwrap()
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            CORS_ALLOW_METHODS
        );
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            CORS_ALLOW_HEADERS
        );
    }

    #[tokio::test]
    async fn test_options_returns_empty_ok_without_credential() {
        std::env::remove_var("HTTP_TEST_KEY_OPTIONS");
        let (app, provider) = app_with(MockOutcome::reply("X", "m"), "HTTP_TEST_KEY_OPTIONS");

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/claude-chat")
            .header("Origin", "https://example.edu")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert!(read_body(response).await.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_other_methods_are_not_allowed() {
        for method in ["GET", "PUT", "DELETE", "PATCH"] {
            let (app, provider) = app_with(MockOutcome::reply("X", "m"), "HTTP_TEST_KEY_METHOD");
            let request = Request::builder()
                .method(method)
                .uri("/api/claude-chat")
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", method);
            assert_cors(&response);
            assert_eq!(
                read_json(response).await,
                json!({"error": "Method not allowed"})
            );
            assert_eq!(provider.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_missing_or_mistyped_message_is_400() {
        std::env::set_var("HTTP_TEST_KEY_VALIDATION", "sk-test");
        for body in [
            "{}",
            r#"{"message": 7}"#,
            r#"{"message": null}"#,
            r#"{"message": ""}"#,
            "garbage",
        ] {
            let (app, provider) =
                app_with(MockOutcome::reply("X", "m"), "HTTP_TEST_KEY_VALIDATION");
            let response = app.oneshot(post(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
            assert_cors(&response);
            assert_eq!(
                read_json(response).await,
                json!({"error": "Message is required"})
            );
            assert_eq!(provider.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_oversized_body_is_400_envelope() {
        std::env::set_var("HTTP_TEST_KEY_OVERSIZED", "sk-test");
        let (app, provider) = app_with(MockOutcome::reply("X", "m"), "HTTP_TEST_KEY_OVERSIZED");

        let body = format!(r#"{{"message":"{}"}}"#, "a".repeat(3 * 1024 * 1024));
        let response = app.oneshot(post(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        assert_eq!(
            read_json(response).await,
            json!({"error": "Message is required"})
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_is_500_without_provider_call() {
        std::env::remove_var("HTTP_TEST_KEY_ABSENT");
        let (app, provider) = app_with(MockOutcome::reply("X", "m"), "HTTP_TEST_KEY_ABSENT");

        let response = app.oneshot(post(r#"{"message":"hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(
            read_json(response).await,
            json!({"error": "API key not configured"})
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_credential_is_read_per_request() {
        std::env::remove_var("HTTP_TEST_KEY_LATE");
        let (app, provider) = app_with(MockOutcome::reply("X", "m"), "HTTP_TEST_KEY_LATE");

        let response = app
            .clone()
            .oneshot(post(r#"{"message":"hi"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        std::env::set_var("HTTP_TEST_KEY_LATE", "sk-late");
        let response = app.oneshot(post(r#"{"message":"hi"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(provider.calls()[0].0, "sk-late");
    }

    #[tokio::test]
    async fn test_success_relays_reply_and_model() {
        std::env::set_var("HTTP_TEST_KEY_OK", "sk-test");
        let (app, provider) = app_with(MockOutcome::reply("X", "m"), "HTTP_TEST_KEY_OK");

        let response = app.oneshot(post(r#"{"message":"hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(read_json(response).await, json!({"reply": "X", "model": "m"}));

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.messages[0].content, "hi");
        assert_eq!(calls[0].1.system, nittany_core::SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_provider_auth_failure_is_generic_500() {
        std::env::set_var("HTTP_TEST_KEY_AUTH", "sk-revoked");
        let (app, provider) = app_with(MockOutcome::Unauthorized, "HTTP_TEST_KEY_AUTH");

        let response = app.oneshot(post(r#"{"message":"hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(read_json(response).await, json!({"error": "Invalid API key"}));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_other_provider_failures_are_generic_500() {
        std::env::set_var("HTTP_TEST_KEY_UPSTREAM", "sk-test");
        for outcome in [MockOutcome::Unavailable, MockOutcome::EmptyContent] {
            let (app, provider) = app_with(outcome, "HTTP_TEST_KEY_UPSTREAM");
            let response = app.oneshot(post(r#"{"message":"hi"}"#)).await.unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                read_json(response).await,
                json!({"error": "Failed to process your request. Please try again."})
            );
            assert_eq!(provider.call_count(), 1);
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app_with(MockOutcome::reply("X", "m"), "HTTP_TEST_KEY_HEALTH");
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, b"nittany-relay is running");
    }
}
