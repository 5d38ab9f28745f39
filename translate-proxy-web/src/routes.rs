use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use translate_proxy::{ProxyResult, TranslateError, TranslatePayload, TranslationResult, Translator};

/// Largest request body accepted, in bytes
pub const BODY_LIMIT: usize = 4 * 1024 * 1024;

/// How failures are reflected in the HTTP status line
///
/// `InBody` keeps every answer at 200 and reports errors only in the JSON
/// body, which is what existing frontends expect. `Mapped` uses 4xx/5xx.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ErrorStatusPolicy {
    #[default]
    InBody,
    Mapped,
}

impl ErrorStatusPolicy {
    pub fn status_for(&self, outcome: &ProxyResult<String>) -> StatusCode {
        let Err(err) = outcome else {
            return StatusCode::OK;
        };

        match self {
            ErrorStatusPolicy::InBody => StatusCode::OK,
            ErrorStatusPolicy::Mapped => match err {
                TranslateError::BadRequest(_) => StatusCode::BAD_REQUEST,
                TranslateError::UpstreamUnavailable { timed_out: true, .. } => {
                    StatusCode::GATEWAY_TIMEOUT
                }
                TranslateError::UpstreamUnavailable { .. }
                | TranslateError::UpstreamError { .. }
                | TranslateError::UpstreamContractViolation { .. } => StatusCode::BAD_GATEWAY,
                TranslateError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Status for a body axum refused before it reached the translator
    pub fn status_for_rejection(&self, rejected: StatusCode) -> StatusCode {
        match self {
            ErrorStatusPolicy::InBody => StatusCode::OK,
            ErrorStatusPolicy::Mapped if rejected == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ErrorStatusPolicy::Mapped => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub translator: Translator,
    pub error_status: ErrorStatusPolicy,
}

/// Build the CORS layer: permissive when no origins are given
pub fn cors_layer(allowed_origins: &[String]) -> ProxyResult<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(|o| {
            HeaderValue::from_str(o).map_err(|e| {
                TranslateError::Configuration(format!("invalid allowed origin {:?}: {}", o, e))
            })
        })
        .collect::<ProxyResult<Vec<_>>>()?;

    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .route("/api/translate", post(translate))
        .route("/api/status", get(status))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn status() -> &'static str {
    "Server is live"
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslatePayload>, JsonRejection>,
) -> (StatusCode, Json<TranslationResult>) {
    let (outcome, rejected) = match payload {
        Ok(Json(payload)) => (state.translator.try_translate(payload).await, None),
        Err(rejection) => (
            Err(TranslateError::BadRequest(rejection.body_text())),
            Some(rejection.status()),
        ),
    };

    if let Err(err) = &outcome {
        warn!("Translation failed ({}): {}", err.kind(), err);
    }

    let status = match rejected {
        Some(rejected) => state.error_status.status_for_rejection(rejected),
        None => state.error_status.status_for(&outcome),
    };
    (status, Json(TranslationResult::from(outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use translate_proxy::{MockMode, MockProvider, ProviderConfig, ProviderKind};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hola_mock() -> MockProvider {
        let mut map = HashMap::new();
        map.insert(("hello".to_string(), "es".to_string()), "hola".to_string());
        MockProvider::new(MockMode::Mappings(map))
    }

    fn app_with(mock: &MockProvider, error_status: ErrorStatusPolicy) -> Router {
        let state = AppState {
            translator: Translator::new(Arc::new(mock.clone()), Duration::from_millis(200)),
            error_status,
        };
        router(state, CorsLayer::permissive())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_translate_returns_exact_body() {
        let mock = hola_mock();
        let (status, body) = send(
            app_with(&mock, ErrorStatusPolicy::InBody),
            post_json("/translate", r#"{"q":"hello","source":"en","target":"es"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "translatedText": "hola" }));
    }

    #[tokio::test]
    async fn test_api_translate_accepts_text_alias() {
        let mock = hola_mock();
        let (status, body) = send(
            app_with(&mock, ErrorStatusPolicy::InBody),
            post_json("/api/translate", r#"{"text":"hello","source":"en","target":"es"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "translatedText": "hola" }));
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request_in_body() {
        let mock = hola_mock();
        let (status, body) = send(
            app_with(&mock, ErrorStatusPolicy::InBody),
            post_json("/translate", r#"{"source":"en","target":"es"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error": "Bad request: Missing 'q' parameter" }));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_still_gets_json_body() {
        let mock = hola_mock();
        let (status, body) = send(
            app_with(&mock, ErrorStatusPolicy::InBody),
            post_json("/translate", r#"{"q": "hello", "#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].as_str().unwrap().starts_with("Bad request"));
        assert!(body.get("translatedText").is_none());
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let mock = hola_mock();
        let request = Request::builder()
            .method("POST")
            .uri("/translate")
            .body(Body::from(r#"{"q":"hello","source":"en","target":"es"}"#))
            .unwrap();
        let (status, body) = send(app_with(&mock, ErrorStatusPolicy::Mapped), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_oversized_body_is_payload_too_large() {
        let mock = hola_mock();
        let big = json!({ "q": "a".repeat(BODY_LIMIT + 1), "source": "en", "target": "es" }).to_string();

        let (status, body) = send(
            app_with(&mock, ErrorStatusPolicy::Mapped),
            post_json("/translate", &big),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].as_str().unwrap().starts_with("Bad request"));
        assert!(body.get("translatedText").is_none());

        let (status, body) = send(
            app_with(&mock, ErrorStatusPolicy::InBody),
            post_json("/translate", &big),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].is_string());
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_mapped_policy_status_codes() {
        let mock = hola_mock();
        let (status, _) = send(
            app_with(&mock, ErrorStatusPolicy::Mapped),
            post_json("/translate", r#"{"q":"","source":"en","target":"es"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let slow = MockProvider::with_delay(MockMode::Suffix, Duration::from_secs(5));
        let (status, body) = send(
            app_with(&slow, ErrorStatusPolicy::Mapped),
            post_json("/translate", r#"{"q":"hello","source":"en","target":"es"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(body["error"].as_str().unwrap().contains("timed out"));

        let failing = MockProvider::new(MockMode::Error(TranslateError::UpstreamError {
            status: 500,
            body: "oops".to_string(),
        }));
        let (status, body) = send(
            app_with(&failing, ErrorStatusPolicy::Mapped),
            post_json("/translate", r#"{"q":"hello","source":"en","target":"es"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["details"], json!({ "status": 500, "body": "oops" }));
    }

    #[tokio::test]
    async fn test_in_body_policy_keeps_200_for_upstream_failures() {
        let failing = MockProvider::new(MockMode::Error(TranslateError::UpstreamContractViolation {
            reason: "missing 'translatedText' field".to_string(),
            body: "{}".to_string(),
        }));
        let (status, body) = send(
            app_with(&failing, ErrorStatusPolicy::InBody),
            post_json("/translate", r#"{"q":"hello","source":"en","target":"es"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["details"], json!({ "body": "{}" }));
    }

    #[tokio::test]
    async fn test_status_route() {
        let app = app_with(&hola_mock(), ErrorStatusPolicy::InBody);
        let response = app
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Server is live");
    }

    #[tokio::test]
    async fn test_permissive_cors_preflight() {
        let app = app_with(&hola_mock(), ErrorStatusPolicy::InBody);
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/translate")
                    .header(header::ORIGIN, "https://anywhere.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_allow_list_cors() {
        let cors = cors_layer(&["http://localhost:5173".to_string()]).unwrap();
        let state = AppState {
            translator: Translator::new(Arc::new(hola_mock()), Duration::from_millis(200)),
            error_status: ErrorStatusPolicy::InBody,
        };
        let app = router(state, cors);

        let allowed = app
            .clone()
            .oneshot(
                with_origin(
                    post_json("/translate", r#"{"q":"hello","source":"en","target":"es"}"#),
                    "http://localhost:5173",
                ),
            )
            .await
            .unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );

        let denied = app
            .oneshot(
                with_origin(
                    post_json("/translate", r#"{"q":"hello","source":"en","target":"es"}"#),
                    "https://evil.example",
                ),
            )
            .await
            .unwrap();
        assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    fn with_origin(mut request: Request<Body>, origin: &str) -> Request<Body> {
        request
            .headers_mut()
            .insert(header::ORIGIN, HeaderValue::from_str(origin).unwrap());
        request
    }

    #[test]
    fn test_invalid_origin_is_configuration_error() {
        match cors_layer(&["bad\norigin".to_string()]) {
            Err(TranslateError::Configuration(msg)) => assert!(msg.contains("allowed origin")),
            other => panic!("Expected Configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_with_libretranslate_stub() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(body_json(json!({ "q": "hello", "source": "en", "target": "es", "format": "text" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "translatedText": "hola" })))
            .expect(2)
            .mount(&server)
            .await;

        let config = ProviderConfig::new(
            ProviderKind::LibreTranslate,
            Some(format!("{}/translate", server.uri()).as_str()),
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        let state = AppState {
            translator: Translator::from_config(&config).unwrap(),
            error_status: ErrorStatusPolicy::InBody,
        };
        let app = router(state, CorsLayer::permissive());

        let body = r#"{"q":"hello","source":"en","target":"es","format":"text"}"#;
        let (_, first) = send(app.clone(), post_json("/translate", body)).await;
        let (_, second) = send(app, post_json("/translate", body)).await;

        assert_eq!(first, json!({ "translatedText": "hola" }));
        assert_eq!(first, second);
    }
}
