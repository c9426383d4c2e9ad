//! HTTP surface: routing, request handlers, and error mapping
//!
//! Serves the static landing page at `/` and the measurement endpoint at
//! `/generate-measurement`. All handler failures collapse to HTTP 500 with a
//! `{"detail": ...}` body embedding the underlying failure description.

use crate::{
    error::{AppError, Result},
    generation::{GenerationClient, MeasurementGenerator},
    logging::Logger,
    models::{Config, Location, Measurement},
    region::Region,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeFile,
};
use uuid::Uuid;

/// Shared application state for request handlers
pub struct AppState {
    pub generator: Arc<dyn MeasurementGenerator>,
    pub logger: Logger,
}

/// JSON error surface for the measurement endpoint
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        // Network failures, malformed upstream JSON, and schema mismatches
        // all collapse to the same 500 response.
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("Failed to generate data: {}", error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

/// Build the application router
pub fn build_router(config: &Config, generator: Arc<dyn MeasurementGenerator>) -> Router {
    let state = Arc::new(AppState {
        generator,
        logger: Logger::with_config("HTTP", config),
    });

    // Permissive CORS, matching the original page host (handy when the page
    // is opened directly from the filesystem). Credentials are not allowed
    // together with wildcard origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let index = PathBuf::from(&config.static_dir).join("index.html");

    Router::new()
        .route_service("/", ServeFile::new(index))
        .route("/generate-measurement", post(generate_measurement))
        .layer(cors)
        .with_state(state)
}

/// Generate a synthetic measurement for the submitted coordinates
async fn generate_measurement(
    State(state): State<Arc<AppState>>,
    Json(location): Json<Location>,
) -> std::result::Result<Json<Measurement>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let region = Region::classify_location(&location);

    state
        .logger
        .info(&format!("Generating measurement for {}", region.label()))
        .correlation_id(&request_id)
        .field("latitude", location.latitude)
        .field("longitude", location.longitude)
        .log();

    let measurement = state
        .generator
        .generate(&location, region)
        .await
        .map_err(|error| {
            state
                .logger
                .error(&format!("Measurement generation failed: {}", error))
                .correlation_id(&request_id)
                .error_info(&error)
                .log();
            ApiError::from(error)
        })?;

    state
        .logger
        .info("Measurement generated")
        .correlation_id(&request_id)
        .field("location_name", measurement.location_name.clone())
        .log();

    Ok(Json(measurement))
}

/// Bind the configured address and serve until shutdown
pub async fn run(config: Config) -> Result<()> {
    let generator: Arc<dyn MeasurementGenerator> = Arc::new(GenerationClient::new(&config)?);
    let router = build_router(&config, generator);

    let addr = config.listen_socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::network(format!("Failed to bind {}: {}", addr, e)))?;

    let logger = Logger::with_config("HTTP", &config);
    logger
        .info(&format!("Listening on http://{}", addr))
        .field("static_dir", config.static_dir.clone())
        .log();

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    /// Generator stub with a fixed outcome
    struct StubGenerator {
        outcome: std::result::Result<Measurement, String>,
    }

    #[async_trait]
    impl MeasurementGenerator for StubGenerator {
        async fn generate(&self, _location: &Location, _region: Region) -> Result<Measurement> {
            match &self.outcome {
                Ok(measurement) => Ok(measurement.clone()),
                Err(message) => Err(AppError::http_request(message.clone())),
            }
        }
    }

    fn test_config(static_dir: &str) -> Config {
        Config {
            api_key: "test-key".to_string(),
            static_dir: static_dir.to_string(),
            ..Default::default()
        }
    }

    fn sample_measurement() -> Measurement {
        Measurement {
            location_name: "X".to_string(),
            latency_ms: 1.0,
            jitter_ms: 2.0,
            packet_loss_pct: 0.01,
        }
    }

    fn router_with(outcome: std::result::Result<Measurement, String>, static_dir: &str) -> Router {
        let config = test_config(static_dir);
        build_router(&config, Arc::new(StubGenerator { outcome }))
    }

    fn measurement_request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate-measurement")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"latitude": 19.07, "longitude": 72.87}"#))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_measurement_success() {
        let router = router_with(Ok(sample_measurement()), "static");

        let response = router.oneshot(measurement_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "location_name": "X",
                "latency_ms": 1.0,
                "jitter_ms": 2.0,
                "packet_loss_pct": 0.01
            })
        );
    }

    #[tokio::test]
    async fn test_generate_measurement_failure_maps_to_500() {
        let router = router_with(Err("HTTP 503: upstream down".to_string()), "static");

        let response = router.oneshot(measurement_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Failed to generate data:"));
        assert!(detail.contains("upstream down"));
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let router = router_with(Ok(sample_measurement()), "static");

        let mut request = measurement_request();
        request
            .headers_mut()
            .insert(header::ORIGIN, "http://localhost:5500".parse().unwrap());

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_index_page_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>internet weather</html>").unwrap();

        let router = router_with(Ok(sample_measurement()), dir.path().to_str().unwrap());

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("internet weather"));
    }

    #[tokio::test]
    async fn test_missing_index_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_with(Ok(sample_measurement()), dir.path().to_str().unwrap());

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
