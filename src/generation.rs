//! Measurement generation via the external language-model API
//!
//! Builds a natural-language prompt plus a structured-output schema for one
//! location, POSTs both to the generation API, extracts the JSON text
//! embedded in the response envelope, and parses it into a [`Measurement`].
//! Transient failures are retried with exponential backoff.

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{Config, Location, Measurement},
    region::Region,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;

/// Retry and backoff settings for the outbound generation call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled after each failed attempt
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: crate::defaults::DEFAULT_RETRY_ATTEMPTS,
            initial_delay: crate::defaults::DEFAULT_RETRY_INITIAL_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Build the retry policy from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.retry_attempts,
            initial_delay: config.retry_initial_delay(),
        }
    }
}

/// Source of synthetic measurements for a classified location
#[async_trait]
pub trait MeasurementGenerator: Send + Sync {
    /// Generate a measurement for the location, described by its region label
    async fn generate(&self, location: &Location, region: Region) -> Result<Measurement>;
}

/// Request payload for the generation API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

/// Response envelope returned by the generation API.
///
/// Unknown fields (finish reasons, safety ratings, usage metadata) are
/// ignored; only the embedded text is of interest.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

/// Structured-output schema constraining the model to the measurement shape
fn measurement_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "location_name":   {"type": "STRING"},
            "latency_ms":      {"type": "NUMBER"},
            "jitter_ms":       {"type": "NUMBER"},
            "packet_loss_pct": {"type": "NUMBER"}
        },
        "required": ["location_name", "latency_ms", "jitter_ms", "packet_loss_pct"]
    })
}

/// Assemble the prompt text for one location and its region label
fn build_prompt(location: &Location, region: Region) -> String {
    format!(
        "Generate a plausible, single JSON object for internet measurement data for a location. \
         The location is approximately in a {} at latitude {:.2} and longitude {:.2}. \
         The JSON object must have the following keys: 'location_name', 'latency_ms', 'jitter_ms', and 'packet_loss_pct'. \
         The 'location_name' should be a descriptive name like 'City, Country' or 'Rural, Region'. \
         The 'latency_ms' and 'jitter_ms' should be floats and 'packet_loss_pct' should be a float between 0.0 and 1.0. \
         Make the values plausible for the given location type. \
         For example, a major city should have low latency/jitter and near zero packet loss. \
         A rural area might have higher values.",
        region.label(),
        location.latitude,
        location.longitude
    )
}

/// Assemble the full request payload for one location
fn build_payload(location: &Location, region: Region) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: build_prompt(location, region),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: measurement_schema(),
        },
    }
}

/// HTTP client for the generation API with retry and backoff
pub struct GenerationClient {
    client: Client,
    api_base_url: String,
    model: String,
    api_key: String,
    retry: RetryPolicy,
    logger: Logger,
}

impl GenerationClient {
    /// Create a new generation client from application configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_retry_policy(config, RetryPolicy::from_config(config))
    }

    /// Create a new generation client with an explicit retry policy
    pub fn with_retry_policy(config: &Config, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            retry,
            logger: Logger::with_config("GEN", config),
        })
    }

    /// Endpoint URL for the configured model.
    ///
    /// The key travels as a query parameter, which is why request URLs must
    /// never be logged verbatim.
    fn endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base_url, self.model, self.api_key
        )
    }

    /// Issue one generation request and parse the embedded measurement
    async fn request_once(&self, payload: &GenerateContentRequest) -> Result<Measurement> {
        let response = self
            .client
            .post(self.endpoint_url())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(AppError::rate_limited(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    body
                )));
            }
            return Err(AppError::http_request(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let envelope: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::generation(format!("Failed to parse generation API response: {}", e))
        })?;

        let text = envelope
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .ok_or_else(|| {
                AppError::generation("Generation API response contained no candidate text")
            })?;

        let measurement: Measurement = serde_json::from_str(text).map_err(|e| {
            AppError::generation(format!("Embedded measurement text is not valid JSON: {}", e))
        })?;

        Ok(measurement)
    }

    /// Run the request with the configured retry budget.
    ///
    /// Every failure is retried the same way while attempts remain; only the
    /// log line distinguishes rate limiting from other failures. The error
    /// of the final attempt propagates to the caller.
    async fn generate_with_retry(&self, payload: &GenerateContentRequest) -> Result<Measurement> {
        let mut delay = self.retry.initial_delay;

        for attempt in 1..=self.retry.max_attempts {
            match self.request_once(payload).await {
                Ok(measurement) => return Ok(measurement),
                Err(error) => {
                    let message = match &error {
                        AppError::RateLimited(detail) => {
                            format!("Rate limited on attempt {}: {}", attempt, detail)
                        }
                        _ => format!("Attempt {} failed: {}", attempt, error),
                    };
                    self.logger
                        .warn(&message)
                        .field("attempt", attempt)
                        .field("max_attempts", self.retry.max_attempts)
                        .error_info(&error)
                        .log();

                    if attempt == self.retry.max_attempts {
                        return Err(error);
                    }

                    sleep(delay).await;
                    delay *= 2;
                }
            }
        }

        Err(AppError::generation(
            "Failed to generate data after multiple retries",
        ))
    }
}

#[async_trait]
impl MeasurementGenerator for GenerationClient {
    async fn generate(&self, location: &Location, region: Region) -> Result<Measurement> {
        let payload = build_payload(location, region);
        self.generate_with_retry(&payload).await
    }
}
