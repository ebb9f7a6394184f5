use crate::config::ScorerConfig;
use crate::model::Measurements;
use crate::scorer::{feature_panel, parse_prediction, Scorer, ScorerAssessment, ScorerError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct PredictRequest {
    features: BTreeMap<&'static str, f64>,
}

/// Scorer backed by the `POST {base_url}/predict` HTTP endpoint.
pub struct HttpScorer {
    client: reqwest::blocking::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpScorer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ScorerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ScorerError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/predict", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn from_config(config: &ScorerConfig) -> Result<Self, ScorerError> {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_error(&self, e: reqwest::Error) -> ScorerError {
        if e.is_timeout() {
            ScorerError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ScorerError::Transport(e.to_string())
        }
    }
}

impl Scorer for HttpScorer {
    fn score(&self, measurements: &Measurements) -> Result<ScorerAssessment, ScorerError> {
        let request = PredictRequest {
            features: feature_panel(measurements),
        };
        debug!(endpoint = %self.endpoint, "requesting prediction");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScorerError::Status(status.as_u16()));
        }

        let body = response.bytes().map_err(|e| self.request_error(e))?;
        parse_prediction(&body)
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}
