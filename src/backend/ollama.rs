use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    backend::{BackendError, InferenceBackend},
    config::{SamplingParams, Settings},
};

/// Client for an Ollama-compatible model server.
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    probe_timeout: Duration,
    generate_timeout: Duration,
    sampling: SamplingParams,
}

impl OllamaClient {
    pub fn new(settings: &Settings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| BackendError::Other(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            client,
            base_url: settings.ollama_host.trim_end_matches('/').to_owned(),
            model: settings.model.clone(),
            probe_timeout: settings.probe_timeout,
            generate_timeout: settings.generate_timeout,
            sampling: settings.sampling,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn probe(&self) -> Result<Vec<String>, BackendError> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() != StatusCode::OK {
            return Err(map_http_error(response.status(), "/api/tags"));
        }

        let models = response
            .json::<TagsResponse>()
            .await
            .map(|tags| tags.models.into_iter().map(|model| model.name).collect())
            .unwrap_or_default();
        Ok(models)
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn check_availability(&self) -> bool {
        match self.probe().await {
            Ok(models) => {
                debug!(backend = self.name(), models = ?models, "model server reachable");
                true
            }
            Err(error) => {
                warn!(backend = self.name(), url = %self.base_url, error = %error, "model server probe failed");
                false
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        if let Err(error) = self.probe().await {
            warn!(backend = self.name(), error = %error, "model server unavailable before generate");
            return Err(BackendError::Unreachable(error.to_string()));
        }

        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.sampling.temperature,
                "num_predict": self.sampling.num_predict
            }
        });

        debug!(backend = self.name(), model = %self.model, "sending generate request");
        let response = self
            .client
            .post(self.url("/api/generate"))
            .timeout(self.generate_timeout)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(map_http_error(response.status(), "/api/generate"));
        }

        let parsed: GenerateResponse = response.json().await.map_err(map_transport_error)?;
        Ok(parsed
            .response
            .map(|text| text.trim().to_owned())
            .unwrap_or_default())
    }
}

fn map_transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout(error.to_string())
    } else if error.is_connect() {
        BackendError::Unreachable(error.to_string())
    } else if let Some(status) = error.status() {
        map_http_error(status, "")
    } else {
        BackendError::Other(error.to_string())
    }
}

fn map_http_error(status: StatusCode, path: &str) -> BackendError {
    let reason = status.canonical_reason().unwrap_or("unknown status");
    match status {
        StatusCode::NOT_FOUND => {
            BackendError::NotFound(format!("{} {reason} {path}", status.as_u16()).trim_end().to_owned())
        }
        _ => BackendError::Http {
            status: status.as_u16(),
            message: reason.to_owned(),
        },
    }
}

#[derive(Debug, Deserialize, Default)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}
