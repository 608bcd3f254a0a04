//! HTTP client for the persona worker API.
//!
//! Implements both capabilities against a worker backend:
//!
//! - `POST {base}/api/generate-personas` with `{ brand_context, count }`
//!   returns `{ personas: [...] }`
//! - `POST {base}/api/evaluate` with `{ persona, creative, brand_context }`
//!   returns one raw reaction

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use adpanel_core::brand::BrandContext;
use adpanel_core::config::CapabilityConfig;
use adpanel_core::creative::Creative;
use adpanel_core::error::{PanelError, Result};
use adpanel_core::persona::{PanelGenerator, Persona, PersonaDescriptor};
use adpanel_core::reaction::{RawReaction, ReactionEvaluator};

const GENERATE_ENDPOINT: &str = "api/generate-personas";
const EVALUATE_ENDPOINT: &str = "api/evaluate";

#[derive(Serialize)]
struct GeneratePersonasRequest<'a> {
    brand_context: &'a BrandContext,
    count: usize,
}

#[derive(Deserialize)]
struct GeneratePersonasResponse {
    #[serde(default)]
    personas: Vec<PersonaDescriptor>,
}

#[derive(Serialize)]
struct EvaluateRequest<'a> {
    persona: &'a Persona,
    creative: &'a Creative,
    brand_context: &'a BrandContext,
}

#[derive(Clone)]
pub struct WorkerApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WorkerApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Builds a client from the capability config.
    ///
    /// # Returns
    ///
    /// - `Ok(WorkerApiClient)`: `base_url` is set
    /// - `Err(PanelError::Config)`: No base URL configured
    pub fn from_config(config: &CapabilityConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| PanelError::config("worker base_url is not configured"))?;
        Ok(Self::new(base_url, config.api_key.clone()))
    }

    fn post<T: Serialize + ?Sized>(&self, endpoint: &str, payload: &T) -> RequestBuilder {
        let request = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint))
            .json(payload);
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Sends the request and decodes a successful JSON body.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies are all
    /// reported through `to_error` so each capability keeps its own error
    /// kind.
    async fn send<R, F>(&self, request: RequestBuilder, endpoint: &str, to_error: F) -> Result<R>
    where
        R: DeserializeOwned,
        F: Fn(String) -> PanelError,
    {
        let response: Response = request
            .send()
            .await
            .map_err(|e| to_error(format!("request to {} failed: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(to_error(format!(
                "{} returned status {}: {}",
                endpoint, status, body
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| to_error(format!("invalid response from {}: {}", endpoint, e)))
    }
}

#[async_trait::async_trait]
impl PanelGenerator for WorkerApiClient {
    async fn generate(&self, brand: &BrandContext, count: usize) -> Result<Vec<PersonaDescriptor>> {
        tracing::debug!("[WorkerApiClient] Requesting {} personas", count);
        let request = self.post(
            GENERATE_ENDPOINT,
            &GeneratePersonasRequest {
                brand_context: brand,
                count,
            },
        );
        let response: GeneratePersonasResponse =
            self.send(request, GENERATE_ENDPOINT, PanelError::PanelGeneration).await?;
        Ok(response.personas)
    }
}

#[async_trait::async_trait]
impl ReactionEvaluator for WorkerApiClient {
    async fn evaluate(
        &self,
        persona: &Persona,
        creative: &Creative,
        brand: &BrandContext,
    ) -> Result<RawReaction> {
        let request = self.post(
            EVALUATE_ENDPOINT,
            &EvaluateRequest {
                persona,
                creative,
                brand_context: brand,
            },
        );
        self.send(request, EVALUATE_ENDPOINT, PanelError::Evaluation).await
    }
}
