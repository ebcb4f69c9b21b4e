use crate::error::PipelineError;
use crate::models::plant_types::{
    Coordinates, ExtractGpsRequest, ExtractGpsResponse, ListPlantsRequest, ListPlantsResponse,
    Plant, SavePlantRequest, SavePlantResponse,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

pub const DEFAULT_REGISTRY_URL: &str = "https://api.alumnx.com/api/hackathons/";

const EXTRACT_ENDPOINT: &str = "extract-latitude-longitude";
const SAVE_ENDPOINT: &str = "save-plant-location-data";
const LIST_ENDPOINT: &str = "get-plant-location-data";

/// The remote plant registry, keyed by the session email.
#[async_trait]
pub trait PlantRegistry: Send + Sync {
    /// `Ok(None)` when the service answered but had no usable coordinates.
    async fn extract_coordinates(
        &self,
        email: &str,
        image_name: &str,
        image_url: &str,
    ) -> Result<Option<Coordinates>, PipelineError>;

    async fn save_record(
        &self,
        email: &str,
        image_name: &str,
        image_url: &str,
        coords: Coordinates,
    ) -> Result<Plant, PipelineError>;

    async fn list_records(&self, email: &str) -> Result<Vec<Plant>, PipelineError>;

    /// Bypass any cached listing.
    async fn refresh_records(&self, email: &str) -> Result<Vec<Plant>, PipelineError> {
        self.list_records(email).await
    }
}

pub struct HttpPlantRegistry {
    client: reqwest::Client,
    base_url: String,
    cache: Mutex<HashMap<String, Vec<Plant>>>,
}

impl HttpPlantRegistry {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            client,
            base_url,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Plant>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cached_records(&self, email: &str) -> Option<Vec<Plant>> {
        self.cache().get(email).cloned()
    }

    pub fn invalidate(&self, email: &str) {
        self.cache().remove(email);
    }

    async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<reqwest::Response, PipelineError> {
        self.client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| PipelineError::remote(endpoint, e))
    }

    async fn fetch_records(&self, email: &str) -> Result<Vec<Plant>, PipelineError> {
        let response = self
            .post(LIST_ENDPOINT, &ListPlantsRequest { email_id: email })
            .await?;

        let plants = if response.status() == StatusCode::NOT_FOUND {
            // The registry answers 404 until the first record exists.
            Vec::new()
        } else {
            let response = error_for_status(LIST_ENDPOINT, response)?;
            let parsed: ListPlantsResponse = response
                .json()
                .await
                .map_err(|e| PipelineError::remote(LIST_ENDPOINT, e))?;
            match parsed.data {
                Some(data) if parsed.success => data,
                _ => Vec::new(),
            }
        };

        debug!("Fetched {} plant records for {}", plants.len(), email);
        self.cache().insert(email.to_string(), plants.clone());
        Ok(plants)
    }
}

fn error_for_status(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, PipelineError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(PipelineError::remote(endpoint, format!("HTTP {}", status)))
    }
}

#[async_trait]
impl PlantRegistry for HttpPlantRegistry {
    async fn extract_coordinates(
        &self,
        email: &str,
        image_name: &str,
        image_url: &str,
    ) -> Result<Option<Coordinates>, PipelineError> {
        let request = ExtractGpsRequest {
            email_id: email,
            image_name,
            image_url,
        };
        let response = error_for_status(EXTRACT_ENDPOINT, self.post(EXTRACT_ENDPOINT, &request).await?)?;
        let parsed: ExtractGpsResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::remote(EXTRACT_ENDPOINT, e))?;

        let coords = parsed.coordinates();
        if coords.is_none() {
            debug!(
                "No coordinates for {}: {}",
                image_name,
                parsed.message.as_deref().unwrap_or("empty response")
            );
        }
        Ok(coords)
    }

    async fn save_record(
        &self,
        email: &str,
        image_name: &str,
        image_url: &str,
        coords: Coordinates,
    ) -> Result<Plant, PipelineError> {
        let request = SavePlantRequest {
            email_id: email,
            image_name,
            image_url,
            latitude: coords.latitude,
            longitude: coords.longitude,
        };
        let response = error_for_status(SAVE_ENDPOINT, self.post(SAVE_ENDPOINT, &request).await?)?;
        // Accepted by the server: the cached listing is stale whatever the body says.
        self.invalidate(email);

        let parsed: SavePlantResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::remote(SAVE_ENDPOINT, e))?;

        parsed.data.ok_or_else(|| {
            let reason = parsed
                .message
                .unwrap_or_else(|| format!("no record returned (success: {})", parsed.success));
            PipelineError::remote(SAVE_ENDPOINT, reason)
        })
    }

    async fn list_records(&self, email: &str) -> Result<Vec<Plant>, PipelineError> {
        if let Some(plants) = self.cached_records(email) {
            return Ok(plants);
        }
        self.fetch_records(email).await
    }

    async fn refresh_records(&self, email: &str) -> Result<Vec<Plant>, PipelineError> {
        self.fetch_records(email).await
    }
}
