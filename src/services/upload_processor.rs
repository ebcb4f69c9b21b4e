use crate::error::PipelineError;
use crate::models::plant_types::{Coordinates, Plant};
use crate::models::ui_types::ToastKind;
use crate::models::upload_types::{UploadItem, UploadStatus};
use crate::services::exif_service;
use crate::services::location_service::coordinates_from_filename;
use crate::services::media_service::{MediaUploader, ProgressFn};
use crate::services::registry_service::PlantRegistry;
use crate::state::{AppStore, QueueAction};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorOptions {
    /// Read GPS tags from the local file when every other source came up empty.
    pub exif_fallback: bool,
}

/// Drives idle queue items through upload, GPS extraction and saving.
///
/// Every store change triggers a rescan; idle items are claimed under the
/// queue lock and each one then runs as its own task. A failure at any step
/// is final for that item.
#[derive(Clone)]
pub struct UploadProcessor {
    store: AppStore,
    media: Arc<dyn MediaUploader>,
    registry: Arc<dyn PlantRegistry>,
    options: ProcessorOptions,
}

impl UploadProcessor {
    pub fn new(
        store: AppStore,
        media: Arc<dyn MediaUploader>,
        registry: Arc<dyn PlantRegistry>,
        options: ProcessorOptions,
    ) -> Self {
        Self {
            store,
            media,
            registry,
            options,
        }
    }

    /// Start a task for every idle item in the queue.
    pub fn pump(&self) -> Vec<JoinHandle<()>> {
        self.store
            .claim_idle()
            .into_iter()
            .map(|item| {
                let this = self.clone();
                tokio::spawn(async move { this.process_item(item).await })
            })
            .collect()
    }

    /// Rescan on every store change. Runs until aborted.
    pub async fn run(self) {
        let mut changes = self.store.subscribe();
        loop {
            self.pump();
            if changes.changed().await.is_err() {
                break;
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn process_item(&self, item: UploadItem) {
        let id = item.id;
        let name = item.file.name.clone();

        match self.drive(&item).await {
            Ok(plant) => {
                debug!("Saved {} as record {}", name, plant.id);
                self.store.dispatch(QueueAction::status(id, UploadStatus::Saved));
                self.store
                    .notify(format!("Plant {} saved successfully!", name), ToastKind::Success);
            }
            Err(PipelineError::NoGps) => {
                self.store
                    .dispatch(QueueAction::failed(id, PipelineError::NoGps.item_message()));
                self.store
                    .notify(format!("No GPS found for {}", name), ToastKind::Error);
            }
            Err(e) => {
                error!("Processing error for {}: {}", name, e);
                self.store.dispatch(QueueAction::failed(id, e.item_message()));
                self.store
                    .notify(format!("Failed to process {}", name), ToastKind::Error);
            }
        }
    }

    async fn drive(&self, item: &UploadItem) -> Result<Plant, PipelineError> {
        let id = item.id;
        let name = item.file.name.as_str();

        let store = self.store.clone();
        let on_progress: ProgressFn =
            Arc::new(move |progress: u8| store.dispatch(QueueAction::progress(id, progress)));
        let image_url = self.media.upload(&item.file, on_progress).await?;

        self.store.dispatch(QueueAction::UpdateStatus {
            id,
            status: UploadStatus::Uploaded,
            error: None,
            progress: Some(100),
        });
        self.store.dispatch(QueueAction::UpdateData {
            id,
            image_url: Some(image_url.clone()),
            lat: None,
            lng: None,
        });
        self.store
            .dispatch(QueueAction::status(id, UploadStatus::GpsProcessing));

        let email = self
            .store
            .session_email()
            .filter(|email| !email.is_empty())
            .ok_or(PipelineError::MissingSession)?;

        let coords = self
            .resolve_coordinates(&email, item, &image_url)
            .await
            .ok_or(PipelineError::NoGps)?;

        self.store.dispatch(QueueAction::UpdateData {
            id,
            image_url: None,
            lat: Some(coords.latitude),
            lng: Some(coords.longitude),
        });
        self.store.dispatch(QueueAction::status(id, UploadStatus::Saving));

        let plant = self
            .registry
            .save_record(&email, name, &image_url, coords)
            .await?;
        info!(
            "Saved {} at ({}, {})",
            name, coords.latitude, coords.longitude
        );
        Ok(plant)
    }

    /// Registry first, then the file name, then (optionally) local EXIF.
    async fn resolve_coordinates(
        &self,
        email: &str,
        item: &UploadItem,
        image_url: &str,
    ) -> Option<Coordinates> {
        let name = item.file.name.as_str();

        match self
            .registry
            .extract_coordinates(email, name, image_url)
            .await
        {
            Ok(Some(coords)) => return Some(coords),
            Ok(None) => debug!("Registry returned no GPS for {}", name),
            Err(e) => warn!("GPS extraction failed for {}: {}", name, e),
        }

        if let Some(coords) = coordinates_from_filename(name).filter(Coordinates::is_usable) {
            info!("Using coordinates from file name for {}", name);
            return Some(coords);
        }

        if self.options.exif_fallback {
            let path = item.file.path.clone();
            match tokio::task::spawn_blocking(move || exif_service::read_gps(&path)).await {
                Ok(Some(coords)) => {
                    info!("Using EXIF coordinates for {}", name);
                    return Some(coords);
                }
                Ok(None) => {}
                Err(e) => warn!("EXIF read task failed for {}: {}", name, e),
            }
        }

        None
    }
}
