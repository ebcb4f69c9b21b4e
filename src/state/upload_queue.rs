use crate::models::upload_types::{ItemId, UploadItem, UploadStatus};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct UploadQueue {
    pub items: Vec<UploadItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueueAction {
    Append(Vec<UploadItem>),
    UpdateStatus {
        id: ItemId,
        status: UploadStatus,
        error: Option<String>,
        progress: Option<u8>,
    },
    UpdateData {
        id: ItemId,
        image_url: Option<String>,
        lat: Option<f64>,
        lng: Option<f64>,
    },
    Remove(ItemId),
    ClearCompleted,
}

impl QueueAction {
    pub fn status(id: ItemId, status: UploadStatus) -> Self {
        QueueAction::UpdateStatus {
            id,
            status,
            error: None,
            progress: None,
        }
    }

    pub fn progress(id: ItemId, progress: u8) -> Self {
        QueueAction::UpdateStatus {
            id,
            status: UploadStatus::Uploading,
            error: None,
            progress: Some(progress),
        }
    }

    pub fn failed(id: ItemId, message: impl Into<String>) -> Self {
        QueueAction::UpdateStatus {
            id,
            status: UploadStatus::Error,
            error: Some(message.into()),
            progress: None,
        }
    }
}

impl UploadQueue {
    pub fn reduce(&mut self, action: &QueueAction) {
        match action {
            QueueAction::Append(items) => self.items.extend(items.iter().cloned()),
            QueueAction::UpdateStatus {
                id,
                status,
                error,
                progress,
            } => {
                let Some(item) = self.items.iter_mut().find(|i| i.id == *id) else {
                    return;
                };
                if !item.status.can_advance_to(*status) {
                    warn!(
                        "Ignoring transition {} -> {} for {}",
                        item.status, status, item.file.name
                    );
                    return;
                }
                item.status = *status;
                if let Some(error) = error {
                    item.error = Some(error.clone());
                }
                if let Some(progress) = progress {
                    item.progress = (*progress).min(100);
                }
            }
            QueueAction::UpdateData {
                id,
                image_url,
                lat,
                lng,
            } => {
                let Some(item) = self.items.iter_mut().find(|i| i.id == *id) else {
                    return;
                };
                if let Some(url) = image_url.as_ref().filter(|u| !u.is_empty()) {
                    item.image_url = Some(url.clone());
                }
                if let Some(lat) = lat.filter(|v| *v != 0.0) {
                    item.lat = Some(lat);
                }
                if let Some(lng) = lng.filter(|v| *v != 0.0) {
                    item.lng = Some(lng);
                }
            }
            QueueAction::Remove(id) => self.items.retain(|i| i.id != *id),
            QueueAction::ClearCompleted => {
                self.items.retain(|i| i.status != UploadStatus::Saved)
            }
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&UploadItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.items.iter().any(|i| i.file.name == name)
    }

    pub fn idle_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|i| i.status == UploadStatus::Idle)
            .map(|i| i.id)
            .collect()
    }

    pub fn all_settled(&self) -> bool {
        self.items.iter().all(|i| i.status.is_terminal())
    }

    pub fn count(&self, status: UploadStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::upload_types::SourceFile;
    use std::path::Path;

    fn item(name: &str) -> UploadItem {
        UploadItem::new(SourceFile::from_path(Path::new(name), 10))
    }

    fn queue_of(names: &[&str]) -> UploadQueue {
        let mut queue = UploadQueue::default();
        queue.reduce(&QueueAction::Append(names.iter().map(|n| item(n)).collect()));
        queue
    }

    #[test]
    fn append_keeps_order_and_unique_ids() {
        let queue = queue_of(&["a.jpg", "b.jpg", "c.jpg"]);
        let names: Vec<_> = queue.items.iter().map(|i| i.file.name.as_str()).collect();
        assert_eq!(names, ["a.jpg", "b.jpg", "c.jpg"]);
        assert_ne!(queue.items[0].id, queue.items[1].id);
    }

    #[test]
    fn clear_completed_keeps_unsaved_in_relative_order() {
        let mut queue = queue_of(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
        let ids: Vec<_> = queue.items.iter().map(|i| i.id).collect();
        for id in [ids[0], ids[2]] {
            for status in [
                UploadStatus::Uploading,
                UploadStatus::Uploaded,
                UploadStatus::GpsProcessing,
                UploadStatus::Saving,
                UploadStatus::Saved,
            ] {
                queue.reduce(&QueueAction::status(id, status));
            }
        }
        queue.reduce(&QueueAction::failed(ids[3], "boom"));

        queue.reduce(&QueueAction::ClearCompleted);

        let left: Vec<_> = queue.items.iter().map(|i| i.id).collect();
        assert_eq!(left, [ids[1], ids[3]]);
    }

    #[test]
    fn backward_transition_is_ignored() {
        let mut queue = queue_of(&["a.jpg"]);
        let id = queue.items[0].id;
        queue.reduce(&QueueAction::status(id, UploadStatus::Uploaded));
        queue.reduce(&QueueAction::progress(id, 40));
        assert_eq!(queue.items[0].status, UploadStatus::Uploaded);
        assert_eq!(queue.items[0].progress, 0);
    }

    #[test]
    fn progress_ticks_update_while_uploading() {
        let mut queue = queue_of(&["a.jpg"]);
        let id = queue.items[0].id;
        queue.reduce(&QueueAction::progress(id, 0));
        queue.reduce(&QueueAction::progress(id, 55));
        assert_eq!(queue.items[0].status, UploadStatus::Uploading);
        assert_eq!(queue.items[0].progress, 55);
    }

    #[test]
    fn error_keeps_message() {
        let mut queue = queue_of(&["a.jpg"]);
        let id = queue.items[0].id;
        queue.reduce(&QueueAction::failed(id, "No GPS data found"));
        assert_eq!(queue.items[0].status, UploadStatus::Error);
        assert_eq!(queue.items[0].error.as_deref(), Some("No GPS data found"));
    }

    #[test]
    fn update_data_skips_empty_values() {
        let mut queue = queue_of(&["a.jpg"]);
        let id = queue.items[0].id;
        queue.reduce(&QueueAction::UpdateData {
            id,
            image_url: Some("https://cdn/a.jpg".into()),
            lat: Some(0.0),
            lng: Some(4.5),
        });
        let item = &queue.items[0];
        assert_eq!(item.image_url.as_deref(), Some("https://cdn/a.jpg"));
        assert_eq!(item.lat, None);
        assert_eq!(item.lng, Some(4.5));
    }

    #[test]
    fn remove_and_unknown_ids() {
        let mut queue = queue_of(&["a.jpg", "b.jpg"]);
        let first = queue.items[0].id;
        queue.reduce(&QueueAction::Remove(first));
        assert_eq!(queue.items.len(), 1);
        assert!(!queue.contains_name("a.jpg"));

        let before = queue.clone();
        queue.reduce(&QueueAction::status(first, UploadStatus::Uploading));
        assert_eq!(queue, before);
    }
}
