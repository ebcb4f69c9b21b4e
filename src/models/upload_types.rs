use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub type ItemId = Uuid;

/// Lifecycle of one queued image. Variants are declared in pipeline order.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UploadStatus {
    Idle,
    Uploading,
    Uploaded,
    GpsProcessing,
    Saving,
    Saved,
    Error,
}

impl UploadStatus {
    fn rank(self) -> u8 {
        match self {
            UploadStatus::Idle => 0,
            UploadStatus::Uploading => 1,
            UploadStatus::Uploaded => 2,
            UploadStatus::GpsProcessing => 3,
            UploadStatus::Saving => 4,
            UploadStatus::Saved => 5,
            UploadStatus::Error => 6,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Saved | UploadStatus::Error)
    }

    /// Items only move forward; `Uploading` may repeat to carry progress ticks.
    pub fn can_advance_to(self, next: UploadStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == UploadStatus::Error {
            return true;
        }
        if self == UploadStatus::Uploading && next == UploadStatus::Uploading {
            return true;
        }
        next.rank() > self.rank()
    }

    pub fn label(self) -> &'static str {
        match self {
            UploadStatus::Idle => "waiting",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Uploaded => "uploaded",
            UploadStatus::GpsProcessing => "extracting GPS",
            UploadStatus::Saving => "saving",
            UploadStatus::Saved => "saved",
            UploadStatus::Error => "failed",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl SourceFile {
    pub fn from_path(path: &Path, size: u64) -> Self {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self {
            name,
            path: path.to_path_buf(),
            size,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UploadItem {
    pub id: ItemId,
    pub file: SourceFile,
    pub preview_url: String,
    pub status: UploadStatus,
    pub progress: u8,
    pub error: Option<String>,
    pub image_url: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl UploadItem {
    pub fn new(file: SourceFile) -> Self {
        let preview_url = format!("file://{}", file.path.display());
        Self {
            id: Uuid::new_v4(),
            file,
            preview_url,
            status: UploadStatus::Idle,
            progress: 0,
            error: None,
            image_url: None,
            lat: None,
            lng: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_moves_forward_only() {
        use UploadStatus::*;
        assert!(Idle.can_advance_to(Uploading));
        assert!(Uploading.can_advance_to(Uploading));
        assert!(Uploading.can_advance_to(Uploaded));
        assert!(Uploaded.can_advance_to(GpsProcessing));
        assert!(GpsProcessing.can_advance_to(Saving));
        assert!(Saving.can_advance_to(Saved));
        assert!(!Uploaded.can_advance_to(Uploading));
        assert!(!GpsProcessing.can_advance_to(Idle));
        assert!(!Saving.can_advance_to(Saving));
    }

    #[test]
    fn error_reachable_from_every_live_state() {
        use UploadStatus::*;
        for status in [Idle, Uploading, Uploaded, GpsProcessing, Saving] {
            assert!(status.can_advance_to(Error), "{status:?}");
        }
        assert!(!Saved.can_advance_to(Error));
        assert!(!Error.can_advance_to(Error));
    }

    #[test]
    fn new_item_starts_idle_with_preview() {
        let item = UploadItem::new(SourceFile::from_path(Path::new("/tmp/fern.png"), 42));
        assert_eq!(item.status, UploadStatus::Idle);
        assert_eq!(item.progress, 0);
        assert_eq!(item.file.name, "fern.png");
        assert_eq!(item.preview_url, "file:///tmp/fern.png");
    }
}
