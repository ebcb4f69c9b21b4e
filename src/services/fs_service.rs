use crate::error::AppError;
use crate::models::fs_types::{DropReport, ImageCandidate, RejectedFile};
use crate::models::upload_types::{SourceFile, UploadItem};
use crate::state::{AppStore, QueueAction};
use image::ImageFormat;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Sniff the header; only real JPEG and PNG content is accepted.
pub fn detect_mime(path: &Path) -> Result<&'static str, AppError> {
    let mut header = Vec::with_capacity(16);
    File::open(path)
        .map_err(|e| AppError {
            message: format!("Failed to open {}: {}", path.display(), e),
        })?
        .take(16)
        .read_to_end(&mut header)?;

    match image::guess_format(&header) {
        Ok(ImageFormat::Jpeg) => Ok("image/jpeg"),
        Ok(ImageFormat::Png) => Ok("image/png"),
        Ok(other) => Err(format!("Unsupported image format {:?}", other).into()),
        Err(_) => Err("Not a JPEG or PNG image".into()),
    }
}

/// Expand the dropped paths into image files. Directories are walked
/// recursively and their images sorted by name; hidden entries are skipped.
pub fn collect_images(paths: &[PathBuf]) -> (Vec<ImageCandidate>, Vec<RejectedFile>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_image_file(e.path()))
                .map(|e| e.into_path())
                .collect();
            found.sort_by(|a, b| {
                a.file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_lowercase()
                    .cmp(&b.file_name().unwrap_or_default().to_string_lossy().to_lowercase())
            });
            for file in found {
                check_file(&file, &mut accepted, &mut rejected);
            }
        } else if !is_image_file(path) {
            rejected.push(RejectedFile {
                path: path.clone(),
                reason: "Only JPG and PNG files are supported".to_string(),
            });
        } else {
            check_file(path, &mut accepted, &mut rejected);
        }
    }

    (accepted, rejected)
}

fn check_file(path: &Path, accepted: &mut Vec<ImageCandidate>, rejected: &mut Vec<RejectedFile>) {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            rejected.push(RejectedFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };
    match detect_mime(path) {
        Ok(mime) => accepted.push(ImageCandidate {
            path: path.to_path_buf(),
            size,
            mime,
        }),
        Err(e) => rejected.push(RejectedFile {
            path: path.to_path_buf(),
            reason: e.message,
        }),
    }
}

/// The dropzone: accept images into the upload queue as idle items.
///
/// A file whose name is already queued, or that repeats an earlier name in
/// the same drop, is skipped without an error.
pub fn enqueue_files(store: &AppStore, paths: &[PathBuf]) -> DropReport {
    let (candidates, rejected) = collect_images(paths);
    for r in &rejected {
        warn!("Rejected {}: {}", r.path.display(), r.reason);
    }

    let mut report = DropReport {
        rejected,
        ..DropReport::default()
    };
    let mut batch_names = HashSet::new();
    let mut items = Vec::new();

    store.read(|state| {
        for candidate in candidates {
            let file = SourceFile::from_path(&candidate.path, candidate.size);
            if state.upload.contains_name(&file.name) || !batch_names.insert(file.name.clone()) {
                debug!("Skipping duplicate {}", file.name);
                report.duplicates.push(file.name);
                continue;
            }
            report.queued.push(file.name.clone());
            items.push(UploadItem::new(file));
        }
    });

    if !items.is_empty() {
        store.dispatch(QueueAction::Append(items));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DEFAULT_TOAST_TTL;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F', 0];

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_image_file(Path::new("a/B.JPG")));
        assert!(is_image_file(Path::new("leaf.png")));
        assert!(!is_image_file(Path::new("leaf.gif")));
        assert!(!is_image_file(Path::new("README")));
    }

    #[test]
    fn content_must_match_jpeg_or_png() {
        let dir = tempfile::tempdir().unwrap();
        let png = write(dir.path(), "ok.png", PNG_MAGIC);
        let fake = write(dir.path(), "fake.jpg", b"GIF89a......");
        assert_eq!(detect_mime(&png).unwrap(), "image/png");
        assert!(detect_mime(&fake).is_err());
    }

    #[test]
    fn directories_expand_sorted_and_skip_hidden() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.jpg", JPEG_MAGIC);
        write(dir.path(), "nested/A.png", PNG_MAGIC);
        write(dir.path(), ".cache/c.jpg", JPEG_MAGIC);
        write(dir.path(), "notes.txt", b"hello");

        let (accepted, rejected) = collect_images(&[dir.path().to_path_buf()]);
        let names: Vec<_> = accepted
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["A.png", "b.jpg"]);
        assert!(rejected.is_empty());
    }

    #[test]
    fn duplicate_names_in_one_drop_keep_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(dir.path(), "field1/rose.jpg", JPEG_MAGIC);
        let second = write(dir.path(), "field2/rose.jpg", JPEG_MAGIC);
        let store = AppStore::new(DEFAULT_TOAST_TTL);

        let report = enqueue_files(&store, &[first.clone(), second]);

        assert_eq!(report.queued, ["rose.jpg"]);
        assert_eq!(report.duplicates, ["rose.jpg"]);
        let queue = store.snapshot().upload;
        assert_eq!(queue.items.len(), 1);
        assert_eq!(queue.items[0].file.path, first);
    }

    #[test]
    fn names_already_queued_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let rose = write(dir.path(), "rose.jpg", JPEG_MAGIC);
        let fern = write(dir.path(), "fern.png", PNG_MAGIC);
        let store = AppStore::new(DEFAULT_TOAST_TTL);

        enqueue_files(&store, &[rose.clone()]);
        let report = enqueue_files(&store, &[rose, fern]);

        assert_eq!(report.queued, ["fern.png"]);
        assert_eq!(store.snapshot().upload.items.len(), 2);
    }

    #[test]
    fn unsupported_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let gif = write(dir.path(), "anim.gif", b"GIF89a");
        let store = AppStore::new(DEFAULT_TOAST_TTL);

        let report = enqueue_files(&store, &[gif]);
        assert!(report.queued.is_empty());
        assert_eq!(report.rejected.len(), 1);
        assert!(store.snapshot().upload.items.is_empty());
    }
}
