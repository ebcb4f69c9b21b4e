use crate::error::AppError;
use crate::services::fs_service;
use crate::state::AppStore;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// A folder that acts as a persistent drop target. New or rewritten images
/// are queued once no filesystem event has arrived for `DEBOUNCE`, so a file
/// still being written keeps pushing its own enqueue back.
pub struct FolderWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
    path: PathBuf,
}

impl FolderWatcher {
    pub fn watch(path: &Path, store: AppStore) -> Result<Self, AppError> {
        if !path.is_dir() {
            return Err(format!("Not a directory: {}", path.display()).into());
        }

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<PathBuf>();

        let task = tokio::spawn(async move {
            let mut rx = rx;
            loop {
                let Some(first) = rx.recv().await else {
                    break;
                };
                let mut pending = BTreeSet::from([first]);
                while let Ok(Some(next)) = tokio::time::timeout(DEBOUNCE, rx.recv()).await {
                    pending.insert(next);
                }

                let paths: Vec<PathBuf> = pending.into_iter().filter(|p| p.is_file()).collect();
                if paths.is_empty() {
                    continue;
                }
                let report = fs_service::enqueue_files(&store, &paths);
                if !report.queued.is_empty() {
                    info!("Queued {} new image(s) from watched folder", report.queued.len());
                }
            }
        });

        let watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) => {
                        for path in event.paths {
                            if fs_service::is_image_file(&path) {
                                let _ = tx.send(path);
                            }
                        }
                    }
                    _ => {}
                }
            }
        });

        let mut watcher = match watcher {
            Ok(w) => w,
            Err(e) => {
                task.abort();
                return Err(format!("Failed to create watcher: {}", e).into());
            }
        };
        if let Err(e) = watcher.watch(path, RecursiveMode::NonRecursive) {
            task.abort();
            return Err(format!("Failed to watch folder {}: {}", path.display(), e).into());
        }
        debug!("Watching {}", path.display());

        Ok(Self {
            _watcher: watcher,
            task,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FolderWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DEFAULT_TOAST_TTL;

    #[tokio::test]
    async fn rejects_missing_directory() {
        let store = AppStore::new(DEFAULT_TOAST_TTL);
        let err = FolderWatcher::watch(Path::new("/definitely/not/here"), store).err();
        assert!(err.is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn new_images_are_queued() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppStore::new(DEFAULT_TOAST_TTL);
        let watcher = FolderWatcher::watch(dir.path(), store.clone()).unwrap();
        assert_eq!(watcher.path(), dir.path());

        std::fs::write(
            dir.path().join("leaf.png"),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0],
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let mut queued = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if !store.snapshot().upload.items.is_empty() {
                queued = true;
                break;
            }
        }
        assert!(queued, "watched folder did not queue the new image");
        let items = store.snapshot().upload.items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].file.name, "leaf.png");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn slow_writes_are_queued_once_complete() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let store = AppStore::new(DEFAULT_TOAST_TTL);
        let _watcher = FolderWatcher::watch(dir.path(), store.clone()).unwrap();

        let path = dir.path().join("slow.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]).unwrap();
        // Eight chunks spread over well past one debounce window.
        for _ in 0..8 {
            tokio::time::sleep(Duration::from_millis(80)).await;
            assert!(
                store.snapshot().upload.items.is_empty(),
                "queued while the file was still being written"
            );
            let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(&[7u8; 64 * 1024]).unwrap();
        }
        let final_size = std::fs::metadata(&path).unwrap().len();

        let mut items = Vec::new();
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            items = store.snapshot().upload.items;
            if !items.is_empty() {
                break;
            }
        }
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].file.size, final_size);
    }
}
