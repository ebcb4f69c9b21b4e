//! Application state: three independently reduced slices behind one handle.
//!
//! Reducers (`SessionState::reduce`, `UploadQueue::reduce`, `UiState::reduce`)
//! are pure. `AppStore` applies them under a lock, writes the persisted slices
//! through to SQLite, and bumps a `watch` counter so subscribers (the upload
//! processor, the progress renderer) can react to every change.

pub mod selectors;
pub mod session;
pub mod ui;
pub mod upload_queue;

use crate::error::AppError;
use crate::models::ui_types::{SortKey, ToastKind, ViewMode};
use crate::models::upload_types::{UploadItem, UploadStatus};
use crate::services::db::{
    Database, KEY_SEARCH_QUERY, KEY_SORT_BY, KEY_USER_EMAIL, KEY_VIEW_MODE,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, warn};

pub use session::{SessionAction, SessionState};
pub use ui::{UiAction, UiState};
pub use upload_queue::{QueueAction, UploadQueue};

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct AppState {
    pub session: SessionState,
    pub upload: UploadQueue,
    pub ui: UiState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Session(SessionAction),
    Queue(QueueAction),
    Ui(UiAction),
}

impl From<SessionAction> for Action {
    fn from(action: SessionAction) -> Self {
        Action::Session(action)
    }
}

impl From<QueueAction> for Action {
    fn from(action: QueueAction) -> Self {
        Action::Queue(action)
    }
}

impl From<UiAction> for Action {
    fn from(action: UiAction) -> Self {
        Action::Ui(action)
    }
}

impl AppState {
    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::Session(a) => self.session.reduce(a),
            Action::Queue(a) => self.upload.reduce(a),
            Action::Ui(a) => self.ui.reduce(a),
        }
    }
}

#[derive(Clone)]
pub struct AppStore {
    state: Arc<Mutex<AppState>>,
    changes: watch::Sender<u64>,
    storage: Option<Database>,
    toast_ttl: Duration,
}

impl AppStore {
    /// A store with no durable storage behind it.
    pub fn new(toast_ttl: Duration) -> Self {
        Self::with_state(AppState::default(), None, toast_ttl)
    }

    /// Restore the session and dashboard preferences saved by earlier runs.
    pub fn load(storage: Database, toast_ttl: Duration) -> Result<Self, AppError> {
        let mut state = AppState::default();
        state.session.email_id = storage
            .get_setting(KEY_USER_EMAIL)?
            .filter(|email| !email.is_empty());

        if let Some(mode) = storage.get_setting(KEY_VIEW_MODE)? {
            match mode.parse::<ViewMode>() {
                Ok(mode) => state.ui.view_mode = mode,
                Err(e) => warn!("Ignoring stored view mode: {}", e),
            }
        }
        if let Some(sort) = storage.get_setting(KEY_SORT_BY)? {
            state.ui.sort_by = SortKey::from(sort);
        }
        if let Some(query) = storage.get_setting(KEY_SEARCH_QUERY)? {
            state.ui.search_query = query;
        }

        Ok(Self::with_state(state, Some(storage), toast_ttl))
    }

    fn with_state(state: AppState, storage: Option<Database>, toast_ttl: Duration) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(state)),
            changes,
            storage,
            toast_ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bump(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// Reduce `action`, then write persisted slices through to storage.
    pub fn commit(&self, action: impl Into<Action>) -> Result<(), AppError> {
        let action = action.into();
        self.lock().reduce(&action);
        self.bump();
        self.persist(&action)
    }

    /// Like [`Self::commit`], for callers that cannot act on a storage failure.
    pub fn dispatch(&self, action: impl Into<Action>) {
        if let Err(e) = self.commit(action) {
            error!("Failed to persist state change: {}", e);
        }
    }

    fn persist(&self, action: &Action) -> Result<(), AppError> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        match action {
            Action::Session(SessionAction::SetEmail(email)) => {
                storage.set_setting(KEY_USER_EMAIL, email)?
            }
            Action::Session(SessionAction::Logout) => storage.delete_setting(KEY_USER_EMAIL)?,
            Action::Ui(UiAction::SetViewMode(mode)) => {
                storage.set_setting(KEY_VIEW_MODE, mode.as_str())?
            }
            Action::Ui(UiAction::SetSortBy(key)) => storage.set_setting(KEY_SORT_BY, key.as_str())?,
            Action::Ui(UiAction::SetSearchQuery(query)) => {
                storage.set_setting(KEY_SEARCH_QUERY, query)?
            }
            _ => {}
        }
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.lock())
    }

    pub fn session_email(&self) -> Option<String> {
        self.read(|s| s.session.email_id.clone())
    }

    /// Move every idle item to `Uploading` in one critical section and hand
    /// them back, so a concurrent rescan never picks the same item twice.
    pub fn claim_idle(&self) -> Vec<UploadItem> {
        let claimed: Vec<UploadItem> = {
            let mut state = self.lock();
            let ids = state.upload.idle_ids();
            for id in &ids {
                state.upload.reduce(&QueueAction::progress(*id, 0));
            }
            ids.iter()
                .filter_map(|id| state.upload.get(*id).cloned())
                .filter(|item| item.status == UploadStatus::Uploading)
                .collect()
        };
        if !claimed.is_empty() {
            self.bump();
        }
        claimed
    }

    /// Push a transient notification that removes itself after the toast TTL.
    pub fn notify(&self, message: impl Into<String>, kind: ToastKind) {
        let action = UiAction::toast(message, kind);
        let UiAction::AddToast(toast) = &action else {
            return;
        };
        debug!(kind = ?kind, "Toast: {}", toast.message);
        let id = toast.id.clone();
        self.dispatch(action);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let store = self.clone();
            let ttl = self.toast_ttl;
            handle.spawn(async move {
                tokio::time::sleep(ttl).await;
                store.dispatch(UiAction::RemoveToast(id));
            });
        }
    }
}
