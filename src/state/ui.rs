use crate::models::ui_types::{SortKey, Toast, ToastKind, ViewMode};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct UiState {
    pub toasts: Vec<Toast>,
    pub view_mode: ViewMode,
    pub search_query: String,
    pub sort_by: SortKey,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    AddToast(Toast),
    RemoveToast(String),
    SetViewMode(ViewMode),
    SetSearchQuery(String),
    SetSortBy(SortKey),
}

impl UiAction {
    /// Builds an `AddToast` with a fresh identifier so the reducer stays deterministic.
    pub fn toast(message: impl Into<String>, kind: ToastKind) -> Self {
        UiAction::AddToast(Toast {
            id: Uuid::new_v4().to_string(),
            message: message.into(),
            kind,
        })
    }
}

impl UiState {
    pub fn reduce(&mut self, action: &UiAction) {
        match action {
            UiAction::AddToast(toast) => self.toasts.push(toast.clone()),
            UiAction::RemoveToast(id) => self.toasts.retain(|t| &t.id != id),
            UiAction::SetViewMode(mode) => self.view_mode = *mode,
            UiAction::SetSearchQuery(query) => self.search_query = query.clone(),
            UiAction::SetSortBy(key) => self.sort_by = key.clone(),
        }
    }
}
