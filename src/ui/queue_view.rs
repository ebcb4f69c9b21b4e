use crate::models::ui_types::{Toast, ToastKind};
use crate::models::upload_types::{ItemId, UploadItem, UploadStatus};
use crate::state::AppState;
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::{HashMap, HashSet};

/// Terminal rendering of the upload queue: one bar per item plus the toast
/// notifications, printed above the bars as they arrive.
pub struct QueueView {
    multi: MultiProgress,
    bars: HashMap<ItemId, ProgressBar>,
    shown_toasts: HashSet<String>,
    style: ProgressStyle,
}

impl QueueView {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Tracks state without drawing anything.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let style = ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:30.green/dim}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: HashMap::new(),
            shown_toasts: HashSet::new(),
            style,
        }
    }

    /// Bring the bars in line with `state`. Safe to call on every change.
    pub fn render(&mut self, state: &AppState) {
        for item in &state.upload.items {
            self.render_item(item);
        }
        for toast in &state.ui.toasts {
            if self.shown_toasts.insert(toast.id.clone()) {
                self.print_line(toast_line(toast));
            }
        }
    }

    fn render_item(&mut self, item: &UploadItem) {
        let bar = self.bars.entry(item.id).or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new(100));
            bar.set_style(self.style.clone());
            bar.set_prefix(item.file.name.clone());
            bar
        });
        if bar.is_finished() {
            return;
        }

        bar.set_position(u64::from(item.progress));
        let message = status_message(item);
        match item.status {
            UploadStatus::Saved => bar.finish_with_message(message),
            // Keep the bar where the upload stopped.
            UploadStatus::Error => bar.abandon_with_message(message),
            _ => bar.set_message(message),
        }
    }

    fn print_line(&self, line: String) {
        if self.multi.println(&line).is_err() {
            eprintln!("{}", line);
        }
    }

    pub fn clear(&self) {
        let _ = self.multi.clear();
    }
}

impl Default for QueueView {
    fn default() -> Self {
        Self::new()
    }
}

fn status_message(item: &UploadItem) -> String {
    match item.status {
        UploadStatus::Saved => match (item.lat, item.lng) {
            (Some(lat), Some(lng)) => format!("{} ({:.5}, {:.5})", style("saved").green(), lat, lng),
            _ => style("saved").green().to_string(),
        },
        UploadStatus::Error => format!(
            "{}: {}",
            style("failed").red(),
            item.error.as_deref().unwrap_or("unknown error")
        ),
        other => style(other.label()).cyan().to_string(),
    }
}

fn toast_line(toast: &Toast) -> String {
    match toast.kind {
        ToastKind::Success => format!("{} {}", style("✔").green(), toast.message),
        ToastKind::Error => format!("{} {}", style("✘").red(), style(&toast.message).red()),
        ToastKind::Info => format!("{} {}", style("ℹ").blue(), toast.message),
    }
}

/// One line per state, e.g. `3 saved, 1 failed`.
pub fn summary(state: &AppState) -> String {
    let saved = state.upload.count(UploadStatus::Saved);
    let failed = state.upload.count(UploadStatus::Error);
    let pending = state.upload.items.len() - saved - failed;
    let mut parts = vec![format!("{} saved", saved)];
    if failed > 0 {
        parts.push(format!("{} failed", failed));
    }
    if pending > 0 {
        parts.push(format!("{} unfinished", pending));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::upload_types::SourceFile;
    use crate::state::{QueueAction, UiAction};
    use std::path::Path;

    fn state_with(names: &[&str]) -> AppState {
        let mut state = AppState::default();
        let items = names
            .iter()
            .map(|n| UploadItem::new(SourceFile::from_path(Path::new(n), 10)))
            .collect();
        state.upload.reduce(&QueueAction::Append(items));
        state
    }

    #[test]
    fn failed_items_keep_their_progress() {
        let mut state = state_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let a = state.upload.items[0].id;
        let b = state.upload.items[1].id;
        state.upload.reduce(&QueueAction::progress(a, 40));
        state.upload.reduce(&QueueAction::failed(a, "Upload or processing failed"));
        state.upload.reduce(&QueueAction::progress(b, 100));
        for status in [
            UploadStatus::Uploaded,
            UploadStatus::GpsProcessing,
            UploadStatus::Saving,
            UploadStatus::Saved,
        ] {
            state.upload.reduce(&QueueAction::status(b, status));
        }

        let mut view = QueueView::hidden();
        view.render(&state);
        assert_eq!(view.bars.len(), 3);
        assert!(view.bars[&a].is_finished());
        assert_eq!(view.bars[&a].position(), 40);
        assert!(view.bars[&b].is_finished());
        assert_eq!(view.bars[&b].position(), 100);
        assert!(!view.bars[&state.upload.items[2].id].is_finished());
    }

    #[test]
    fn bar_template_is_valid() {
        assert!(ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:30.green/dim}] {pos:>3}% {msg}")
            .is_ok());
    }

    #[test]
    fn toasts_are_printed_once() {
        let mut state = state_with(&[]);
        state
            .ui
            .reduce(&UiAction::toast("Plant a.jpg saved successfully!", ToastKind::Success));
        let mut view = QueueView::hidden();
        view.render(&state);
        view.render(&state);
        assert_eq!(view.shown_toasts.len(), 1);
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut state = state_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let a = state.upload.items[0].id;
        state.upload.reduce(&QueueAction::failed(a, "No GPS data found"));
        assert_eq!(summary(&state), "0 saved, 1 failed, 2 unfinished");
    }
}
