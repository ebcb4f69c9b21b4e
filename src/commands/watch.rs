use crate::error::AppError;
use crate::services::watcher::FolderWatcher;
use crate::ui::{queue_view, QueueView};
use crate::AppContext;
use console::style;
use std::path::Path;

/// Treat `dir` as a drop target until Ctrl-C.
pub async fn watch(ctx: &AppContext, dir: &Path) -> Result<(), AppError> {
    super::require_session(&ctx.store)?;

    let watcher = FolderWatcher::watch(dir, ctx.store.clone())?;
    let processor = ctx.processor().spawn();
    println!(
        "Watching {} for new images {}",
        style(watcher.path().display()).bold(),
        style("(Ctrl-C to stop)").dim()
    );

    let mut view = QueueView::new();
    let mut changes = ctx.store.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        view.render(&ctx.store.snapshot());
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    processor.abort();
    drop(watcher);
    view.clear();
    println!("{}", queue_view::summary(&ctx.store.snapshot()));
    Ok(())
}
