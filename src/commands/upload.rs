use crate::error::AppError;
use crate::models::fs_types::DropReport;
use crate::models::upload_types::UploadStatus;
use crate::services::fs_service;
use crate::ui::{queue_view, QueueView};
use crate::AppContext;
use console::style;
use std::path::PathBuf;
use tracing::warn;

/// Queue `paths`, run every item through the pipeline and report the outcome.
pub async fn upload(ctx: &AppContext, paths: &[PathBuf], json: bool) -> Result<(), AppError> {
    super::require_session(&ctx.store)?;

    let report = fs_service::enqueue_files(&ctx.store, paths);
    if !json {
        print_report(&report);
    }
    if report.queued.is_empty() {
        if json {
            print_json(ctx, &report)?;
        }
        return Err("No images to upload".into());
    }

    let mut view = if json { QueueView::hidden() } else { QueueView::new() };
    let mut changes = ctx.store.subscribe();
    let done = futures::future::join_all(ctx.processor().pump());
    tokio::pin!(done);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut interrupted = false;
    loop {
        view.render(&ctx.store.snapshot());
        tokio::select! {
            _ = &mut done => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                warn!("Interrupted; unfinished uploads are abandoned");
                interrupted = true;
                break;
            }
        }
    }

    let state = ctx.store.snapshot();
    view.render(&state);
    view.clear();

    if json {
        print_json(ctx, &report)?;
    } else {
        println!("{}", queue_view::summary(&state));
    }

    let failed = state.upload.count(UploadStatus::Error);
    if interrupted {
        Err("Upload interrupted".into())
    } else if failed > 0 {
        Err(format!("{} upload(s) failed", failed).into())
    } else {
        Ok(())
    }
}

fn print_report(report: &DropReport) {
    if !report.queued.is_empty() {
        println!("Queued {} image(s)", report.queued.len());
    }
    for name in &report.duplicates {
        println!("{} {} (already queued)", style("skipped").yellow(), name);
    }
    for rejected in &report.rejected {
        println!(
            "{} {}: {}",
            style("rejected").red(),
            rejected.path.display(),
            rejected.reason
        );
    }
}

fn print_json(ctx: &AppContext, report: &DropReport) -> Result<(), AppError> {
    let state = ctx.store.snapshot();
    let out = serde_json::json!({
        "duplicates": report.duplicates,
        "rejected": report.rejected,
        "items": state.upload.items,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
