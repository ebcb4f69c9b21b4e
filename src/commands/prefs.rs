use crate::cli::PrefsArgs;
use crate::error::AppError;
use crate::models::ui_types::SortKey;
use crate::state::UiAction;
use crate::AppContext;

/// Persist dashboard preferences, then print the effective set.
pub fn prefs(ctx: &AppContext, args: &PrefsArgs) -> Result<(), AppError> {
    if let Some(view) = args.view {
        ctx.store.commit(UiAction::SetViewMode(view))?;
    }
    if let Some(sort) = &args.sort {
        ctx.store.commit(UiAction::SetSortBy(SortKey::from(sort.as_str())))?;
    }
    if let Some(search) = &args.search {
        ctx.store.commit(UiAction::SetSearchQuery(search.trim().to_string()))?;
    }

    let ui = ctx.store.snapshot().ui;
    println!("view:   {}", ui.view_mode);
    println!("sort:   {}", ui.sort_by);
    println!(
        "search: {}",
        if ui.search_query.is_empty() { "(none)" } else { ui.search_query.as_str() }
    );
    Ok(())
}
