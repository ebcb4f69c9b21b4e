use crate::cli::DashboardArgs;
use crate::error::AppError;
use crate::models::plant_types::Plant;
use crate::models::ui_types::{SortKey, ViewMode};
use crate::services::registry_service::PlantRegistry;
use crate::state::selectors::filter_plants;
use crate::state::AppStore;
use crate::ui::plant_view;
use crate::AppContext;
use tracing::{debug, error};

/// Flags override the stored preferences for this run only.
struct ViewPrefs {
    view: ViewMode,
    sort: SortKey,
    search: String,
    json: bool,
}

impl ViewPrefs {
    fn resolve(store: &AppStore, args: &DashboardArgs) -> Self {
        let ui = store.snapshot().ui;
        Self {
            view: args.view.unwrap_or(ui.view_mode),
            sort: args.sort.as_deref().map(SortKey::from).unwrap_or(ui.sort_by),
            search: args.search.clone().unwrap_or(ui.search_query),
            json: args.json,
        }
    }

    fn render(&self, plants: &[Plant]) -> Result<String, AppError> {
        let visible = filter_plants(Some(plants), &self.search, &self.sort);
        if self.json {
            return Ok(serde_json::to_string_pretty(&visible)?);
        }
        Ok(match self.view {
            ViewMode::List => plant_view::render_list(&visible),
            ViewMode::Map => serde_json::to_string_pretty(&plant_view::render_geojson(&visible))?,
        })
    }
}

/// Fetch once (cached listing allowed) and render.
async fn load_once(
    registry: &dyn PlantRegistry,
    email: &str,
    prefs: &ViewPrefs,
) -> Result<String, AppError> {
    let plants = registry.list_records(email).await.map_err(|e| {
        error!("Listing plants for {} failed: {}", email, e);
        AppError::from("Failed to load plant data.")
    })?;
    prefs.render(&plants)
}

pub async fn dashboard(ctx: &AppContext, args: &DashboardArgs) -> Result<(), AppError> {
    let email = super::require_session(&ctx.store)?;
    let prefs = ViewPrefs::resolve(&ctx.store, args);

    if !args.watch {
        println!("{}", load_once(ctx.registry.as_ref(), &email, &prefs).await?);
        return Ok(());
    }

    let mut ticker = tokio::time::interval(ctx.config.poll_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match ctx.registry.refresh_records(&email).await {
                    Ok(plants) => {
                        debug!("Refreshed {} plant records", plants.len());
                        println!("{}", prefs.render(&plants)?);
                    }
                    Err(e) => {
                        error!("Listing plants for {} failed: {}", email, e);
                        eprintln!("{}", plant_view::load_failure());
                    }
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
    Ok(())
}
