pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

use cli::{Cli, Commands, DashboardArgs};
use config::AppConfig;
use error::AppError;
use services::media_service::CloudinaryUploader;
use services::registry_service::HttpPlantRegistry;
use services::upload_processor::{ProcessorOptions, UploadProcessor};
use state::AppStore;
use std::sync::Arc;

/// Everything a command needs: the store plus the two remote clients.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub store: AppStore,
    pub registry: Arc<HttpPlantRegistry>,
    pub media: Arc<CloudinaryUploader>,
}

impl AppContext {
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let db = config.open_database()?;
        let store = AppStore::load(db, config.toast_ttl())?;
        let client = config.http_client()?;

        let registry = Arc::new(HttpPlantRegistry::new(client.clone(), &config.registry_url));
        let media = Arc::new(CloudinaryUploader::new(
            client,
            config.media_url.clone(),
            config.cloud_name.clone(),
            config.upload_preset.clone(),
        ));

        Ok(Self {
            config,
            store,
            registry,
            media,
        })
    }

    pub fn processor(&self) -> UploadProcessor {
        UploadProcessor::new(
            self.store.clone(),
            self.media.clone(),
            self.registry.clone(),
            ProcessorOptions {
                exif_fallback: self.config.exif_fallback,
            },
        )
    }
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    let ctx = AppContext::from_config(cli.config)?;

    match cli.command.unwrap_or(Commands::Dashboard(DashboardArgs::default())) {
        Commands::Login { email } => commands::session::login(&ctx, &email),
        Commands::Logout => commands::session::logout(&ctx),
        Commands::Whoami => commands::session::whoami(&ctx),
        Commands::Upload { paths, json } => commands::upload::upload(&ctx, &paths, json).await,
        Commands::Watch { dir } => commands::watch::watch(&ctx, &dir).await,
        Commands::Dashboard(args) => commands::dashboard::dashboard(&ctx, &args).await,
        Commands::Prefs(args) => commands::prefs::prefs(&ctx, &args),
        Commands::Inspect { file } => commands::inspect::inspect(&file),
    }
}
