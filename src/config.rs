use crate::error::AppError;
use crate::services::db::Database;
use crate::services::media_service::DEFAULT_MEDIA_URL;
use crate::services::registry_service::DEFAULT_REGISTRY_URL;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "plant-locator";
const DB_FILE: &str = "plant-locator.db";

/// Runtime settings. Every option can also come from the environment or a
/// `.env` file in the working directory.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Base URL of the plant registry API
    #[arg(long, env = "PLANT_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL, global = true)]
    pub registry_url: String,

    /// Base URL of the hosted media upload API
    #[arg(long, env = "PLANT_MEDIA_URL", default_value = DEFAULT_MEDIA_URL, global = true)]
    pub media_url: String,

    /// Media service account (cloud) name
    #[arg(long, env = "CLOUDINARY_CLOUD_NAME", global = true, hide_env_values = true)]
    pub cloud_name: Option<String>,

    /// Unsigned upload preset
    #[arg(long, env = "CLOUDINARY_UPLOAD_PRESET", global = true, hide_env_values = true)]
    pub upload_preset: Option<String>,

    /// Where the session and preferences database lives
    #[arg(long, env = "PLANT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Dashboard refresh interval in seconds
    #[arg(long, env = "PLANT_POLL_SECS", default_value_t = 30, global = true)]
    pub poll_secs: u64,

    /// How long notifications stay visible, in seconds
    #[arg(long, env = "PLANT_TOAST_SECS", default_value_t = 5, global = true)]
    pub toast_secs: u64,

    /// Fall back to GPS tags in the local file's EXIF data
    #[arg(long, env = "PLANT_EXIF_FALLBACK", global = true)]
    pub exif_fallback: bool,
}

impl AppConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs.max(1))
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.toast_secs)
    }

    pub fn open_database(&self) -> Result<Database, AppError> {
        let dir = self.data_dir();
        std::fs::create_dir_all(&dir).map_err(|e| AppError {
            message: format!("Failed to create data directory {}: {}", dir.display(), e),
        })?;
        Ok(Database::new(dir.join(DB_FILE))?)
    }

    pub fn http_client(&self) -> Result<reqwest::Client, AppError> {
        Ok(reqwest::Client::builder()
            .user_agent(concat!("plant-locator/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }
}
