use crate::config::AppConfig;
use crate::models::ui_types::ViewMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "plant-locator")]
#[command(version, about = "Geotag plant photographs and browse where they were taken")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub config: AppConfig,

    /// Defaults to `dashboard`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with your email address
    Login { email: String },
    /// Forget the stored session
    Logout,
    /// Show the signed-in email
    Whoami,
    /// Upload images (files or folders) and save their locations
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print the final queue as JSON
        #[arg(long)]
        json: bool,
    },
    /// Queue every image that appears in a folder until interrupted
    Watch { dir: PathBuf },
    /// Show saved plants as a map (GeoJSON) or a list
    Dashboard(DashboardArgs),
    /// Change the saved dashboard view, sort order or search
    Prefs(PrefsArgs),
    /// Show EXIF and filename location data for a local image
    Inspect { file: PathBuf },
}

#[derive(Args, Debug, Clone, Default)]
pub struct DashboardArgs {
    /// Filter by image name for this run only
    #[arg(short, long)]
    pub search: Option<String>,
    /// date_desc, date_asc, lat_desc or lng_desc, for this run only
    #[arg(long)]
    pub sort: Option<String>,
    /// map or list, for this run only
    #[arg(long)]
    pub view: Option<ViewMode>,
    /// Keep refreshing on the poll interval
    #[arg(short, long)]
    pub watch: bool,
    /// Print the records as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PrefsArgs {
    #[arg(long)]
    pub view: Option<ViewMode>,
    #[arg(long)]
    pub sort: Option<String>,
    /// Pass an empty string to clear
    #[arg(long)]
    pub search: Option<String>,
}
