use crate::error::AppError;
use crate::services::{exif_service, location_service};
use std::path::Path;
use tracing::debug;

/// Print what a local image would contribute as a coordinate source.
pub fn inspect(path: &Path) -> Result<(), AppError> {
    if !path.is_file() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    let exif = match exif_service::read_exif(path) {
        Ok(data) => Some(data),
        Err(e) => {
            debug!("No EXIF in {}: {}", path.display(), e);
            None
        }
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let from_name = location_service::coordinates_from_filename(&name);

    let report = serde_json::json!({
        "file": path.display().to_string(),
        "exif": exif,
        "filenameCoordinates": from_name,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
