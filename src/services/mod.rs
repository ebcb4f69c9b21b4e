pub mod db;
pub mod exif_service;
pub mod fs_service;
pub mod location_service;
pub mod media_service;
pub mod registry_service;
pub mod upload_processor;
pub mod watcher;
