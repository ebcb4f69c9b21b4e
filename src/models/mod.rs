pub mod exif_types;
pub mod fs_types;
pub mod plant_types;
pub mod ui_types;
pub mod upload_types;
