use crate::error::AppError;
use crate::models::exif_types::ExifData;
use crate::models::plant_types::Coordinates;
use exif::{Exif, In, Tag};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

pub fn read_exif(path: &Path) -> Result<ExifData, AppError> {
    let file = File::open(path).map_err(|e| AppError {
        message: format!("Failed to open file: {}", e),
    })?;

    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader)?;

    let mut data = ExifData::default();

    if let Some(field) = exif.get_field(Tag::Make, In::PRIMARY) {
        data.camera_make = Some(field.display_value().to_string().trim_matches('"').to_string());
    }
    if let Some(field) = exif.get_field(Tag::Model, In::PRIMARY) {
        data.camera_model = Some(field.display_value().to_string().trim_matches('"').to_string());
    }
    if let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) {
        data.date_taken = Some(field.display_value().to_string().trim_matches('"').to_string());
    }
    data.width = dimension(&exif, Tag::PixelXDimension);
    data.height = dimension(&exif, Tag::PixelYDimension);

    if let Some(coords) = gps_from_exif(&exif) {
        data.gps_latitude = Some(coords.latitude);
        data.gps_longitude = Some(coords.longitude);
    }

    Ok(data)
}

/// Read GPS coordinates from the EXIF block in the first 128KB of the file.
pub fn read_gps(path: &Path) -> Option<Coordinates> {
    let file = File::open(path).ok()?;

    let mut header_buf = Vec::with_capacity(128 * 1024);
    file.take(128 * 1024).read_to_end(&mut header_buf).ok()?;

    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(&header_buf))
        .ok()?;

    gps_from_exif(&exif).filter(Coordinates::is_usable)
}

fn gps_from_exif(exif: &Exif) -> Option<Coordinates> {
    let lat_field = exif.get_field(Tag::GPSLatitude, In::PRIMARY)?;
    let lat_ref = exif.get_field(Tag::GPSLatitudeRef, In::PRIMARY)?;
    let lon_field = exif.get_field(Tag::GPSLongitude, In::PRIMARY)?;
    let lon_ref = exif.get_field(Tag::GPSLongitudeRef, In::PRIMARY)?;

    let latitude = parse_gps_coord(&lat_field.value, &lat_ref.display_value().to_string())?;
    let longitude = parse_gps_coord(&lon_field.value, &lon_ref.display_value().to_string())?;
    Some(Coordinates::new(latitude, longitude))
}

fn dimension(exif: &Exif, tag: Tag) -> Option<u32> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        exif::Value::Long(ref v) => v.first().copied(),
        exif::Value::Short(ref v) => v.first().map(|&x| x as u32),
        _ => None,
    }
}

fn parse_gps_coord(value: &exif::Value, reference: &str) -> Option<f64> {
    if let exif::Value::Rational(ref rationals) = value {
        if rationals.len() >= 3 {
            let degrees = rationals[0].to_f64();
            let minutes = rationals[1].to_f64();
            let seconds = rationals[2].to_f64();
            let mut coord = degrees + minutes / 60.0 + seconds / 3600.0;
            let ref_clean = reference.trim_matches('"').trim();
            if ref_clean == "S" || ref_clean == "W" {
                coord = -coord;
            }
            return Some(coord);
        }
    }
    None
}
