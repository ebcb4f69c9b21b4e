use crate::models::plant_types::Coordinates;
use regex::Regex;
use std::sync::OnceLock;

fn filename_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"(?i)latitude_(-?\d+(?:\.\d+)?)_longitude_(-?\d+(?:\.\d+)?)").ok()
        })
        .as_ref()
}

/// Coordinates embedded in a file name, e.g.
/// `photo_latitude_12.34_longitude_56.78.jpg`.
pub fn coordinates_from_filename(name: &str) -> Option<Coordinates> {
    let caps = filename_pattern()?.captures(name)?;
    let latitude = caps.get(1)?.as_str().parse().ok()?;
    let longitude = caps.get(2)?.as_str().parse().ok()?;
    Some(Coordinates::new(latitude, longitude))
}
