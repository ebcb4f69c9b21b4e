use crate::models::plant_types::Plant;
use console::style;
use serde_json::{json, Value};

const NAME_WIDTH: usize = 32;

/// Plain table of records in the order given.
pub fn render_list(plants: &[Plant]) -> String {
    if plants.is_empty() {
        return "No plants found.".to_string();
    }

    let mut out = format!(
        "{:<w$}  {:>10}  {:>11}  {:<20}  {}\n",
        "IMAGE",
        "LATITUDE",
        "LONGITUDE",
        "UPLOADED",
        "URL",
        w = NAME_WIDTH
    );
    for plant in plants {
        out.push_str(&format!(
            "{:<w$}  {:>10.5}  {:>11.5}  {:<20}  {}\n",
            truncate(&plant.image_name, NAME_WIDTH),
            plant.latitude,
            plant.longitude,
            short_timestamp(&plant.uploaded_at),
            plant.image_url,
            w = NAME_WIDTH
        ));
    }
    out.push_str(&format!("{} plant(s)", plants.len()));
    out
}

/// Map view as a GeoJSON `FeatureCollection` of points.
pub fn render_geojson(plants: &[Plant]) -> Value {
    let features: Vec<Value> = plants
        .iter()
        .map(|plant| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [plant.longitude, plant.latitude],
                },
                "properties": {
                    "id": plant.id,
                    "imageName": plant.image_name,
                    "imageUrl": plant.image_url,
                    "uploadedAt": plant.uploaded_at,
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

pub fn load_failure() -> String {
    style("Failed to load plant data.").red().to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

fn short_timestamp(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
