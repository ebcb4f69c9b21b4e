use crate::models::plant_types::Plant;
use crate::models::ui_types::SortKey;
use chrono::DateTime;

/// Search by image name (case-insensitive substring) and order for display.
/// Sorting is stable; an unrecognised key keeps the registry's order.
pub fn filter_plants(plants: Option<&[Plant]>, search_query: &str, sort_by: &SortKey) -> Vec<Plant> {
    let Some(plants) = plants else {
        return Vec::new();
    };

    let mut result: Vec<Plant> = if search_query.is_empty() {
        plants.to_vec()
    } else {
        let query = search_query.to_lowercase();
        plants
            .iter()
            .filter(|p| p.image_name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    };

    match sort_by {
        SortKey::DateDesc => result.sort_by(|a, b| uploaded_millis(b).cmp(&uploaded_millis(a))),
        SortKey::DateAsc => result.sort_by(|a, b| uploaded_millis(a).cmp(&uploaded_millis(b))),
        SortKey::LatDesc => result.sort_by(|a, b| b.latitude.total_cmp(&a.latitude)),
        SortKey::LngDesc => result.sort_by(|a, b| b.longitude.total_cmp(&a.longitude)),
        SortKey::Other(_) => {}
    }

    result
}

/// Unparseable timestamps count as the oldest possible upload.
fn uploaded_millis(plant: &Plant) -> i64 {
    DateTime::parse_from_rfc3339(&plant.uploaded_at)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(i64::MIN)
}
