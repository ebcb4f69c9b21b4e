use serde::{Deserialize, Serialize};

/// A geotagged plant photograph as stored by the remote registry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(rename = "_id")]
    pub id: String,
    pub email_id: String,
    pub image_name: String,
    pub image_url: String,
    pub latitude: f64,
    pub longitude: f64,
    /// ISO-8601 timestamp.
    pub uploaded_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Zero is what the registry answers when it found nothing, so it never counts.
    pub fn is_usable(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude != 0.0
            && self.longitude != 0.0
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListPlantsRequest<'a> {
    pub email_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ListPlantsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<Plant>>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExtractGpsRequest<'a> {
    pub email_id: &'a str,
    pub image_name: &'a str,
    pub image_url: &'a str,
}

#[derive(Debug, Deserialize, Default)]
pub struct ExtractGpsResponse {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ExtractGpsResponse {
    pub fn coordinates(&self) -> Option<Coordinates> {
        let coords = Coordinates::new(self.latitude?, self.longitude?);
        coords.is_usable().then_some(coords)
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SavePlantRequest<'a> {
    pub email_id: &'a str,
    pub image_name: &'a str,
    pub image_url: &'a str,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct SavePlantResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Plant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plant_uses_registry_field_names() {
        let json = r#"{
            "_id": "abc",
            "emailId": "farmer@example.com",
            "imageName": "rose.jpg",
            "imageUrl": "https://cdn/rose.jpg",
            "latitude": 12.5,
            "longitude": 77.25,
            "uploadedAt": "2024-05-01T10:00:00Z"
        }"#;
        let plant: Plant = serde_json::from_str(json).unwrap();
        assert_eq!(plant.id, "abc");
        assert_eq!(plant.image_name, "rose.jpg");
        assert_eq!(plant.uploaded_at, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn zero_coordinates_are_not_usable() {
        let resp: ExtractGpsResponse =
            serde_json::from_str(r#"{"latitude": 0, "longitude": 0}"#).unwrap();
        assert_eq!(resp.coordinates(), None);

        let resp: ExtractGpsResponse =
            serde_json::from_str(r#"{"latitude": 10.5, "message": "partial"}"#).unwrap();
        assert_eq!(resp.coordinates(), None);

        let resp: ExtractGpsResponse =
            serde_json::from_str(r#"{"latitude": 10.5, "longitude": -3.25}"#).unwrap();
        assert_eq!(resp.coordinates(), Some(Coordinates::new(10.5, -3.25)));
    }

    #[test]
    fn save_request_serializes_camel_case() {
        let req = SavePlantRequest {
            email_id: "a@b.c",
            image_name: "x.jpg",
            image_url: "https://cdn/x.jpg",
            latitude: 1.0,
            longitude: 2.0,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["emailId"], "a@b.c");
        assert_eq!(value["imageUrl"], "https://cdn/x.jpg");
    }
}
