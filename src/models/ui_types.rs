use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Map,
    List,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Map => "map",
            ViewMode::List => "list",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "map" => Ok(ViewMode::Map),
            "list" => Ok(ViewMode::List),
            other => Err(format!("Unknown view mode: {}", other)),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard ordering. Unknown keys are kept so the selector can leave the
/// order untouched for them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(into = "String", from = "String")]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    LatDesc,
    LngDesc,
    Other(String),
}

impl SortKey {
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::DateDesc => "date_desc",
            SortKey::DateAsc => "date_asc",
            SortKey::LatDesc => "lat_desc",
            SortKey::LngDesc => "lng_desc",
            SortKey::Other(s) => s,
        }
    }
}

impl From<String> for SortKey {
    fn from(s: String) -> Self {
        match s.as_str() {
            "date_desc" => SortKey::DateDesc,
            "date_asc" => SortKey::DateAsc,
            "lat_desc" => SortKey::LatDesc,
            "lng_desc" => SortKey::LngDesc,
            _ => SortKey::Other(s),
        }
    }
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        SortKey::from(s.to_string())
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Toast {
    pub id: String,
    pub message: String,
    pub kind: ToastKind,
}
