use serde::Serialize;
use std::path::PathBuf;

/// An image file that passed the dropzone checks.
#[derive(Debug, Serialize, Clone)]
pub struct ImageCandidate {
    pub path: PathBuf,
    pub size: u64,
    pub mime: &'static str,
}

#[derive(Debug, Serialize, Clone)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one drop: what was queued, what was skipped as a duplicate name,
/// and what was refused outright.
#[derive(Debug, Serialize, Clone, Default)]
pub struct DropReport {
    pub queued: Vec<String>,
    pub duplicates: Vec<String>,
    pub rejected: Vec<RejectedFile>,
}
