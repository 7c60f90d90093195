use serde::{Deserialize, Serialize};

/// Body of a tracking submission (beacon → endpoint).
///
/// Only `slug` is required; `website` and `uniqueId` are accepted when
/// present. Absent fields deserialize to their defaults so that payload
/// validation can answer with the documented 400 instead of a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackViewRequest {
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, rename = "uniqueId", skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
}

/// Happy-path response of the tracking endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackViewResponse {
    pub success: bool,
    #[serde(rename = "viewCount")]
    pub view_count: i64,
    pub message: String,
}
