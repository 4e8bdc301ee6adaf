use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generation::GenerationResult;
use crate::settings::Settings;

/// A finished generation together with the settings snapshot that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub image_url: String,
    pub settings: Settings,
    pub prompt: String,
}

impl HistoryItem {
    pub fn from_result(result: GenerationResult, settings: Settings) -> Self {
        Self::at(result, settings, Utc::now())
    }

    pub fn at(result: GenerationResult, settings: Settings, created_at: DateTime<Utc>) -> Self {
        let timestamp = created_at.timestamp_millis();
        Self {
            id: timestamp.to_string(),
            timestamp,
            image_url: result.image_url,
            settings,
            prompt: result.prompt,
        }
    }
}
