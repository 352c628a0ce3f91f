use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceEvaluation {
    #[serde(default)]
    pub id: String,
    pub staff_id: String,
    #[serde(default)]
    pub staff_name: String,
    pub audio_url: String,
    /// Mean of the criterion scores given, `None` when none were.
    pub score: Option<f64>,
    #[serde(default)]
    pub breakdown: BTreeMap<String, u8>,
    #[serde(default)]
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}
