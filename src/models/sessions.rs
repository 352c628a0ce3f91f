use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in session. The document id doubles as the bearer token.
/// Identity and role are copied from the user at sign-in and not re-read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub id: String,
    pub uid: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    pub login_time: DateTime<Utc>,
}
