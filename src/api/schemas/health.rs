use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub mode: String,
    /// Provider name to "configured" or "missing".
    pub providers: BTreeMap<String, String>,
    pub local_store: String,
}
