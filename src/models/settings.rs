use serde::{Deserialize, Serialize};

/// The single stored settings record. The key may be empty, which the
/// summary generator treats as "not configured".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub openai_api_key: String,
}
