use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub current_url: String,
    #[serde(default)]
    pub focus_keyword: Option<String>,
}

/// Exactly the four fields the editor reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSuggestions {
    pub suggested_keywords: Vec<String>,
    pub suggested_meta_description: String,
    pub suggested_url: String,
    pub suggestions: String,
}
