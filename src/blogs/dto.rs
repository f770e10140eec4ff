use serde::{Deserialize, Serialize};

/// Blog editor form. Missing fields deserialize as empty so they surface as
/// field-level validation messages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlogRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_hint: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    /// Comma-separated.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub is_top_blog: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub published: usize,
    pub draft: usize,
    pub private: usize,
}

#[derive(Debug, Deserialize)]
pub struct SlugifyRequest {
    pub text: String,
}

/// `valid` is false when the derived slug would fail blog slug validation,
/// e.g. it keeps an underscore or a leading hyphen.
#[derive(Debug, Serialize)]
pub struct SlugifyResponse {
    pub slug: String,
    pub valid: bool,
}
