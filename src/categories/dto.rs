use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hero_image_url: String,
}
