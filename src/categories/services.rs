use tracing::{info, warn};
use uuid::Uuid;

use super::dto::SaveCategoryRequest;
use crate::{
    error::AppError,
    events::ContentChanged,
    slug::slugify,
    state::AppState,
    store::{Category, CategoryFilter, ContentStore, StoreError},
    validation::{is_blank, is_valid_url, ValidationErrors},
};

/// All categories, ordered by name.
pub async fn categories(store: &dyn ContentStore) -> Result<Vec<Category>, AppError> {
    Ok(store.find_categories(&CategoryFilter::all()).await?)
}

pub async fn category_by_slug(store: &dyn ContentStore, slug: &str) -> Result<Category, AppError> {
    store
        .find_category(&CategoryFilter::by_slug(slug))
        .await?
        .ok_or(AppError::NotFound("Category"))
}

/// Creates a category whose slug is derived from its name. A clash on either
/// the name or the derived slug is `DuplicateCategory`.
pub async fn save_category(
    st: &AppState,
    input: SaveCategoryRequest,
) -> Result<Category, AppError> {
    let name = input.name.trim().to_string();
    let mut errors = ValidationErrors::new();
    if name.is_empty() {
        errors.add("name", "Name is required.");
    }
    if !is_valid_url(&input.hero_image_url) {
        errors.add("heroImageUrl", "Please enter a valid image URL.");
    }

    let slug = slugify(&name);
    if !is_blank(&name) && slug.is_empty() {
        errors.add("name", "Category name must contain letters or numbers.");
    }
    errors.into_result()?;

    let category = Category {
        id: Uuid::new_v4(),
        name,
        slug,
        hero_image_url: Some(input.hero_image_url.trim().to_string()),
    };

    let saved = match st.store.insert_category(category).await {
        Ok(c) => c,
        Err(StoreError::Duplicate {
            field: field @ ("name" | "slug"),
        }) => {
            warn!(field, "category already exists");
            return Err(AppError::DuplicateCategory);
        }
        Err(e) => return Err(AppError::Store(e)),
    };

    info!(category_id = %saved.id, slug = %saved.slug, "category created");
    st.events.publish(ContentChanged::category(saved.id));
    Ok(saved)
}
