use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{dto::SaveCategoryRequest, services};
use crate::{
    blogs::queries,
    error::AppError,
    extract::{AppJson, AppPath},
    state::AppState,
    store::{Blog, Category},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/:slug", get(get_category))
        .route("/categories/:slug/blogs", get(category_blogs))
        .route("/dashboard/categories", post(create_category))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(services::categories(state.store.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(services::category_by_slug(state.store.as_ref(), &slug).await?))
}

/// Published posts of the category; unknown slug gives `[]`.
#[instrument(skip(state))]
pub async fn category_blogs(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<Vec<Blog>>, AppError> {
    Ok(Json(queries::by_category(state.store.as_ref(), &slug).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = services::save_category(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
