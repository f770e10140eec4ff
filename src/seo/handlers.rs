use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use super::{
    dto::{SeoRequest, SeoSuggestions},
    services,
};
use crate::{error::AppError, extract::AppJson, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/seo/suggestions", post(suggest))
}

/// If the client goes away the handler future is dropped, which also drops
/// the outbound model request.
#[instrument(skip(state, payload))]
pub async fn suggest(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SeoRequest>,
) -> Result<Json<SeoSuggestions>, AppError> {
    let out = services::suggest(state.generator.as_ref(), payload).await?;
    Ok(Json(out))
}
