use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{ListQuery, SaveBlogRequest, SlugifyRequest, SlugifyResponse, StatusCounts},
    queries, services,
};
use crate::{
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    slug::{is_valid_slug, slugify},
    state::AppState,
    store::Blog,
};

const RECENT_DEFAULT: usize = 10;
const TOP_DEFAULT: usize = 5;
const MAX_LIMIT: usize = 100;

pub fn routes() -> Router<AppState> {
    Router::new()
        // public site
        .route("/blogs", get(list_published))
        .route("/blogs/recent", get(list_recent))
        .route("/blogs/top", get(list_top))
        .route("/blogs/:slug", get(get_blog))
        // dashboard
        .route("/dashboard/blogs", get(list_all).post(create_blog))
        .route("/dashboard/blogs/:id", put(update_blog))
        .route("/dashboard/stats", get(stats))
        .route("/slugify", post(slugify_text))
}

fn limit(q: &ListQuery, default: usize) -> usize {
    q.limit.unwrap_or(default).min(MAX_LIMIT)
}

#[instrument(skip(state))]
pub async fn list_published(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, AppError> {
    Ok(Json(queries::published(state.store.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn list_recent(
    State(state): State<AppState>,
    AppQuery(q): AppQuery<ListQuery>,
) -> Result<Json<Vec<Blog>>, AppError> {
    let blogs = queries::recent(state.store.as_ref(), Some(limit(&q, RECENT_DEFAULT))).await?;
    Ok(Json(blogs))
}

#[instrument(skip(state))]
pub async fn list_top(
    State(state): State<AppState>,
    AppQuery(q): AppQuery<ListQuery>,
) -> Result<Json<Vec<Blog>>, AppError> {
    let blogs = queries::top(state.store.as_ref(), Some(limit(&q, TOP_DEFAULT))).await?;
    Ok(Json(blogs))
}

#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<Blog>, AppError> {
    Ok(Json(queries::by_slug(state.store.as_ref(), &slug).await?))
}

/// Every post regardless of status, for the dashboard table.
#[instrument(skip(state))]
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, AppError> {
    Ok(Json(queries::list_all(state.store.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatusCounts>, AppError> {
    Ok(Json(queries::status_counts(state.store.as_ref()).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_blog(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveBlogRequest>,
) -> Result<(StatusCode, Json<Blog>), AppError> {
    let blog = services::save_blog(&state, None, payload).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

#[instrument(skip(state, payload))]
pub async fn update_blog(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<SaveBlogRequest>,
) -> Result<Json<Blog>, AppError> {
    Ok(Json(services::save_blog(&state, Some(id), payload).await?))
}

/// Editor helper: suggest a slug for a title. The suggestion is not
/// guaranteed to be savable; `valid` says whether it is.
pub async fn slugify_text(AppJson(payload): AppJson<SlugifyRequest>) -> Json<SlugifyResponse> {
    let slug = slugify(&payload.text);
    let valid = is_valid_slug(&slug);
    Json(SlugifyResponse { slug, valid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::load_demo_data;

    async fn demo_state() -> AppState {
        let state = AppState::fake();
        load_demo_data(state.store.as_ref()).await.unwrap();
        state
    }

    #[tokio::test]
    async fn home_lists_use_their_default_sizes() {
        let state = demo_state().await;

        let Json(recent) = list_recent(State(state.clone()), AppQuery(ListQuery { limit: None }))
            .await
            .unwrap();
        assert_eq!(recent.len(), 8);

        let Json(top) = list_top(State(state), AppQuery(ListQuery { limit: None }))
            .await
            .unwrap();
        assert_eq!(top.len(), TOP_DEFAULT);
    }

    #[test]
    fn explicit_limit_is_capped() {
        let q = ListQuery { limit: Some(10_000) };
        assert_eq!(limit(&q, RECENT_DEFAULT), MAX_LIMIT);
        let q = ListQuery { limit: Some(2) };
        assert_eq!(limit(&q, RECENT_DEFAULT), 2);
    }

    #[tokio::test]
    async fn unknown_slug_is_404() {
        let state = demo_state().await;
        let err = get_blog(State(state), AppPath("no-such-post".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dashboard_sees_every_status() {
        let state = demo_state().await;
        let Json(all) = list_all(State(state.clone())).await.unwrap();
        let Json(public) = list_published(State(state.clone())).await.unwrap();
        let Json(counts) = stats(State(state)).await.unwrap();

        assert_eq!(all.len(), 10);
        assert_eq!(public.len(), 8);
        assert_eq!(counts.total, all.len());
    }

    #[tokio::test]
    async fn create_rejects_empty_form_with_400() {
        let err = create_blog(State(AppState::fake()), AppJson(SaveBlogRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn slugify_endpoint() {
        let Json(out) = slugify_text(AppJson(SlugifyRequest {
            text: "  Hello, World!  ".into(),
        }))
        .await;
        assert_eq!(out.slug, "hello-world");
        assert!(out.valid);
    }

    #[tokio::test]
    async fn slugify_flags_previews_a_save_would_reject() {
        let cases = [
            ("snake_case 2024", "snake_case-2024"),
            ("-already-", "-already-"),
        ];
        for (text, expected) in cases {
            let Json(out) = slugify_text(AppJson(SlugifyRequest { text: text.into() })).await;
            assert_eq!(out.slug, expected);
            assert!(!out.valid, "{expected} should be flagged");
        }
    }
}
