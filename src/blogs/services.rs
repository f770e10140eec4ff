use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::dto::SaveBlogRequest;
use crate::{
    error::AppError,
    events::ContentChanged,
    slug::is_valid_slug,
    state::AppState,
    store::{AuthorFilter, Blog, BlogData, BlogStatus, CategoryFilter, StoreError},
    validation::{is_blank, is_valid_url, non_blank, ValidationErrors},
};

pub const MIN_CONTENT_CHARS: usize = 100;

/// A blog form that passed every field check. The author is filled in later.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBlog {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub image_hint: Option<String>,
    pub category_id: Uuid,
    pub status: BlogStatus,
    pub is_top_blog: Option<bool>,
    pub tags: Vec<String>,
    pub meta_description: Option<String>,
}

impl ValidBlog {
    fn into_data(self, author_id: Uuid) -> BlogData {
        BlogData {
            title: self.title,
            slug: self.slug,
            content: self.content,
            excerpt: self.excerpt,
            image_url: self.image_url,
            image_hint: self.image_hint,
            category_id: self.category_id,
            author_id,
            status: self.status,
            is_top_blog: self.is_top_blog,
            tags: self.tags,
            meta_description: self.meta_description,
        }
    }
}

/// `"a, b,, c "` → `["a", "b", "c"]`.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Pure form check; touches no storage.
pub fn validate_blog(input: SaveBlogRequest) -> Result<ValidBlog, AppError> {
    let mut errors = ValidationErrors::new();

    if is_blank(&input.title) {
        errors.add("title", "Title is required.");
    }
    if !is_valid_url(&input.image_url) {
        errors.add("imageUrl", "Please enter a valid image URL.");
    }
    if input.content.chars().count() < MIN_CONTENT_CHARS {
        errors.add(
            "content",
            format!("Content must be at least {MIN_CONTENT_CHARS} characters."),
        );
    }

    let category_id = if is_blank(&input.category) {
        errors.add("category", "Category is required.");
        None
    } else {
        match input.category.trim().parse::<Uuid>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add("category", "Category is not a valid identifier.");
                None
            }
        }
    };

    let status = match input.status.parse::<BlogStatus>() {
        Ok(s) => Some(s),
        Err(_) => {
            let allowed = BlogStatus::ALL.map(BlogStatus::as_str).join(", ");
            errors.add("status", format!("Status must be one of: {allowed}."));
            None
        }
    };

    let slug = input.slug.trim();
    if slug.is_empty() {
        errors.add("slug", "Slug is required.");
    } else if !is_valid_slug(slug) {
        errors.add(
            "slug",
            "Slug may only contain lowercase letters, digits and single hyphens.",
        );
    }
    if is_blank(&input.excerpt) {
        errors.add("excerpt", "Excerpt is required.");
    }

    let (Some(category_id), Some(status)) = (category_id, status) else {
        return Err(AppError::Validation(errors));
    };
    errors.into_result()?;

    Ok(ValidBlog {
        title: input.title.trim().to_string(),
        slug: slug.to_string(),
        content: input.content,
        excerpt: input.excerpt.trim().to_string(),
        image_url: input.image_url.trim().to_string(),
        image_hint: input.image_hint.map(|h| h.trim().to_string()),
        category_id,
        status,
        is_top_blog: input.is_top_blog,
        tags: parse_tags(input.tags.as_deref()),
        meta_description: non_blank(input.meta_description),
    })
}

/// Creates a post, or updates `id` when given.
///
/// The category must exist and the post is attributed to the configured
/// placeholder author.
pub async fn save_blog(
    st: &AppState,
    id: Option<Uuid>,
    input: SaveBlogRequest,
) -> Result<Blog, AppError> {
    let valid = validate_blog(input)?;

    let Some(category) = st
        .store
        .find_category(&CategoryFilter::by_id(valid.category_id))
        .await?
    else {
        let mut errors = ValidationErrors::new();
        errors.add("category", "Selected category does not exist.");
        return Err(AppError::Validation(errors));
    };

    let author = st
        .store
        .find_author(&AuthorFilter::by_id(st.config.default_author_id))
        .await?
        .ok_or_else(|| {
            error!(author_id = %st.config.default_author_id, "placeholder author missing");
            AppError::NotFound("Author")
        })?;

    let data = valid.into_data(author.id);
    let slug = data.slug.clone();
    let result = match id {
        Some(id) => st.store.update_blog(id, data).await,
        None => {
            st.store
                .insert_blog(data.into_record(Uuid::new_v4(), OffsetDateTime::now_utc()))
                .await
        }
    };

    let record = match result {
        Ok(r) => r,
        Err(StoreError::Duplicate { field: "slug" }) => {
            warn!(%slug, "blog slug already in use");
            return Err(AppError::DuplicateSlug);
        }
        Err(StoreError::NotFound) => {
            warn!(blog_id = ?id, "update of unknown blog");
            return Err(AppError::NotFound("Blog"));
        }
        Err(e) => return Err(AppError::Store(e)),
    };

    info!(blog_id = %record.id, %slug, created = id.is_none(), "blog saved");
    st.events.publish(ContentChanged::blog(record.id));

    Ok(Blog::resolve(record, category, author))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ContentKind, BLOG_VIEWS};
    use crate::seed::PLACEHOLDER_AUTHOR_ID;
    use crate::store::{Author, BlogFilter, Category};

    fn form(category: Uuid, slug: &str) -> SaveBlogRequest {
        SaveBlogRequest {
            title: "Rust for Web Services".into(),
            slug: slug.into(),
            content: format!("<p>{}</p>", "Ownership makes servers reliable. ".repeat(5)),
            excerpt: "Why Rust fits the backend.".into(),
            image_url: "https://picsum.photos/seed/rust/800/600".into(),
            image_hint: None,
            category: category.to_string(),
            status: "published".into(),
            tags: Some(" rust, web ,, axum ".into()),
            meta_description: Some("   ".into()),
            is_top_blog: None,
        }
    }

    async fn seeded() -> (AppState, Category) {
        let st = AppState::fake();
        st.store
            .insert_author(Author {
                id: PLACEHOLDER_AUTHOR_ID,
                name: "Jane Doe".into(),
                avatar_url: "https://i.pravatar.cc/150?u=1".into(),
            })
            .await
            .unwrap();
        let category = st
            .store
            .insert_category(Category {
                id: Uuid::new_v4(),
                name: "Technology".into(),
                slug: "technology".into(),
                hero_image_url: None,
            })
            .await
            .unwrap();
        (st, category)
    }

    #[test]
    fn tags_are_split_trimmed_and_compacted() {
        assert_eq!(parse_tags(Some(" rust, web ,, axum ")), ["rust", "web", "axum"]);
        assert!(parse_tags(Some(" , ")).is_empty());
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let err = validate_blog(SaveBlogRequest {
            slug: "Not A Slug".into(),
            status: "archived".into(),
            content: "too short".into(),
            image_url: "nope".into(),
            category: "cat-1".into(),
            ..SaveBlogRequest::default()
        })
        .unwrap_err();

        for field in ["title", "imageUrl", "content", "category", "status", "slug", "excerpt"] {
            assert!(!err.field_messages(field).is_empty(), "no message for {field}");
        }
    }

    #[test]
    fn content_needs_one_hundred_characters() {
        let mut input = form(Uuid::new_v4(), "ok");
        input.content = "x".repeat(99);
        assert!(!validate_blog(input.clone())
            .unwrap_err()
            .field_messages("content")
            .is_empty());

        input.content = "x".repeat(100);
        assert!(validate_blog(input).is_ok());
    }

    #[test]
    fn valid_form_is_normalised() {
        let category = Uuid::new_v4();
        let valid = validate_blog(form(category, "rust-for-web")).unwrap();
        assert_eq!(valid.category_id, category);
        assert_eq!(valid.status, BlogStatus::Published);
        assert_eq!(valid.tags, ["rust", "web", "axum"]);
        assert_eq!(valid.meta_description, None);
    }

    #[tokio::test]
    async fn create_resolves_refs_and_announces_the_change() {
        let (st, category) = seeded().await;
        let mut rx = st.events.subscribe();

        let blog = save_blog(&st, None, form(category.id, "rust-for-web"))
            .await
            .unwrap();
        assert_eq!(blog.category, category);
        assert_eq!(blog.author.id, PLACEHOLDER_AUTHOR_ID);
        assert_eq!(blog.views, 0);
        assert!(!blog.is_top_blog);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, ContentKind::Blog);
        assert_eq!(event.id, blog.id);
        assert_eq!(event.stale_views, BLOG_VIEWS);
    }

    #[tokio::test]
    async fn duplicate_slug_fails_without_writing() {
        let (st, category) = seeded().await;
        save_blog(&st, None, form(category.id, "taken")).await.unwrap();
        let mut rx = st.events.subscribe();

        let mut second = form(category.id, "taken");
        second.title = "Another post".into();
        let err = save_blog(&st, None, second).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateSlug));
        let all = st.store.find_blogs(&BlogFilter::all()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Rust for Web Services");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn update_cannot_steal_another_slug() {
        let (st, category) = seeded().await;
        save_blog(&st, None, form(category.id, "first")).await.unwrap();
        let second = save_blog(&st, None, form(category.id, "second")).await.unwrap();

        let err = save_blog(&st, Some(second.id), form(category.id, "first"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateSlug));

        let stored = st
            .store
            .find_blog(&BlogFilter::by_id(second.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.slug, "second");
    }

    #[tokio::test]
    async fn update_changes_fields_and_status_freely() {
        let (st, category) = seeded().await;
        let created = save_blog(&st, None, form(category.id, "post")).await.unwrap();

        let mut edit = form(category.id, "post-renamed");
        edit.status = "draft".into();
        edit.title = "Renamed".into();
        let updated = save_blog(&st, Some(created.id), edit).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.slug, "post-renamed");
        assert_eq!(updated.status, BlogStatus::Draft);
        assert_eq!(updated.created_at, created.created_at);

        let mut back = form(category.id, "post-renamed");
        back.status = "private".into();
        let private = save_blog(&st, Some(created.id), back).await.unwrap();
        assert_eq!(private.status, BlogStatus::Private);
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found() {
        let (st, category) = seeded().await;
        let err = save_blog(&st, Some(Uuid::new_v4()), form(category.id, "ghost"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound("Blog")));
        assert!(st.store.find_blogs(&BlogFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_id_with_taken_slug_is_not_found() {
        let (st, category) = seeded().await;
        save_blog(&st, None, form(category.id, "already-here")).await.unwrap();
        let mut rx = st.events.subscribe();

        let err = save_blog(&st, Some(Uuid::new_v4()), form(category.id, "already-here"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound("Blog")));
        assert_eq!(st.store.find_blogs(&BlogFilter::all()).await.unwrap().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_category_is_a_field_error() {
        let (st, _) = seeded().await;
        let err = save_blog(&st, None, form(Uuid::new_v4(), "orphan"))
            .await
            .unwrap_err();
        assert!(!err.field_messages("category").is_empty());
    }

    #[tokio::test]
    async fn validation_runs_before_the_store() {
        let st = AppState::fake();
        let err = save_blog(&st, None, SaveBlogRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_placeholder_author_is_not_found() {
        let st = AppState::fake();
        let category = st
            .store
            .insert_category(Category {
                id: Uuid::new_v4(),
                name: "Design".into(),
                slug: "design".into(),
                hero_image_url: None,
            })
            .await
            .unwrap();
        let err = save_blog(&st, None, form(category.id, "nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Author")));
    }
}
