//! Read side: view-ready blog lists. Nothing is cached; every call goes to
//! the store.

use std::collections::{HashMap, HashSet};

use tracing::warn;
use uuid::Uuid;

use super::dto::StatusCounts;
use crate::{
    error::AppError,
    store::{
        AuthorFilter, Blog, BlogFilter, BlogRecord, BlogStatus, CategoryFilter, ContentStore,
        StoreError,
    },
};

/// Second step of every read: look up the categories and authors the records
/// point at (one query each) and join them in memory. Records whose
/// references do not resolve are left out.
pub async fn resolve(
    store: &dyn ContentStore,
    records: Vec<BlogRecord>,
) -> Result<Vec<Blog>, StoreError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let category_ids: HashSet<Uuid> = records.iter().map(|r| r.category_id).collect();
    let author_ids: HashSet<Uuid> = records.iter().map(|r| r.author_id).collect();

    let categories: HashMap<_, _> = store
        .find_categories(&CategoryFilter::by_ids(category_ids.into_iter().collect()))
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let authors: HashMap<_, _> = store
        .find_authors(&AuthorFilter::by_ids(author_ids.into_iter().collect()))
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(records
        .into_iter()
        .filter_map(|r| {
            let (Some(category), Some(author)) =
                (categories.get(&r.category_id), authors.get(&r.author_id))
            else {
                warn!(blog_id = %r.id, "blog reference does not resolve; skipped");
                return None;
            };
            Some(Blog::resolve(r, category.clone(), author.clone()))
        })
        .collect())
}

/// Dashboard list: every status, newest first.
pub async fn list_all(store: &dyn ContentStore) -> Result<Vec<Blog>, AppError> {
    let records = store.find_blogs(&BlogFilter::all()).await?;
    Ok(resolve(store, newest_first(records)).await?)
}

/// Public index: published posts, newest first.
pub async fn published(store: &dyn ContentStore) -> Result<Vec<Blog>, AppError> {
    let records = store.find_blogs(&BlogFilter::published()).await?;
    Ok(resolve(store, newest_first(records)).await?)
}

pub async fn by_slug(store: &dyn ContentStore, slug: &str) -> Result<Blog, AppError> {
    let record = store
        .find_blog(&BlogFilter::by_slug(slug))
        .await?
        .ok_or(AppError::NotFound("Blog"))?;
    resolve(store, vec![record])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Blog"))
}

/// Published posts of one category. Unknown category is an empty list.
pub async fn by_category(
    store: &dyn ContentStore,
    category_slug: &str,
) -> Result<Vec<Blog>, AppError> {
    let Some(category) = store
        .find_category(&CategoryFilter::by_slug(category_slug))
        .await?
    else {
        return Ok(Vec::new());
    };
    let records = store
        .find_blogs(&BlogFilter::published().in_category(category.id))
        .await?;
    Ok(resolve(store, newest_first(records)).await?)
}

/// Published posts by `created_at` descending; equal timestamps keep store
/// order.
pub async fn recent(store: &dyn ContentStore, limit: Option<usize>) -> Result<Vec<Blog>, AppError> {
    let records = store.find_blogs(&BlogFilter::published()).await?;
    let mut records = newest_first(records);
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    Ok(resolve(store, records).await?)
}

/// Published, promoted posts ranked by views.
pub async fn top(store: &dyn ContentStore, limit: Option<usize>) -> Result<Vec<Blog>, AppError> {
    let mut records = store
        .find_blogs(&BlogFilter::published().top_only())
        .await?;
    records.sort_by(|a, b| b.views.cmp(&a.views));
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    Ok(resolve(store, records).await?)
}

pub async fn status_counts(store: &dyn ContentStore) -> Result<StatusCounts, AppError> {
    let records = store.find_blogs(&BlogFilter::all()).await?;
    let mut counts = StatusCounts {
        total: records.len(),
        ..StatusCounts::default()
    };
    for r in &records {
        match r.status {
            BlogStatus::Published => counts.published += 1,
            BlogStatus::Draft => counts.draft += 1,
            BlogStatus::Private => counts.private += 1,
        }
    }
    Ok(counts)
}

fn newest_first(mut records: Vec<BlogRecord>) -> Vec<BlogRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}
