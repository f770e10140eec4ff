use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AuthorFilter, BlogFilter, CategoryFilter, ContentStore, StoreError, StoreResult, UserFilter,
};
use super::models::{Author, BlogData, BlogRecord, Category, User};

#[derive(Default)]
struct Collections {
    authors: Vec<Author>,
    categories: Vec<Category>,
    blogs: Vec<BlogRecord>,
    users: Vec<User>,
}

/// Process-local store for development runs without `DATABASE_URL` and for
/// tests. Uniqueness is checked under the write lock before anything is
/// stored.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn find_blogs(&self, filter: &BlogFilter) -> StoreResult<Vec<BlogRecord>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<BlogRecord> = inner
            .blogs
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_blog(&self, blog: BlogRecord) -> StoreResult<BlogRecord> {
        let mut inner = self.inner.write().await;
        if inner.blogs.iter().any(|b| b.slug == blog.slug) {
            return Err(StoreError::Duplicate { field: "slug" });
        }
        inner.blogs.push(blog.clone());
        Ok(blog)
    }

    async fn update_blog(&self, id: Uuid, data: BlogData) -> StoreResult<BlogRecord> {
        let mut inner = self.inner.write().await;
        let pos = inner
            .blogs
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::NotFound)?;
        if inner.blogs.iter().any(|b| b.id != id && b.slug == data.slug) {
            return Err(StoreError::Duplicate { field: "slug" });
        }
        let blog = &mut inner.blogs[pos];
        blog.apply(data);
        Ok(blog.clone())
    }

    async fn find_categories(&self, filter: &CategoryFilter) -> StoreResult<Vec<Category>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Category> = inner
            .categories
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn insert_category(&self, category: Category) -> StoreResult<Category> {
        let mut inner = self.inner.write().await;
        if inner.categories.iter().any(|c| c.name == category.name) {
            return Err(StoreError::Duplicate { field: "name" });
        }
        if inner.categories.iter().any(|c| c.slug == category.slug) {
            return Err(StoreError::Duplicate { field: "slug" });
        }
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn find_authors(&self, filter: &AuthorFilter) -> StoreResult<Vec<Author>> {
        let inner = self.inner.read().await;
        Ok(inner
            .authors
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    async fn insert_author(&self, author: Author) -> StoreResult<Author> {
        let mut inner = self.inner.write().await;
        inner.authors.push(author.clone());
        Ok(author)
    }

    async fn find_user(&self, filter: &UserFilter) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| filter.matches(u)).cloned())
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate { field: "email" });
        }
        inner.users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BlogStatus;
    use time::{macros::datetime, OffsetDateTime};

    fn record(slug: &str, created_at: OffsetDateTime) -> BlogRecord {
        BlogData {
            title: slug.to_string(),
            slug: slug.to_string(),
            content: "x".repeat(100),
            excerpt: "excerpt".into(),
            image_url: "https://picsum.photos/800".into(),
            image_hint: None,
            category_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            status: BlogStatus::Published,
            is_top_blog: None,
            tags: vec![],
            meta_description: None,
        }
        .into_record(Uuid::new_v4(), created_at)
    }

    fn data_for(existing: &BlogRecord, slug: &str) -> BlogData {
        BlogData {
            title: existing.title.clone(),
            slug: slug.to_string(),
            content: existing.content.clone(),
            excerpt: existing.excerpt.clone(),
            image_url: existing.image_url.clone(),
            image_hint: None,
            category_id: existing.category_id,
            author_id: existing.author_id,
            status: existing.status,
            is_top_blog: None,
            tags: existing.tags.clone(),
            meta_description: None,
        }
    }

    #[tokio::test]
    async fn duplicate_slug_insert_leaves_store_unchanged() {
        let store = InMemoryStore::new();
        store
            .insert_blog(record("same", datetime!(2024-07-20 10:00 UTC)))
            .await
            .unwrap();

        let err = store
            .insert_blog(record("same", datetime!(2024-07-21 10:00 UTC)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "slug" }));
        assert_eq!(store.find_blogs(&BlogFilter::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let store = InMemoryStore::new();
        let existing = record("one", datetime!(2024-07-20 10:00 UTC));
        let err = store
            .update_blog(Uuid::new_v4(), data_for(&existing, "one"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(store.find_blogs(&BlogFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_id_wins_over_a_taken_slug() {
        let store = InMemoryStore::new();
        let taken = store
            .insert_blog(record("taken", datetime!(2024-07-20 10:00 UTC)))
            .await
            .unwrap();

        let err = store
            .update_blog(Uuid::new_v4(), data_for(&taken, "taken"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn update_may_keep_its_own_slug_but_not_take_another() {
        let store = InMemoryStore::new();
        let first = store
            .insert_blog(record("first", datetime!(2024-07-20 10:00 UTC)))
            .await
            .unwrap();
        store
            .insert_blog(record("second", datetime!(2024-07-21 10:00 UTC)))
            .await
            .unwrap();

        assert!(store
            .update_blog(first.id, data_for(&first, "first"))
            .await
            .is_ok());
        let err = store
            .update_blog(first.id, data_for(&first, "second"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        let stored = store
            .find_blog(&BlogFilter::by_id(first.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.slug, "first");
    }

    #[tokio::test]
    async fn blogs_come_back_newest_first() {
        let store = InMemoryStore::new();
        for (slug, at) in [
            ("old", datetime!(2024-07-01 10:00 UTC)),
            ("new", datetime!(2024-07-03 10:00 UTC)),
            ("mid", datetime!(2024-07-02 10:00 UTC)),
        ] {
            store.insert_blog(record(slug, at)).await.unwrap();
        }
        let slugs: Vec<String> = store
            .find_blogs(&BlogFilter::all())
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.slug)
            .collect();
        assert_eq!(slugs, ["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn category_name_and_slug_are_unique() {
        let store = InMemoryStore::new();
        let tech = Category {
            id: Uuid::new_v4(),
            name: "Technology".into(),
            slug: "technology".into(),
            hero_image_url: None,
        };
        store.insert_category(tech.clone()).await.unwrap();

        let same_name = Category {
            id: Uuid::new_v4(),
            slug: "tech".into(),
            ..tech.clone()
        };
        assert!(matches!(
            store.insert_category(same_name).await,
            Err(StoreError::Duplicate { field: "name" })
        ));

        let same_slug = Category {
            id: Uuid::new_v4(),
            name: "technology".into(),
            ..tech
        };
        assert!(matches!(
            store.insert_category(same_slug).await,
            Err(StoreError::Duplicate { field: "slug" })
        ));
    }
}
