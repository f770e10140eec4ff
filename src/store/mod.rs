//! Persistent collections for authors, categories, blogs and users.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

mod memory;
pub mod models;
mod postgres;

pub use memory::InMemoryStore;
pub use models::{Author, Blog, BlogData, BlogRecord, BlogStatus, Category, User};
pub use postgres::PgContentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for unique field `{field}`")]
    Duplicate { field: &'static str },

    #[error("record not found")]
    NotFound,

    #[error("invalid stored value: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Backend(#[source] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub ids: Option<Vec<Uuid>>,
    pub slug: Option<String>,
    pub status: Option<BlogStatus>,
    pub category_id: Option<Uuid>,
    pub top_only: bool,
}

impl BlogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self {
            ids: Some(vec![id]),
            ..Self::default()
        }
    }

    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    pub fn published() -> Self {
        Self {
            status: Some(BlogStatus::Published),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn top_only(mut self) -> Self {
        self.top_only = true;
        self
    }

    pub fn matches(&self, blog: &BlogRecord) -> bool {
        self.ids.as_ref().map_or(true, |ids| ids.contains(&blog.id))
            && self.slug.as_deref().map_or(true, |s| blog.slug == s)
            && self.status.map_or(true, |s| blog.status == s)
            && self.category_id.map_or(true, |c| blog.category_id == c)
            && (!self.top_only || blog.is_top_blog)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub ids: Option<Vec<Uuid>>,
    pub slug: Option<String>,
    pub name: Option<String>,
}

impl CategoryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::by_ids(vec![id])
    }

    pub fn by_ids(ids: Vec<Uuid>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, category: &Category) -> bool {
        self.ids.as_ref().map_or(true, |ids| ids.contains(&category.id))
            && self.slug.as_deref().map_or(true, |s| category.slug == s)
            && self.name.as_deref().map_or(true, |n| category.name == n)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthorFilter {
    pub ids: Option<Vec<Uuid>>,
}

impl AuthorFilter {
    pub fn by_id(id: Uuid) -> Self {
        Self::by_ids(vec![id])
    }

    pub fn by_ids(ids: Vec<Uuid>) -> Self {
        Self { ids: Some(ids) }
    }

    pub fn matches(&self, author: &Author) -> bool {
        self.ids.as_ref().map_or(true, |ids| ids.contains(&author.id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub id: Option<Uuid>,
    pub email: Option<String>,
}

impl UserFilter {
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.id.map_or(true, |id| user.id == id)
            && self.email.as_deref().map_or(true, |e| user.email == e)
    }
}

/// Storage handle injected into the services.
///
/// Every write touches a single entity. Unique-constraint violations come
/// back as [`StoreError::Duplicate`] and leave the collection unchanged.
/// `find_blogs` returns newest first, `find_categories` orders by name.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn find_blogs(&self, filter: &BlogFilter) -> StoreResult<Vec<BlogRecord>>;

    async fn find_blog(&self, filter: &BlogFilter) -> StoreResult<Option<BlogRecord>> {
        Ok(self.find_blogs(filter).await?.into_iter().next())
    }

    async fn insert_blog(&self, blog: BlogRecord) -> StoreResult<BlogRecord>;

    /// Fails with [`StoreError::NotFound`] instead of creating a new post.
    async fn update_blog(&self, id: Uuid, data: BlogData) -> StoreResult<BlogRecord>;

    async fn find_categories(&self, filter: &CategoryFilter) -> StoreResult<Vec<Category>>;

    async fn find_category(&self, filter: &CategoryFilter) -> StoreResult<Option<Category>> {
        Ok(self.find_categories(filter).await?.into_iter().next())
    }

    async fn insert_category(&self, category: Category) -> StoreResult<Category>;

    async fn find_authors(&self, filter: &AuthorFilter) -> StoreResult<Vec<Author>>;

    async fn find_author(&self, filter: &AuthorFilter) -> StoreResult<Option<Author>> {
        Ok(self.find_authors(filter).await?.into_iter().next())
    }

    async fn insert_author(&self, author: Author) -> StoreResult<Author>;

    async fn find_user(&self, filter: &UserFilter) -> StoreResult<Option<User>>;

    async fn insert_user(&self, user: User) -> StoreResult<User>;
}
