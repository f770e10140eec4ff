use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    AuthorFilter, BlogFilter, CategoryFilter, ContentStore, StoreError, StoreResult, UserFilter,
};
use super::models::{Author, BlogData, BlogRecord, BlogStatus, Category, User};

const BLOG_COLUMNS: &str = "id, title, slug, content, excerpt, image_url, image_hint, \
     category_id, author_id, created_at, status, is_top_blog, views, tags, meta_description";

#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self { pool })
    }
}

#[derive(Debug, FromRow)]
struct BlogRow {
    id: Uuid,
    title: String,
    slug: String,
    content: String,
    excerpt: String,
    image_url: String,
    image_hint: String,
    category_id: Uuid,
    author_id: Uuid,
    created_at: OffsetDateTime,
    status: String,
    is_top_blog: bool,
    views: i64,
    tags: Vec<String>,
    meta_description: Option<String>,
}

impl TryFrom<BlogRow> for BlogRecord {
    type Error = StoreError;

    fn try_from(r: BlogRow) -> Result<Self, Self::Error> {
        let status: BlogStatus = r
            .status
            .parse()
            .map_err(|e: super::models::UnknownStatus| StoreError::Corrupt(e.to_string()))?;
        Ok(Self {
            id: r.id,
            title: r.title,
            slug: r.slug,
            content: r.content,
            excerpt: r.excerpt,
            image_url: r.image_url,
            image_hint: r.image_hint,
            category_id: r.category_id,
            author_id: r.author_id,
            created_at: r.created_at,
            status,
            is_top_blog: r.is_top_blog,
            views: r.views,
            tags: r.tags,
            meta_description: r.meta_description,
        })
    }
}

/// Field behind a unique constraint from the initial migration. Primary keys
/// and anything unknown come back as `"key"`.
fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("blogs_slug_key" | "categories_slug_key") => "slug",
        Some("categories_name_key") => "name",
        Some("users_email_key") => "email",
        _ => "key",
    }
}

/// SQLSTATE 23505 becomes `Duplicate`.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code() == Some("23505".into()) {
            return StoreError::Duplicate {
                field: duplicate_field(db_err.constraint()),
            };
        }
    }
    StoreError::Backend(err)
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn find_blogs(&self, filter: &BlogFilter) -> StoreResult<Vec<BlogRecord>> {
        let sql = format!(
            r#"
            SELECT {BLOG_COLUMNS}
            FROM blogs
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
              AND ($2::text IS NULL OR slug = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::uuid IS NULL OR category_id = $4)
              AND (NOT $5 OR is_top_blog)
            ORDER BY created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(filter.ids.as_deref())
            .bind(filter.slug.as_deref())
            .bind(filter.status.map(BlogStatus::as_str))
            .bind(filter.category_id)
            .bind(filter.top_only)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.into_iter().map(BlogRecord::try_from).collect()
    }

    async fn insert_blog(&self, blog: BlogRecord) -> StoreResult<BlogRecord> {
        let sql = format!(
            r#"
            INSERT INTO blogs ({BLOG_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {BLOG_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(blog.id)
            .bind(&blog.title)
            .bind(&blog.slug)
            .bind(&blog.content)
            .bind(&blog.excerpt)
            .bind(&blog.image_url)
            .bind(&blog.image_hint)
            .bind(blog.category_id)
            .bind(blog.author_id)
            .bind(blog.created_at)
            .bind(blog.status.as_str())
            .bind(blog.is_top_blog)
            .bind(blog.views)
            .bind(&blog.tags)
            .bind(&blog.meta_description)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.try_into()
    }

    async fn update_blog(&self, id: Uuid, data: BlogData) -> StoreResult<BlogRecord> {
        let sql = format!(
            r#"
            UPDATE blogs
               SET title = $2,
                   slug = $3,
                   content = $4,
                   excerpt = $5,
                   image_url = $6,
                   image_hint = COALESCE($7, image_hint),
                   category_id = $8,
                   author_id = $9,
                   status = $10,
                   is_top_blog = COALESCE($11, is_top_blog),
                   tags = $12,
                   meta_description = $13
             WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(id)
            .bind(&data.title)
            .bind(&data.slug)
            .bind(&data.content)
            .bind(&data.excerpt)
            .bind(&data.image_url)
            .bind(&data.image_hint)
            .bind(data.category_id)
            .bind(data.author_id)
            .bind(data.status.as_str())
            .bind(data.is_top_blog)
            .bind(&data.tags)
            .bind(&data.meta_description)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(StoreError::NotFound)?;
        row.try_into()
    }

    async fn find_categories(&self, filter: &CategoryFilter) -> StoreResult<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, hero_image_url
            FROM categories
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
              AND ($2::text IS NULL OR slug = $2)
              AND ($3::text IS NULL OR name = $3)
            ORDER BY name
            "#,
        )
        .bind(filter.ids.as_deref())
        .bind(filter.slug.as_deref())
        .bind(filter.name.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn insert_category(&self, category: Category) -> StoreResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, slug, hero_image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, slug, hero_image_url
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.hero_image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_authors(&self, filter: &AuthorFilter) -> StoreResult<Vec<Author>> {
        sqlx::query_as::<_, Author>(
            r#"
            SELECT id, name, avatar_url
            FROM authors
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
            ORDER BY name
            "#,
        )
        .bind(filter.ids.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn insert_author(&self, author: Author) -> StoreResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (id, name, avatar_url)
            VALUES ($1, $2, $3)
            RETURNING id, name, avatar_url
            "#,
        )
        .bind(author.id)
        .bind(&author.name)
        .bind(&author.avatar_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_user(&self, filter: &UserFilter) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE ($1::uuid IS NULL OR id = $1)
              AND ($2::text IS NULL OR email = $2)
            LIMIT 1
            "#,
        )
        .bind(filter.id)
        .bind(filter.email.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}
