use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
    Private,
}

impl BlogStatus {
    pub const ALL: [BlogStatus; 3] = [BlogStatus::Draft, BlogStatus::Published, BlogStatus::Private];

    pub fn as_str(self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
            BlogStatus::Private => "private",
        }
    }
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown blog status `{}`", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for BlogStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            "private" => Ok(BlogStatus::Private),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A stored blog post. Category and author are references only; see [`Blog`]
/// for the resolved form.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub image_hint: String,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub created_at: OffsetDateTime,
    pub status: BlogStatus,
    pub is_top_blog: bool,
    pub views: i64,
    pub tags: Vec<String>,
    pub meta_description: Option<String>,
}

/// Writable blog fields, shared by create and update.
///
/// `image_hint` and `is_top_blog` are left untouched on update when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogData {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub image_hint: Option<String>,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub status: BlogStatus,
    pub is_top_blog: Option<bool>,
    pub tags: Vec<String>,
    pub meta_description: Option<String>,
}

impl BlogData {
    /// Fresh record: zero views, not promoted unless asked.
    pub fn into_record(self, id: Uuid, created_at: OffsetDateTime) -> BlogRecord {
        BlogRecord {
            id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            excerpt: self.excerpt,
            image_url: self.image_url,
            image_hint: self.image_hint.unwrap_or_default(),
            category_id: self.category_id,
            author_id: self.author_id,
            created_at,
            status: self.status,
            is_top_blog: self.is_top_blog.unwrap_or(false),
            views: 0,
            tags: self.tags,
            meta_description: self.meta_description,
        }
    }
}

impl BlogRecord {
    /// Overwrites the writable fields; `created_at` and `views` are kept.
    pub fn apply(&mut self, data: BlogData) {
        self.title = data.title;
        self.slug = data.slug;
        self.content = data.content;
        self.excerpt = data.excerpt;
        self.image_url = data.image_url;
        if let Some(hint) = data.image_hint {
            self.image_hint = hint;
        }
        self.category_id = data.category_id;
        self.author_id = data.author_id;
        self.status = data.status;
        if let Some(top) = data.is_top_blog {
            self.is_top_blog = top;
        }
        self.tags = data.tags;
        self.meta_description = data.meta_description;
    }
}

/// A blog post with its category and author looked up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub image_hint: String,
    pub category: Category,
    pub author: Author,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub status: BlogStatus,
    pub is_top_blog: bool,
    pub views: i64,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

impl Blog {
    pub fn resolve(record: BlogRecord, category: Category, author: Author) -> Self {
        Self {
            id: record.id,
            title: record.title,
            slug: record.slug,
            content: record.content,
            excerpt: record.excerpt,
            image_url: record.image_url,
            image_hint: record.image_hint,
            category,
            author,
            created_at: record.created_at,
            status: record.status,
            is_top_blog: record.is_top_blog,
            views: record.views,
            tags: record.tags,
            meta_description: record.meta_description,
        }
    }
}

/// User account. The password hash never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}
