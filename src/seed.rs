//! Demo authors, categories and posts for an empty store.

use time::{macros::datetime, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::slug::slugify;
use crate::store::{
    Author, AuthorFilter, BlogData, BlogFilter, BlogStatus, Category, CategoryFilter,
    ContentStore, StoreResult,
};

/// Author attached to saved posts while there is no session identity.
pub const PLACEHOLDER_AUTHOR_ID: Uuid = Uuid::from_u128(0x669fc22a_9cf2_e432_f831_92f100000001);
const SECOND_AUTHOR_ID: Uuid = Uuid::from_u128(0x669fc22a_9cf2_e432_f831_92f100000002);

const CATEGORY_NAMES: [&str; 5] = ["Technology", "Productivity", "Design", "Business", "Lifestyle"];

const PLACEHOLDER_CONTENT: &str = r#"
<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.</p>
<h2>Key Takeaways</h2>
<p>Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.</p>
<ul>
  <li>Consectetur adipiscing elit</li>
  <li>Sed do eiusmod tempor</li>
  <li>Incididunt ut labore et dolore</li>
</ul>
<blockquote>"The quick brown fox jumps over the lazy dog."</blockquote>
<p>Sed ut perspiciatis unde omnis iste natus error sit voluptatem accusantium doloremque laudantium, totam rem aperiam, eaque ipsa quae ab illo inventore veritatis et quasi architecto beatae vitae dicta sunt explicabo.</p>
"#;

struct DemoPost {
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    image_hint: &'static str,
    category: usize,
    second_author: bool,
    created_at: OffsetDateTime,
    status: BlogStatus,
    is_top_blog: bool,
    views: i64,
    tags: &'static [&'static str],
}

fn demo_posts() -> Vec<DemoPost> {
    use BlogStatus::*;
    vec![
        DemoPost {
            title: "The Future of Web Development in 2024",
            slug: "future-of-web-development-2024",
            excerpt: "Explore the latest trends, frameworks, and technologies shaping the future of web development.",
            image_hint: "code laptop",
            category: 0,
            second_author: false,
            created_at: datetime!(2024-07-21 10:00 UTC),
            status: Published,
            is_top_blog: true,
            views: 1250,
            tags: &["webdev", "2024", "frameworks", "react"],
        },
        DemoPost {
            title: "10 Productivity Hacks for Busy Professionals",
            slug: "10-productivity-hacks",
            excerpt: "Boost your efficiency and get more done with these simple yet effective productivity tips.",
            image_hint: "desk planner",
            category: 1,
            second_author: true,
            created_at: datetime!(2024-07-20 14:30 UTC),
            status: Published,
            is_top_blog: true,
            views: 2300,
            tags: &["productivity", "hacks", "work"],
        },
        DemoPost {
            title: "A Deep Dive into Modern UI/UX Design Principles",
            slug: "modern-ui-ux-design-principles",
            excerpt: "Learn about the core principles that drive successful user interfaces and experiences today.",
            image_hint: "design sketch",
            category: 2,
            second_author: false,
            created_at: datetime!(2024-07-19 09:00 UTC),
            status: Published,
            is_top_blog: false,
            views: 890,
            tags: &["ui", "ux", "design", "principles"],
        },
        DemoPost {
            title: "Mastering the Art of the Startup Pitch",
            slug: "mastering-startup-pitch",
            excerpt: "How to craft a compelling pitch that will win over investors and customers.",
            image_hint: "presentation stage",
            category: 3,
            second_author: true,
            created_at: datetime!(2024-07-18 11:45 UTC),
            status: Draft,
            is_top_blog: false,
            views: 0,
            tags: &["startup", "pitching", "business"],
        },
        DemoPost {
            title: "My Journey into Minimalist Living",
            slug: "journey-minimalist-living",
            excerpt: "Discover the benefits of minimalism and how it can transform your life.",
            image_hint: "minimal room",
            category: 4,
            second_author: false,
            created_at: datetime!(2024-07-17 18:00 UTC),
            status: Published,
            is_top_blog: true,
            views: 3100,
            tags: &[],
        },
        DemoPost {
            title: "The Rise of AI in Creative Industries",
            slug: "rise-of-ai-creative-industries",
            excerpt: "How artificial intelligence is changing the landscape of art, music, and writing.",
            image_hint: "robot art",
            category: 0,
            second_author: true,
            created_at: datetime!(2024-07-16 12:00 UTC),
            status: Published,
            is_top_blog: false,
            views: 1500,
            tags: &["ai", "creativity", "art"],
        },
        DemoPost {
            title: "Building a Sustainable Morning Routine",
            slug: "sustainable-morning-routine",
            excerpt: "Create a morning routine that sticks and sets you up for a successful day.",
            image_hint: "coffee sunrise",
            category: 1,
            second_author: false,
            created_at: datetime!(2024-07-15 08:20 UTC),
            status: Published,
            is_top_blog: true,
            views: 1900,
            tags: &[],
        },
        DemoPost {
            title: "Color Theory for Web Designers",
            slug: "color-theory-web-designers",
            excerpt: "A practical guide to using color effectively in your web design projects.",
            image_hint: "color palette",
            category: 2,
            second_author: true,
            created_at: datetime!(2024-07-14 16:00 UTC),
            status: Published,
            is_top_blog: false,
            views: 750,
            tags: &[],
        },
        DemoPost {
            title: "From Side Hustle to Million-Dollar Business",
            slug: "side-hustle-to-million-dollar-business",
            excerpt: "Inspiring stories and practical advice on scaling your side project.",
            image_hint: "growth chart",
            category: 3,
            second_author: false,
            created_at: datetime!(2024-07-13 10:00 UTC),
            status: Private,
            is_top_blog: false,
            views: 10,
            tags: &[],
        },
        DemoPost {
            title: "The Ultimate Guide to Traveling on a Budget",
            slug: "ultimate-guide-traveling-on-budget",
            excerpt: "See the world without breaking the bank with these expert travel tips.",
            image_hint: "backpack mountains",
            category: 4,
            second_author: true,
            created_at: datetime!(2024-07-12 13:15 UTC),
            status: Published,
            is_top_blog: true,
            views: 4500,
            tags: &[],
        },
    ]
}

fn demo_authors() -> [Author; 2] {
    [
        Author {
            id: PLACEHOLDER_AUTHOR_ID,
            name: "Jane Doe".into(),
            avatar_url: "https://i.pravatar.cc/150?u=user-1".into(),
        },
        Author {
            id: SECOND_AUTHOR_ID,
            name: "John Smith".into(),
            avatar_url: "https://i.pravatar.cc/150?u=user-2".into(),
        },
    ]
}

/// Loads whatever part of the demo data is missing. Authors are matched by
/// id, categories and posts by slug, so a run that stopped halfway picks up
/// where it left off. Returns whether anything was written.
pub async fn load_demo_data(store: &dyn ContentStore) -> StoreResult<bool> {
    let mut written = 0usize;

    let mut authors = Vec::with_capacity(2);
    for author in demo_authors() {
        let existing = store.find_author(&AuthorFilter::by_id(author.id)).await?;
        let author = match existing {
            Some(a) => a,
            None => {
                written += 1;
                store.insert_author(author).await?
            }
        };
        authors.push(author);
    }

    let mut categories = Vec::with_capacity(CATEGORY_NAMES.len());
    for name in CATEGORY_NAMES {
        let slug = slugify(name);
        let category = match store.find_category(&CategoryFilter::by_slug(&slug)).await? {
            Some(c) => c,
            None => {
                written += 1;
                store
                    .insert_category(Category {
                        id: Uuid::new_v4(),
                        name: name.to_string(),
                        hero_image_url: Some(format!("https://picsum.photos/seed/{slug}/1600/600")),
                        slug,
                    })
                    .await?
            }
        };
        categories.push(category);
    }

    for post in demo_posts() {
        if store.find_blog(&BlogFilter::by_slug(post.slug)).await?.is_some() {
            continue;
        }
        let mut record = BlogData {
            title: post.title.into(),
            slug: post.slug.into(),
            content: PLACEHOLDER_CONTENT.into(),
            excerpt: post.excerpt.into(),
            image_url: format!("https://picsum.photos/seed/{}/800/600", post.slug),
            image_hint: Some(post.image_hint.into()),
            category_id: categories[post.category].id,
            author_id: authors[usize::from(post.second_author)].id,
            status: post.status,
            is_top_blog: Some(post.is_top_blog),
            tags: post.tags.iter().map(|t| t.to_string()).collect(),
            meta_description: None,
        }
        .into_record(Uuid::new_v4(), post.created_at);
        record.views = post.views;
        store.insert_blog(record).await?;
        written += 1;
    }

    if written > 0 {
        info!(rows = written, "demo data loaded");
    }
    Ok(written > 0)
}
