//! Built-in datasets shown when a live fetch fails or comes back empty.

use chrono::Utc;

use crate::{Article, Category};

pub const DEFAULT_COVER: &str = "/cover/default.jpg";

/// Single welcome article standing in for an empty or unreachable catalogue.
pub fn placeholder_articles() -> Vec<Article> {
    vec![Article {
        id: 0,
        title: "Welcome to SEIJA Magazine".to_string(),
        content: "Platform untuk berbagi karya kreatif siswa SIJA. Daftar dan mulai berbagi \
                  karyamu!"
            .to_string(),
        excerpt: "Platform untuk berbagi karya kreatif siswa SIJA".to_string(),
        author_name: "Admin".to_string(),
        author_username: None,
        author_avatar: None,
        category_name: "Announcement".to_string(),
        category_slug: None,
        category_color: None,
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
        like_count: 0,
        view_count: 0,
        comment_count: 0,
        cover_image: Some(DEFAULT_COVER.to_string()),
        read_time: Some(1),
        tags: None,
        featured: Some(false),
        status: None,
        seo_title: None,
        seo_description: None,
    }]
}

pub fn fallback_categories() -> Vec<Category> {
    [
        (1, "Novel", "novel"),
        (2, "Cerpen", "cerpen"),
        (3, "Puisi", "puisi"),
        (4, "Opini", "opini"),
        (5, "Desain Grafis", "desain"),
        (6, "Coding Project", "coding"),
    ]
    .into_iter()
    .map(|(id, name, slug)| Category {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        icon: None,
        color: None,
        article_count: 0,
    })
    .collect()
}
