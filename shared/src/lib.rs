//! Data model shared by the SEIJA magazine client and its CLI.
//!
//! Field names follow the backend's JSON (snake_case) so the structs can be
//! decoded straight out of the response envelope.

use serde::{Deserialize, Deserializer, Serialize};

pub mod comment_tree;
pub mod fallback;
pub mod forms;
pub mod wire;

pub use comment_tree::build_comment_tree;
pub use wire::{Envelope, FilterOverrides, Filters, Pagination};

/// Role carried by a logged-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

// 当前登录用户，持久化在本地存储的 `user` 键中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Merge the fields present in `patch` into this session.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if patch.avatar.is_some() {
            self.avatar = patch.avatar.clone();
        }
        if patch.bio.is_some() {
            self.bio = patch.bio.clone();
        }
    }
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.avatar.is_none()
            && self.bio.is_none()
    }
}

// 文章（列表与详情共用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    #[serde(deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub category_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub like_count: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub view_count: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub comment_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(
        default,
        deserialize_with = "deserialize_tags",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
}

impl Article {
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}

/// One comment. `replies` is only populated after [`build_comment_tree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub article_id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub article_count: u32,
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_articles: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_comments: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_likes: u64,
    #[serde(default)]
    pub popular_articles: Vec<serde_json::Value>,
    #[serde(default)]
    pub category_stats: Vec<serde_json::Value>,
}

/// Split a comma-separated tag string, dropping blanks.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}

// 可为空的列返回 null 时按缺省值处理
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// 后端有时返回字符串形式的标签（"a, b"），有时返回数组
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTags {
        List(Vec<String>),
        Joined(String),
    }

    Ok(Option::<RawTags>::deserialize(deserializer)?.map(|raw| match raw {
        RawTags::List(tags) => tags,
        RawTags::Joined(joined) => split_tags(&joined),
    }))
}
