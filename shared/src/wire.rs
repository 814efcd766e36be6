//! Request bodies, query state and the response envelope exchanged with the
//! backend REST API.

use serde::{Deserialize, Serialize};

use crate::Session;

/// Every backend response is wrapped in this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    // `default` would make the derive demand `T: Default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    /// Payload of a successful envelope; `None` when `success` is false or
    /// `data` is missing.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// `POST /articles/:id/like` answers with the toggle state at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u32,
    pub total: u32,
    pub total_items: u64,
}

impl Pagination {
    /// Metadata for a result set that fits on one page.
    pub fn single_page(items: usize) -> Self {
        Self {
            current: 1,
            total: 1,
            total_items: items as u64,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::single_page(0)
    }
}

/// Query state of the article list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub search: String,
    pub category: String,
    pub sort: String,
    pub page: u32,
    pub limit: u32,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: "all".to_string(),
            sort: "newest".to_string(),
            page: 1,
            limit: 12,
        }
    }
}

/// Partial filter change requested by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOverrides {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Filters {
    /// Filters for a fresh list query: overrides win, and `page` falls back
    /// to 1 unless the override names a page.
    pub fn merged(&self, overrides: &FilterOverrides) -> Filters {
        let mut next = self.clone();
        next.overlay(overrides);
        next.page = overrides.page.filter(|page| *page > 0).unwrap_or(1);
        next
    }

    /// Overlay `overrides` in place without touching unspecified fields.
    /// Returns whether a field that drives the list query changed.
    pub fn update(&mut self, overrides: &FilterOverrides) -> bool {
        let before = self.clone();
        self.overlay(overrides);
        self.search != before.search
            || self.category != before.category
            || self.sort != before.sort
            || self.page != before.page
    }

    /// Query-string pairs for `GET /articles`. Blank strings and zero numbers
    /// are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        for (key, value) in [
            ("search", &self.search),
            ("category", &self.category),
            ("sort", &self.sort),
        ] {
            if !value.is_empty() {
                pairs.push((key, value.clone()));
            }
        }
        if self.page > 0 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.limit > 0 {
            pairs.push(("limit", self.limit.to_string()));
        }
        pairs
    }

    fn overlay(&mut self, overrides: &FilterOverrides) {
        if let Some(search) = &overrides.search {
            self.search = search.clone();
        }
        if let Some(category) = &overrides.category {
            self.category = category.clone();
        }
        if let Some(sort) = &overrides.sort {
            self.sort = sort.clone();
        }
        if let Some(page) = overrides.page {
            self.page = page;
        }
        if let Some(limit) = overrides.limit {
            self.limit = limit;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `data` of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: Session,
}

/// Body of `POST /articles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub cover_image: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
}

/// Body of `PUT /articles/:id`; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Body of `POST /upload`: the file travels as a data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub file: String,
    pub filename: String,
}
