//! Form state and field validation for article submission, credentials and
//! comments. Everything here runs before any network call.

use std::collections::BTreeMap;

use crate::{fallback::DEFAULT_COVER, wire::NewArticle};

pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MAX_CHARS: usize = 50_000;
pub const EXCERPT_MAX_CHARS: usize = 300;
pub const EXCERPT_AUTO_CHARS: usize = 150;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const COVER_MAX_BYTES: u64 = 2 * 1024 * 1024;

/// Categories offered by the submission form, with their default covers.
pub const CATEGORY_COVERS: &[(&str, &str)] = &[
    ("Novel", "/cover/novel.jpg"),
    ("Cerpen", "/cover/cerpen.jpg"),
    ("Puisi", "/cover/puisi.jpg"),
    ("Opini", "/cover/opini.jpg"),
    ("Desain Grafis", "/cover/desain.jpg"),
    ("Coding Project", "/cover/coding.jpg"),
    ("Cerita Bergambar", "/cover/cergam.jpg"),
    ("Pantun", "/cover/pantun.jpg"),
];

/// Default cover for `category`, or the generic cover for unknown names.
pub fn default_cover(category: &str) -> &'static str {
    CATEGORY_COVERS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, cover)| *cover)
        .unwrap_or(DEFAULT_COVER)
}

/// First 150 characters of `content` followed by `...`.
pub fn auto_excerpt(content: &str) -> String {
    let mut excerpt: String = content.chars().take(EXCERPT_AUTO_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Content,
    Excerpt,
    Category,
    CoverImage,
    Username,
    Email,
    Password,
    Comment,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Content => "content",
            FormField::Excerpt => "excerpt",
            FormField::Category => "category_name",
            FormField::CoverImage => "cover_image",
            FormField::Username => "username",
            FormField::Email => "email",
            FormField::Password => "password",
            FormField::Comment => "comment",
        }
    }
}

/// Per-field messages, shown next to the offending input.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) need attention", .0.len())]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn check(&mut self, field: FormField, message: Option<String>) {
        if let Some(message) = message {
            self.0.insert(field, message);
        }
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Validate a single article field as the user types.
pub fn validate_article_field(field: FormField, value: &str) -> Option<String> {
    let chars = value.chars().count();
    match field {
        FormField::Title if value.trim().is_empty() => Some("Title is required".to_string()),
        FormField::Title if chars > TITLE_MAX_CHARS => {
            Some(format!("Title must be at most {TITLE_MAX_CHARS} characters"))
        },
        FormField::Content if value.trim().is_empty() => Some("Content is required".to_string()),
        FormField::Content if chars > CONTENT_MAX_CHARS => {
            Some("Content is too long (max. 50,000 characters)".to_string())
        },
        FormField::Category if value.is_empty() => Some("Category is required".to_string()),
        FormField::Excerpt if chars > EXCERPT_MAX_CHARS => {
            Some(format!("Excerpt must be at most {EXCERPT_MAX_CHARS} characters"))
        },
        _ => None,
    }
}

/// Editable state of the "submit a work" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author_name: String,
    pub tags: String,
    pub featured: bool,
    category_name: String,
    cover_image: String,
    custom_cover: bool,
}

impl ArticleDraft {
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn cover_image(&self) -> &str {
        &self.cover_image
    }

    pub fn has_custom_cover(&self) -> bool {
        self.custom_cover
    }

    /// Select a category. The cover follows the category default until the
    /// user uploads an image of their own.
    pub fn set_category(&mut self, category: &str) -> Option<String> {
        self.category_name = category.to_string();
        if !self.custom_cover {
            self.cover_image = default_cover(category).to_string();
        }
        validate_article_field(FormField::Category, category)
    }

    /// Accept an uploaded cover image. Files above 2 MiB or with a non-image
    /// MIME type are rejected and leave the current cover untouched.
    pub fn attach_cover_upload(
        &mut self,
        file_name: &str,
        size_bytes: u64,
        mime_type: &str,
    ) -> Result<(), String> {
        if size_bytes > COVER_MAX_BYTES {
            return Err("Cover image must be at most 2MB".to_string());
        }
        if !mime_type.starts_with("image/") {
            return Err("Only image files are allowed".to_string());
        }
        self.cover_image = format!("/uploads/{file_name}");
        self.custom_cover = true;
        Ok(())
    }

    /// Use an already hosted image (for example a data URL or an upload
    /// response path) as the cover.
    pub fn set_custom_cover(&mut self, cover: impl Into<String>) {
        self.cover_image = cover.into();
        self.custom_cover = true;
    }

    /// Drop a custom cover so the category default applies again.
    pub fn clear_custom_cover(&mut self) {
        self.custom_cover = false;
        self.cover_image = if self.category_name.is_empty() {
            String::new()
        } else {
            default_cover(&self.category_name).to_string()
        };
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(FormField::Title, validate_article_field(FormField::Title, &self.title));
        errors.check(FormField::Content, validate_article_field(FormField::Content, &self.content));
        errors.check(
            FormField::Category,
            validate_article_field(FormField::Category, &self.category_name),
        );
        errors.check(FormField::Excerpt, validate_article_field(FormField::Excerpt, &self.excerpt));
        errors.into_result()
    }

    /// Build the request body, filling in excerpt, author and cover defaults.
    pub fn submission(&self, session_username: Option<&str>) -> Result<NewArticle, FieldErrors> {
        self.validate()?;

        let excerpt = match self.excerpt.trim() {
            "" => auto_excerpt(&self.content),
            trimmed => trimmed.to_string(),
        };
        let author_name = match self.author_name.trim() {
            "" => session_username.map(str::to_string),
            trimmed => Some(trimmed.to_string()),
        };
        let cover_image = if self.cover_image.is_empty() {
            default_cover(&self.category_name).to_string()
        } else {
            self.cover_image.clone()
        };

        Ok(NewArticle {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            excerpt,
            category_name: self.category_name.clone(),
            author_name,
            cover_image,
            tags: self.tags.clone(),
            featured: self.featured,
            seo_title: None,
            seo_description: None,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    errors.check(FormField::Email, email_problem(email));
    errors.check(FormField::Password, required(password, "Password"));
    errors.into_result()
}

pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    errors.check(FormField::Username, required(username, "Username"));
    errors.check(FormField::Email, email_problem(email));
    errors.check(FormField::Password, required(password, "Password"));
    errors.into_result()
}

/// Blank comments never reach the backend.
pub fn validate_comment(content: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    errors.check(FormField::Comment, required(content, "Comment"));
    errors.into_result()
}

fn required(value: &str, label: &str) -> Option<String> {
    value.trim().is_empty().then(|| format!("{label} is required"))
}

fn email_problem(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if trimmed.chars().count() > EMAIL_MAX_CHARS {
        return Some(format!("Email must be at most {EMAIL_MAX_CHARS} characters"));
    }
    let well_formed = trimmed
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        })
        .unwrap_or(false);
    (!well_formed || trimmed.contains(char::is_whitespace))
        .then(|| format!("invalid email address: {trimmed}"))
}
