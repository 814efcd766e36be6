use std::{
    env,
    path::{Path, PathBuf},
};

/// Backend base URL used when `SEIJA_API_URL` is not set.
pub const DEFAULT_API_BASE: &str = match option_env!("SEIJA_API_BASE") {
    Some(url) => url,
    None => "http://localhost:3001/api",
};

/// What the article store does with its caches when a list fetch fails or
/// comes back empty. The [`crate::articles::LoadState`] is reported either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Install the built-in placeholder datasets so the UI never renders blank.
    #[default]
    Placeholder,
    /// Clear the caches and let the caller decide what to show.
    Surface,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub session_dir: PathBuf,
    pub fallback: FallbackPolicy,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let api_base = env::var("SEIJA_API_URL")
            .ok()
            .and_then(|value| normalize_api_base(&value))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let session_dir = env::var("SEIJA_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_dir());
        let fallback = if parse_bool_env("SEIJA_FALLBACK_PLACEHOLDERS", true) {
            FallbackPolicy::Placeholder
        } else {
            FallbackPolicy::Surface
        };

        Self {
            api_base,
            session_dir,
            fallback,
        }
    }

    /// Override the base URL; blank values are ignored.
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        if let Some(api_base) = normalize_api_base(api_base) {
            self.api_base = api_base;
        }
        self
    }

    pub fn with_session_dir(mut self, session_dir: impl Into<PathBuf>) -> Self {
        self.session_dir = session_dir.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            session_dir: default_session_dir(),
            fallback: FallbackPolicy::default(),
        }
    }
}

fn normalize_api_base(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_bool_env(key: &str, default_value: bool) -> bool {
    env::var(key)
        .ok()
        .map(|value| parse_bool(&value))
        .unwrap_or(default_value)
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn default_session_dir() -> PathBuf {
    let home = env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(".").to_path_buf());
    home.join(".seija").join("session")
}
