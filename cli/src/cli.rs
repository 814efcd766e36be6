use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "seija", version, about = "SEIJA magazine command-line client")]
pub struct Cli {
    /// Backend base URL. Overrides `SEIJA_API_URL`.
    #[arg(long, global = true)]
    pub api_base: Option<String>,
    /// Directory holding the persisted session. Overrides `SEIJA_SESSION_DIR`.
    #[arg(long, global = true)]
    pub session_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account. Log in afterwards.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the persisted session.
    Logout,
    /// Print the current session.
    Whoami {
        /// Reload the profile from the backend first.
        #[arg(long)]
        refresh: bool,
    },
    /// Change profile fields.
    ProfileUpdate {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// Only update the locally persisted copy.
        #[arg(long)]
        local: bool,
    },
    /// List articles.
    Articles {
        #[arg(long)]
        search: Option<String>,
        /// Category slug, or `all`.
        #[arg(long)]
        category: Option<String>,
        /// `newest`, `oldest` or `popular`.
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Print featured and trending picks instead of the page.
        #[arg(long)]
        highlights: bool,
    },
    /// Show one article with its comment thread.
    Article {
        id: i64,
    },
    /// Toggle a like on an article.
    Like {
        id: i64,
    },
    /// Comment on an article.
    Comment {
        /// Article id.
        id: i64,
        #[arg(long)]
        content: String,
        /// Reply to this comment id.
        #[arg(long)]
        reply_to: Option<i64>,
    },
    /// Edit one of your comments.
    EditComment {
        /// Article id.
        id: i64,
        #[arg(long)]
        comment: i64,
        #[arg(long)]
        content: String,
    },
    /// Delete one of your comments.
    DeleteComment {
        /// Article id.
        id: i64,
        #[arg(long)]
        comment: i64,
    },
    /// Submit a new article.
    Create {
        #[arg(long)]
        title: String,
        /// Inline body text.
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read the body from a file.
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        category: String,
        /// Defaults to the first 150 characters of the body.
        #[arg(long)]
        excerpt: Option<String>,
        /// Defaults to the logged-in username.
        #[arg(long)]
        author: Option<String>,
        /// Comma-separated tags.
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        featured: bool,
        /// Upload this image and use it as the cover.
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Update an existing article.
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        excerpt: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        featured: Option<bool>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete an article.
    Delete {
        id: i64,
    },
    /// List categories.
    Categories,
    /// Create a category (admin).
    CreateCategory {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Print dashboard statistics (admin).
    Stats,
    /// Upload a file and print the backend response.
    Upload {
        file: PathBuf,
    },
}
