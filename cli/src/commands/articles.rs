use std::{fs, path::PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use seija_client::{AppContext, LoadState};
use seija_shared::{
    forms::{self, ArticleDraft},
    wire::ArticleUpdate,
    Article, Comment, FilterOverrides, Filters, Pagination,
};
use serde::Serialize;

use super::{check_form, check_outcome, print_json};
use crate::utils;

#[derive(Serialize)]
struct ArticlePageView<'a> {
    state: String,
    filters: &'a Filters,
    pagination: Pagination,
    articles: &'a [Article],
}

#[derive(Serialize)]
struct HighlightsView<'a> {
    featured: Vec<Article>,
    trending: Vec<&'a Article>,
}

#[derive(Serialize)]
struct ArticleDetailView<'a> {
    article: &'a Article,
    comments: &'a [Comment],
}

/// Arguments of `seija create` once the body has been read.
pub struct CreateInput {
    pub title: String,
    pub content: String,
    pub category: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub tags: Option<String>,
    pub featured: bool,
    pub cover: Option<PathBuf>,
}

fn describe(state: &LoadState) -> String {
    match state {
        LoadState::Idle => "idle".to_string(),
        LoadState::Loading => "loading".to_string(),
        LoadState::Loaded => "loaded".to_string(),
        LoadState::Empty => "empty".to_string(),
        LoadState::Failed(message) => format!("failed: {message}"),
    }
}

pub async fn list(app: &mut AppContext, overrides: FilterOverrides, highlights: bool) -> Result<()> {
    let state = app.articles.fetch_articles(overrides).await;
    if let LoadState::Failed(message) = &state {
        if app.articles.articles().is_empty() {
            bail!("failed to load articles: {message}");
        }
        tracing::warn!("showing fallback articles: {message}");
    }

    if highlights {
        let featured = match app.client.get_featured_articles().await {
            Ok(envelope) => envelope.into_data().unwrap_or_default(),
            Err(err) => {
                tracing::warn!("featured endpoint unavailable, using the page: {err}");
                Vec::new()
            },
        };
        let featured = if featured.is_empty() {
            app.articles.featured_articles().into_iter().cloned().collect()
        } else {
            featured.into_iter().take(3).collect()
        };
        return print_json(&HighlightsView {
            featured,
            trending: app.articles.trending_articles(),
        });
    }
    print_json(&ArticlePageView {
        state: describe(&state),
        filters: app.articles.filters(),
        pagination: app.articles.pagination(),
        articles: app.articles.articles(),
    })
}

pub async fn show(app: &mut AppContext, id: i64) -> Result<()> {
    if app.articles.fetch_article(id).await.is_none() {
        bail!("article {id} unavailable ({})", describe(app.articles.article_state()));
    }
    if let LoadState::Failed(message) = app.articles.fetch_comments(id).await {
        tracing::warn!("comments unavailable: {message}");
    }
    let article = app
        .articles
        .current_article()
        .ok_or_else(|| anyhow!("article {id} unavailable"))?;
    print_json(&ArticleDetailView {
        article,
        comments: app.articles.comments(),
    })
}

pub async fn like(app: &mut AppContext, id: i64) -> Result<()> {
    check_outcome(app.articles.like_article(id).await, "like articles")?;
    let cached = app
        .articles
        .current_article()
        .filter(|article| article.id == id)
        .or_else(|| app.articles.articles().iter().find(|article| article.id == id));
    match cached {
        Some(article) => println!("Article {id} now has {} like(s).", article.like_count),
        None => println!("Like toggled on article {id}."),
    }
    Ok(())
}

pub async fn comment(
    app: &mut AppContext,
    id: i64,
    content: &str,
    reply_to: Option<i64>,
) -> Result<()> {
    check_form(forms::validate_comment(content))?;
    check_outcome(app.articles.add_comment(id, content, reply_to).await, "comment")?;
    print_json(&app.articles.comments())
}

pub async fn edit_comment(
    app: &mut AppContext,
    id: i64,
    comment_id: i64,
    content: &str,
) -> Result<()> {
    check_form(forms::validate_comment(content))?;
    check_outcome(
        app.articles.edit_comment(id, comment_id, content).await,
        "edit comments",
    )?;
    print_json(&app.articles.comments())
}

pub async fn delete_comment(app: &mut AppContext, id: i64, comment_id: i64) -> Result<()> {
    check_outcome(app.articles.remove_comment(id, comment_id).await, "delete comments")?;
    print_json(&app.articles.comments())
}

pub async fn create(app: &mut AppContext, input: CreateInput) -> Result<()> {
    let mut draft = ArticleDraft::default();
    draft.title = input.title;
    draft.content = input.content;
    draft.excerpt = input.excerpt.unwrap_or_default();
    draft.author_name = input.author.unwrap_or_default();
    draft.tags = input.tags.unwrap_or_default();
    draft.featured = input.featured;
    draft.set_category(&input.category);
    check_form(draft.validate())?;

    if app.client.token().is_none() {
        bail!("please login to create articles (run `seija login`)");
    }

    if let Some(path) = input.cover.as_deref() {
        let size = fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len();
        let upload = utils::load_upload(path)?;
        draft
            .attach_cover_upload(&upload.filename, size, utils::guess_mime(path))
            .map_err(|message| anyhow!("cover_image: {message}"))?;
        let response = app
            .client
            .upload_file(&upload)
            .await
            .context("cover upload failed")?;
        if let Some(url) = response
            .data
            .as_ref()
            .and_then(|data| data.get("url"))
            .and_then(|url| url.as_str())
        {
            draft.set_custom_cover(url);
        }
    }

    let username = app.auth.session().map(|session| session.username.clone());
    let article = match draft.submission(username.as_deref()) {
        Ok(article) => article,
        Err(errors) => bail!("invalid input:\n{}", utils::describe_field_errors(&errors)),
    };
    if !app.articles.create_article(&article).await {
        bail!("failed to create article; see the log for details");
    }
    println!("Article \"{}\" submitted.", article.title);
    Ok(())
}

pub async fn update(app: &mut AppContext, id: i64, update: ArticleUpdate) -> Result<()> {
    if update == ArticleUpdate::default() {
        bail!("nothing to update");
    }
    if !app.articles.update_article(id, &update).await {
        bail!("failed to update article {id}; are you logged in?");
    }
    println!("Article {id} updated.");
    Ok(())
}

pub async fn delete(app: &mut AppContext, id: i64) -> Result<()> {
    if !app.articles.delete_article(id).await {
        bail!("failed to delete article {id}; are you logged in?");
    }
    println!("Article {id} deleted.");
    Ok(())
}

pub async fn categories(app: &mut AppContext) -> Result<()> {
    if let LoadState::Failed(message) = app.articles.fetch_categories().await {
        tracing::warn!("showing fallback categories: {message}");
    }
    print_json(&app.articles.categories())
}
