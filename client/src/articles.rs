use std::sync::Arc;

use futures::future::join;
use seija_shared::{
    build_comment_tree,
    fallback::{fallback_categories, placeholder_articles},
    wire::{ArticleUpdate, NewArticle},
    Article, Category, Comment, FilterOverrides, Filters, Pagination,
};

use crate::{
    api::{envelope_message, ApiClient},
    config::FallbackPolicy,
};

/// Outcome of the most recent fetch of one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Never requested.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The cache holds live data.
    Loaded,
    /// The backend answered successfully but had nothing to return.
    Empty,
    /// The request failed; carries the message shown to the user.
    Failed(String),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// Result of a privileged action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The backend accepted the action.
    Done,
    /// No session token; nothing was sent. The caller should prompt a login.
    LoginRequired,
    /// Rejected by the backend or lost on the network; already logged.
    Failed,
}

impl ActionOutcome {
    /// Whether the action went through.
    pub fn is_done(self) -> bool {
        self == ActionOutcome::Done
    }
}

/// How a successful mutation brings the article caches back in line with the
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Counters are patched locally and trusted until the next list fetch.
    OptimisticPatch,
    /// The list is re-fetched with the current filters.
    Refetch,
}

/// A write against the article API, classified by how it is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Like { liked: bool },
    AddComment,
    EditComment,
    RemoveComment,
    CreateArticle,
    UpdateArticle,
    DeleteArticle,
}

impl Mutation {
    pub fn sync_mode(self) -> SyncMode {
        match self {
            Mutation::Like {
                ..
            }
            | Mutation::AddComment
            | Mutation::EditComment
            | Mutation::RemoveComment => SyncMode::OptimisticPatch,
            Mutation::CreateArticle | Mutation::UpdateArticle | Mutation::DeleteArticle => {
                SyncMode::Refetch
            },
        }
    }

    fn like_delta(self) -> i64 {
        match self {
            Mutation::Like {
                liked: true,
            } => 1,
            Mutation::Like {
                liked: false,
            } => -1,
            _ => 0,
        }
    }

    fn comment_delta(self) -> i64 {
        match self {
            Mutation::AddComment => 1,
            Mutation::RemoveComment => -1,
            _ => 0,
        }
    }
}

/// Page-lifetime cache of articles, categories and the open article's
/// comments.
///
/// Comment threads are always re-fetched after a comment mutation, whatever
/// the [`SyncMode`] of the article counters.
pub struct ArticleStore {
    client: Arc<ApiClient>,
    fallback: FallbackPolicy,
    filters: Filters,
    articles: Vec<Article>,
    pagination: Pagination,
    list_state: LoadState,
    current_article: Option<Article>,
    article_state: LoadState,
    categories: Vec<Category>,
    categories_state: LoadState,
    comments: Vec<Comment>,
    comments_article: Option<i64>,
    comments_state: LoadState,
}

impl ArticleStore {
    /// Empty store; nothing is fetched until asked.
    pub fn new(client: Arc<ApiClient>, fallback: FallbackPolicy) -> Self {
        Self {
            client,
            fallback,
            filters: Filters::default(),
            articles: Vec::new(),
            pagination: Pagination::default(),
            list_state: LoadState::Idle,
            current_article: None,
            article_state: LoadState::Idle,
            categories: Vec::new(),
            categories_state: LoadState::Idle,
            comments: Vec::new(),
            comments_article: None,
            comments_state: LoadState::Idle,
        }
    }

    /// Filters of the last successful list query, or pending edits made
    /// through [`Self::update_filters`].
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Cached list page, possibly the placeholder set.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn list_state(&self) -> &LoadState {
        &self.list_state
    }

    /// Article last loaded by [`Self::fetch_article`].
    pub fn current_article(&self) -> Option<&Article> {
        self.current_article.as_ref()
    }

    pub fn article_state(&self) -> &LoadState {
        &self.article_state
    }

    /// Cached categories, possibly the fallback set.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_state(&self) -> &LoadState {
        &self.categories_state
    }

    /// Comment tree of the article last passed to [`Self::fetch_comments`].
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comments_article(&self) -> Option<i64> {
        self.comments_article
    }

    pub fn comments_state(&self) -> &LoadState {
        &self.comments_state
    }

    /// Up to three featured articles, in cache order.
    pub fn featured_articles(&self) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|article| article.is_featured())
            .take(3)
            .collect()
    }

    /// The three most liked articles; ties keep cache order.
    pub fn trending_articles(&self) -> Vec<&Article> {
        let mut ranked: Vec<&Article> = self.articles.iter().collect();
        ranked.sort_by(|left, right| right.like_count.cmp(&left.like_count));
        ranked.truncate(3);
        ranked
    }

    /// Fetch the article list and the categories side by side.
    pub async fn load_initial(&mut self) {
        let client = Arc::clone(&self.client);
        let filters = self.filters.merged(&FilterOverrides::default());
        self.list_state = LoadState::Loading;
        self.categories_state = LoadState::Loading;

        let (articles, categories) =
            join(query_articles(&client, &filters), query_categories(&client)).await;
        self.apply_articles(filters, articles);
        self.apply_categories(categories);
    }

    /// Query the list with `overrides` merged into the current filters.
    /// `page` goes back to 1 unless the overrides name one. The merged
    /// filters are kept only when the query returned articles.
    pub async fn fetch_articles(&mut self, overrides: FilterOverrides) -> LoadState {
        let filters = self.filters.merged(&overrides);
        self.list_state = LoadState::Loading;
        tracing::info!(
            "fetching articles: search={:?} category={} sort={} page={}",
            filters.search,
            filters.category,
            filters.sort,
            filters.page
        );

        let client = Arc::clone(&self.client);
        let outcome = query_articles(&client, &filters).await;
        self.apply_articles(filters, outcome);
        self.list_state.clone()
    }

    fn apply_articles(&mut self, filters: Filters, outcome: Result<ArticlePage, String>) {
        self.list_state = match outcome {
            Ok(page) if !page.articles.is_empty() => {
                tracing::info!("loaded {} articles", page.articles.len());
                self.pagination = page
                    .pagination
                    .unwrap_or_else(|| Pagination::single_page(page.articles.len()));
                self.articles = page.articles;
                self.filters = filters;
                LoadState::Loaded
            },
            Ok(_) => {
                tracing::warn!("no articles returned");
                self.install_article_fallback();
                LoadState::Empty
            },
            Err(message) => {
                tracing::error!("error fetching articles: {message}");
                self.install_article_fallback();
                LoadState::Failed(message)
            },
        };
    }

    fn install_article_fallback(&mut self) {
        self.articles = match self.fallback {
            FallbackPolicy::Placeholder => {
                tracing::warn!("showing placeholder articles");
                placeholder_articles()
            },
            FallbackPolicy::Surface => Vec::new(),
        };
        self.pagination = Pagination::single_page(self.articles.len());
    }

    /// Load one article into the current-article slot. `None` (with the slot
    /// cleared) when it is missing or the request fails.
    pub async fn fetch_article(&mut self, id: i64) -> Option<Article> {
        self.article_state = LoadState::Loading;
        match self.client.get_article(id).await {
            Ok(envelope) => match envelope.into_data() {
                Some(article) => {
                    tracing::info!("article {id} loaded: {}", article.title);
                    self.current_article = Some(article.clone());
                    self.article_state = LoadState::Loaded;
                    Some(article)
                },
                None => {
                    tracing::error!("article {id} not found");
                    self.current_article = None;
                    self.article_state = LoadState::Empty;
                    None
                },
            },
            Err(err) => {
                self.current_article = None;
                self.article_state = LoadState::Failed(err.to_string());
                None
            },
        }
    }

    /// Replace the category cache. Repeating the call yields the same
    /// state for the same backend answer.
    pub async fn fetch_categories(&mut self) -> LoadState {
        self.categories_state = LoadState::Loading;
        let outcome = query_categories(&self.client).await;
        self.apply_categories(outcome);
        self.categories_state.clone()
    }

    fn apply_categories(&mut self, outcome: Result<Vec<Category>, String>) {
        self.categories_state = match outcome {
            Ok(categories) => {
                let state = if categories.is_empty() {
                    LoadState::Empty
                } else {
                    LoadState::Loaded
                };
                self.categories = categories;
                state
            },
            Err(message) => {
                tracing::error!("error fetching categories: {message}");
                self.categories = match self.fallback {
                    FallbackPolicy::Placeholder => fallback_categories(),
                    FallbackPolicy::Surface => Vec::new(),
                };
                LoadState::Failed(message)
            },
        };
    }

    /// Replace the comment tree with the thread of `article_id`. A failed
    /// fetch leaves the previous tree in place.
    pub async fn fetch_comments(&mut self, article_id: i64) -> LoadState {
        self.comments_state = LoadState::Loading;
        self.comments_state = match self.client.get_comments(article_id).await {
            Ok(envelope) if envelope.success => {
                let tree = build_comment_tree(envelope.data.unwrap_or_default());
                let state = if tree.is_empty() {
                    LoadState::Empty
                } else {
                    LoadState::Loaded
                };
                self.comments = tree;
                self.comments_article = Some(article_id);
                state
            },
            Ok(envelope) => LoadState::Failed(envelope_message(&envelope)),
            Err(err) => {
                tracing::error!("error fetching comments: {err}");
                LoadState::Failed(err.to_string())
            },
        };
        self.comments_state.clone()
    }

    /// Toggle the caller's like. The backend reports the new state and the
    /// cached `like_count`s move by one accordingly; nothing is re-fetched.
    pub async fn like_article(&mut self, id: i64) -> ActionOutcome {
        if !self.has_token("like articles") {
            return ActionOutcome::LoginRequired;
        }
        match self.client.like_article(id).await {
            Ok(response) if response.success => {
                let mutation = Mutation::Like {
                    liked: response.liked,
                };
                self.reconcile(mutation, id).await;
                ActionOutcome::Done
            },
            Ok(response) => {
                tracing::warn!("like rejected: {}", response.message.unwrap_or_default());
                ActionOutcome::Failed
            },
            Err(err) => {
                tracing::error!("error liking article: {err}");
                ActionOutcome::Failed
            },
        }
    }

    /// Post a comment (or a reply when `parent_id` is set), then reload the
    /// thread and bump the cached `comment_count`.
    pub async fn add_comment(
        &mut self,
        article_id: i64,
        content: &str,
        parent_id: Option<i64>,
    ) -> ActionOutcome {
        if !self.has_token("comment") {
            return ActionOutcome::LoginRequired;
        }
        match self.client.add_comment(article_id, content, parent_id).await {
            Ok(envelope) if envelope.success => {
                self.fetch_comments(article_id).await;
                self.reconcile(Mutation::AddComment, article_id).await;
                ActionOutcome::Done
            },
            Ok(envelope) => {
                tracing::warn!("comment rejected: {}", envelope_message(&envelope));
                ActionOutcome::Failed
            },
            Err(err) => {
                tracing::error!("error adding comment: {err}");
                ActionOutcome::Failed
            },
        }
    }

    pub async fn edit_comment(
        &mut self,
        article_id: i64,
        comment_id: i64,
        content: &str,
    ) -> ActionOutcome {
        if !self.has_token("edit comments") {
            return ActionOutcome::LoginRequired;
        }
        match self.client.update_comment(comment_id, content).await {
            Ok(envelope) if envelope.success => {
                self.fetch_comments(article_id).await;
                self.reconcile(Mutation::EditComment, article_id).await;
                ActionOutcome::Done
            },
            Ok(envelope) => {
                tracing::warn!("comment edit rejected: {}", envelope_message(&envelope));
                ActionOutcome::Failed
            },
            Err(err) => {
                tracing::error!("error editing comment: {err}");
                ActionOutcome::Failed
            },
        }
    }

    pub async fn remove_comment(&mut self, article_id: i64, comment_id: i64) -> ActionOutcome {
        if !self.has_token("delete comments") {
            return ActionOutcome::LoginRequired;
        }
        match self.client.delete_comment(comment_id).await {
            Ok(envelope) if envelope.success => {
                self.fetch_comments(article_id).await;
                self.reconcile(Mutation::RemoveComment, article_id).await;
                ActionOutcome::Done
            },
            Ok(envelope) => {
                tracing::warn!("comment removal rejected: {}", envelope_message(&envelope));
                ActionOutcome::Failed
            },
            Err(err) => {
                tracing::error!("error removing comment: {err}");
                ActionOutcome::Failed
            },
        }
    }

    /// `POST /articles`, then re-fetch the list.
    pub async fn create_article(&mut self, article: &NewArticle) -> bool {
        if !self.has_token("create articles") {
            return false;
        }
        tracing::info!("creating article: {}", article.title);
        match self.client.create_article(article).await {
            Ok(envelope) if envelope.success => {
                tracing::info!("article created");
                self.reconcile(Mutation::CreateArticle, 0).await;
                true
            },
            Ok(envelope) => {
                tracing::error!("failed to create article: {}", envelope_message(&envelope));
                false
            },
            Err(err) => {
                tracing::error!("error creating article: {err}");
                false
            },
        }
    }

    pub async fn update_article(&mut self, id: i64, update: &ArticleUpdate) -> bool {
        if !self.has_token("update articles") {
            return false;
        }
        match self.client.update_article(id, update).await {
            Ok(envelope) if envelope.success => {
                self.reconcile(Mutation::UpdateArticle, id).await;
                true
            },
            Ok(envelope) => {
                tracing::error!("failed to update article {id}: {}", envelope_message(&envelope));
                false
            },
            Err(err) => {
                tracing::error!("error updating article {id}: {err}");
                false
            },
        }
    }

    pub async fn delete_article(&mut self, id: i64) -> bool {
        if !self.has_token("delete articles") {
            return false;
        }
        tracing::info!("deleting article: {id}");
        match self.client.delete_article(id).await {
            Ok(envelope) if envelope.success => {
                tracing::info!("article {id} deleted");
                self.reconcile(Mutation::DeleteArticle, id).await;
                true
            },
            Ok(envelope) => {
                tracing::error!("failed to delete article {id}: {}", envelope_message(&envelope));
                false
            },
            Err(err) => {
                tracing::error!("error deleting article {id}: {err}");
                false
            },
        }
    }

    /// Merge `overrides` into the filters without fetching. Returns whether
    /// search, category, sort or page changed.
    pub fn update_filters(&mut self, overrides: &FilterOverrides) -> bool {
        self.filters.update(overrides)
    }

    /// Back to the default filters, without fetching.
    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
    }

    /// Update the filters and re-fetch when a query-driving field changed.
    pub async fn apply_filters(&mut self, overrides: FilterOverrides) -> LoadState {
        if !self.update_filters(&overrides) {
            return self.list_state.clone();
        }
        let page = self.filters.page;
        self.fetch_articles(FilterOverrides {
            page: Some(page),
            ..FilterOverrides::default()
        })
        .await
    }

    async fn reconcile(&mut self, mutation: Mutation, article_id: i64) {
        match mutation.sync_mode() {
            SyncMode::OptimisticPatch => {
                let likes = mutation.like_delta();
                let comments = mutation.comment_delta();
                let current = self
                    .current_article
                    .as_mut()
                    .filter(|article| article.id == article_id);
                for article in self
                    .articles
                    .iter_mut()
                    .filter(|article| article.id == article_id)
                    .chain(current)
                {
                    article.like_count = shift(article.like_count, likes);
                    article.comment_count = shift(article.comment_count, comments);
                }
            },
            SyncMode::Refetch => {
                self.fetch_articles(FilterOverrides::default()).await;
            },
        }
    }

    fn has_token(&self, action: &str) -> bool {
        let present = self.client.token().is_some();
        if !present {
            tracing::warn!("please login to {action}");
        }
        present
    }
}

struct ArticlePage {
    articles: Vec<Article>,
    pagination: Option<Pagination>,
}

async fn query_articles(client: &ApiClient, filters: &Filters) -> Result<ArticlePage, String> {
    let envelope = client
        .get_articles(filters)
        .await
        .map_err(|err| err.to_string())?;
    if !envelope.success {
        return Err(envelope_message(&envelope));
    }
    Ok(ArticlePage {
        articles: envelope.data.unwrap_or_default(),
        pagination: envelope.pagination,
    })
}

async fn query_categories(client: &ApiClient) -> Result<Vec<Category>, String> {
    let envelope = client
        .get_categories()
        .await
        .map_err(|err| err.to_string())?;
    if !envelope.success {
        return Err(envelope_message(&envelope));
    }
    Ok(envelope.data.unwrap_or_default())
}

fn shift(count: u32, delta: i64) -> u32 {
    (i64::from(count) + delta).clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_modes_are_explicit_per_mutation() {
        assert_eq!(
            Mutation::Like {
                liked: true
            }
            .sync_mode(),
            SyncMode::OptimisticPatch
        );
        assert_eq!(Mutation::AddComment.sync_mode(), SyncMode::OptimisticPatch);
        assert_eq!(Mutation::CreateArticle.sync_mode(), SyncMode::Refetch);
        assert_eq!(Mutation::DeleteArticle.sync_mode(), SyncMode::Refetch);
    }

    #[test]
    fn counters_never_underflow() {
        assert_eq!(shift(0, -1), 0);
        assert_eq!(shift(4, -1), 3);
        assert_eq!(shift(4, 1), 5);
    }
}
