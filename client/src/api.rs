use std::sync::Arc;

use reqwest::{header::CONTENT_TYPE, Method};
use seija_shared::{
    wire::{
        ArticleUpdate, CommentRequest, LikeResponse, LoginPayload, LoginRequest, NewArticle,
        NewCategory, RegisterRequest, UploadRequest,
    },
    Article, Category, Comment, DashboardStats, Envelope, Filters, ProfilePatch, Session,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::{
    config::ClientConfig,
    storage::{SessionStorage, TOKEN_KEY},
};

/// Message used when a failed response carries no `message` of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "API request failed";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid client configuration: {0}")]
    Client(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend {
                status, ..
            } => Some(*status),
            _ => None,
        }
    }
}

/// Thin JSON client for the magazine REST API.
///
/// The bearer token is re-read from storage on every call, so a login or
/// logout performed through any store is visible to the next request. A
/// missing token and a rejected token fail the same way. There is no retry,
/// no timeout and no cancellation.
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
    storage: Arc<dyn SessionStorage>,
}

impl ApiClient {
    pub fn new(api_base: &str, storage: Arc<dyn SessionStorage>) -> ApiResult<Self> {
        let api_base = api_base.trim().trim_end_matches('/').to_string();
        Url::parse(&api_base)
            .map_err(|err| ApiError::Client(format!("invalid api base `{api_base}`: {err}")))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::Client(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            api_base,
            storage,
        })
    }

    pub fn from_config(config: &ClientConfig, storage: Arc<dyn SessionStorage>) -> ApiResult<Self> {
        Self::new(&config.api_base, storage)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    /// Currently persisted bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.storage
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }

    async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.api_base, endpoint);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token);
        }
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let result = self.execute(builder).await;
        if let Err(err) = &result {
            tracing::error!("api error: {method} {endpoint}: {err}");
        }
        result
    }

    async fn execute<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> ApiResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let body = serde_json::from_str::<Value>(&text).ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|value| value.get("message"))
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .unwrap_or(FALLBACK_ERROR_MESSAGE)
                .to_string();
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body = body.ok_or_else(|| ApiError::Decode("response is not JSON".to_string()))?;
        serde_json::from_value(body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(Method::GET, endpoint, &[], None::<&()>).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, &[], body).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, &[], Some(body)).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, endpoint, &[], Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(Method::DELETE, endpoint, &[], None::<&()>).await
    }

    // =============== Auth ===============

    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<Envelope<LoginPayload>> {
        self.post("/auth/login", Some(credentials)).await
    }

    pub async fn register(&self, user: &RegisterRequest) -> ApiResult<Envelope<Value>> {
        self.post("/auth/register", Some(user)).await
    }

    pub async fn get_profile(&self) -> ApiResult<Envelope<Session>> {
        self.get("/users/profile").await
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> ApiResult<Envelope<Session>> {
        self.put("/users/profile", patch).await
    }

    // =============== Articles ===============

    pub async fn get_articles(&self, filters: &Filters) -> ApiResult<Envelope<Vec<Article>>> {
        self.request(Method::GET, "/articles", &filters.query_pairs(), None::<&()>)
            .await
    }

    pub async fn get_article(&self, id: i64) -> ApiResult<Envelope<Article>> {
        self.get(&format!("/articles/{id}")).await
    }

    pub async fn get_featured_articles(&self) -> ApiResult<Envelope<Vec<Article>>> {
        self.get("/articles/featured").await
    }

    pub async fn create_article(&self, article: &NewArticle) -> ApiResult<Envelope<Value>> {
        self.post("/articles", Some(article)).await
    }

    pub async fn update_article(
        &self,
        id: i64,
        update: &ArticleUpdate,
    ) -> ApiResult<Envelope<Value>> {
        self.put(&format!("/articles/{id}"), update).await
    }

    pub async fn delete_article(&self, id: i64) -> ApiResult<Envelope<Value>> {
        self.delete(&format!("/articles/{id}")).await
    }

    pub async fn like_article(&self, id: i64) -> ApiResult<LikeResponse> {
        self.post(&format!("/articles/{id}/like"), None::<&()>).await
    }

    // =============== Comments ===============

    pub async fn get_comments(&self, article_id: i64) -> ApiResult<Envelope<Vec<Comment>>> {
        self.get(&format!("/articles/{article_id}/comments")).await
    }

    pub async fn add_comment(
        &self,
        article_id: i64,
        content: &str,
        parent_id: Option<i64>,
    ) -> ApiResult<Envelope<Value>> {
        let body = CommentRequest {
            content: content.to_string(),
            parent_id,
        };
        self.post(&format!("/articles/{article_id}/comments"), Some(&body))
            .await
    }

    pub async fn update_comment(&self, comment_id: i64, content: &str) -> ApiResult<Envelope<Value>> {
        let body = serde_json::json!({ "content": content });
        self.put(&format!("/articles/comments/{comment_id}"), &body)
            .await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> ApiResult<Envelope<Value>> {
        self.delete(&format!("/articles/comments/{comment_id}"))
            .await
    }

    // =============== Categories / admin / upload ===============

    pub async fn get_categories(&self) -> ApiResult<Envelope<Vec<Category>>> {
        self.get("/categories").await
    }

    pub async fn create_category(&self, category: &NewCategory) -> ApiResult<Envelope<Value>> {
        self.post("/categories", Some(category)).await
    }

    pub async fn get_statistics(&self) -> ApiResult<Envelope<DashboardStats>> {
        self.get("/admin/statistics").await
    }

    pub async fn upload_file(&self, upload: &UploadRequest) -> ApiResult<Envelope<Value>> {
        self.post("/upload", Some(upload)).await
    }
}

/// Backend message of a non-successful envelope, or the generic fallback.
pub fn envelope_message<T>(envelope: &Envelope<T>) -> String {
    envelope
        .message
        .clone()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}
