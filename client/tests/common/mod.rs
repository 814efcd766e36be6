#![allow(dead_code, reason = "each test binary uses a different subset of helpers")]

use std::sync::Arc;

use seija_client::{storage, ApiClient, MemoryStorage, SessionStorage};
use seija_shared::{Role, Session};
use serde_json::{json, Value};
use wiremock::MockServer;

pub fn client_with(server: &MockServer, storage: Arc<MemoryStorage>) -> Arc<ApiClient> {
    let storage: Arc<dyn SessionStorage> = storage;
    Arc::new(ApiClient::new(&format!("{}/api", server.uri()), storage).expect("build client"))
}

pub fn user(role: Role) -> Session {
    Session {
        id: 7,
        username: "sari".to_string(),
        email: "sari@example.com".to_string(),
        role,
        avatar: None,
        bio: None,
        created_at: None,
    }
}

/// Storage already holding a valid session pair.
pub fn logged_in_storage(role: Role) -> Arc<MemoryStorage> {
    let storage = Arc::new(MemoryStorage::new());
    storage::persist_session(storage.as_ref(), "tok-7", &user(role)).expect("persist session");
    storage
}

pub fn article_json(id: i64, title: &str, likes: u32, comments: u32) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": format!("{title} body"),
        "excerpt": title,
        "author_name": "Sari",
        "category_name": "Puisi",
        "created_at": "2024-05-01T00:00:00Z",
        "like_count": likes,
        "view_count": 0,
        "comment_count": comments
    })
}

pub fn list_body(articles: Vec<Value>) -> Value {
    let count = articles.len();
    json!({
        "success": true,
        "data": articles,
        "pagination": { "current": 1, "total": 1, "totalItems": count }
    })
}
