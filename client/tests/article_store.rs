mod common;

use std::sync::Arc;

use common::{article_json, client_with, list_body, logged_in_storage};
use seija_client::{ActionOutcome, ArticleStore, FallbackPolicy, LoadState, MemoryStorage};
use seija_shared::{
    wire::{ArticleUpdate, NewArticle},
    FilterOverrides, Role,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn mount_list(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn new_article() -> NewArticle {
    NewArticle {
        title: "Baru".to_string(),
        content: "isi".to_string(),
        excerpt: "isi".to_string(),
        category_name: "Puisi".to_string(),
        author_name: None,
        cover_image: "/cover/puisi.jpg".to_string(),
        tags: String::new(),
        featured: false,
        seo_title: None,
        seo_description: None,
    }
}

#[tokio::test]
async fn anonymous_like_and_comment_never_reach_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);

    assert_eq!(store.like_article(1).await, ActionOutcome::LoginRequired);
    assert_eq!(store.add_comment(1, "halo", None).await, ActionOutcome::LoginRequired);
    assert!(!store.delete_article(1).await);
    assert!(!store.create_article(&new_article()).await);
    assert!(!store.update_article(1, &ArticleUpdate::default()).await);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn like_patches_cached_counts_without_refetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
            article_json(1, "Senja", 0, 0),
            article_json(2, "Fajar", 5, 1),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/articles/2/like"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "liked": true })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/articles/1/like"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "liked": false })),
        )
        .mount(&server)
        .await;

    let client = client_with(&server, logged_in_storage(Role::User));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    assert_eq!(store.fetch_articles(FilterOverrides::default()).await, LoadState::Loaded);

    assert_eq!(store.like_article(2).await, ActionOutcome::Done);
    assert_eq!(store.like_article(1).await, ActionOutcome::Done);

    let counts: Vec<u32> = store.articles().iter().map(|a| a.like_count).collect();
    assert_eq!(counts, vec![0, 6]);
}

#[tokio::test]
async fn adding_a_comment_reloads_the_thread_and_bumps_the_count() {
    let server = MockServer::start().await;
    mount_list(&server, list_body(vec![article_json(4, "Hujan", 2, 1)])).await;
    Mock::given(method("GET"))
        .and(path("/api/articles/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": article_json(4, "Hujan", 2, 1)
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/articles/4/comments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/4/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "content": "first", "parent_id": null },
                { "id": 2, "content": "reply", "parent_id": 1 },
                { "id": 3, "content": "lost", "parent_id": 99 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, logged_in_storage(Role::User));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    store.fetch_articles(FilterOverrides::default()).await;
    store.fetch_article(4).await;

    assert_eq!(store.add_comment(4, "reply", Some(1)).await, ActionOutcome::Done);

    assert_eq!(store.comments_article(), Some(4));
    assert_eq!(store.comments().len(), 1);
    assert_eq!(store.comments()[0].replies.len(), 1);
    assert_eq!(store.articles()[0].comment_count, 2);
    assert_eq!(store.current_article().map(|a| a.comment_count), Some(2));
}

#[tokio::test]
async fn empty_list_falls_back_according_to_policy() {
    let server = MockServer::start().await;
    mount_list(&server, json!({ "success": true, "data": [] })).await;

    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut placeholder = ArticleStore::new(Arc::clone(&client), FallbackPolicy::Placeholder);
    assert_eq!(placeholder.fetch_articles(FilterOverrides::default()).await, LoadState::Empty);
    assert_eq!(placeholder.articles().len(), 1);
    assert_eq!(placeholder.articles()[0].title, "Welcome to SEIJA Magazine");
    assert_eq!(placeholder.pagination().total_items, 1);

    let mut surface = ArticleStore::new(client, FallbackPolicy::Surface);
    assert_eq!(surface.fetch_articles(FilterOverrides::default()).await, LoadState::Empty);
    assert!(surface.articles().is_empty());
}

#[tokio::test]
async fn failed_list_reports_the_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({ "success": false, "message": "Database offline" })),
        )
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Surface);
    let state = store
        .fetch_articles(FilterOverrides {
            category: Some("puisi".to_string()),
            ..FilterOverrides::default()
        })
        .await;

    assert_eq!(state, LoadState::Failed("Database offline".to_string()));
    assert!(store.articles().is_empty());
    assert_eq!(store.filters().category, "all");
}

#[tokio::test]
async fn new_filters_reset_the_page_unless_one_is_given() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_body(vec![article_json(9, "P3", 0, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("page", "1"))
        .and(query_param("category", "novel"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_body(vec![article_json(1, "N1", 0, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);

    store
        .fetch_articles(FilterOverrides {
            page: Some(3),
            ..FilterOverrides::default()
        })
        .await;
    assert_eq!(store.filters().page, 3);

    store
        .fetch_articles(FilterOverrides {
            category: Some("novel".to_string()),
            ..FilterOverrides::default()
        })
        .await;
    assert_eq!(store.filters().page, 1);
    assert_eq!(store.filters().category, "novel");
    assert_eq!(store.articles()[0].title, "N1");
}

#[tokio::test]
async fn update_filters_reports_changes_without_fetching() {
    let server = MockServer::start().await;
    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);

    let same = FilterOverrides {
        sort: Some("newest".to_string()),
        ..FilterOverrides::default()
    };
    assert!(!store.update_filters(&same));

    let search = FilterOverrides {
        search: Some("puisi".to_string()),
        ..FilterOverrides::default()
    };
    assert!(store.update_filters(&search));
    assert_eq!(store.filters().search, "puisi");

    store.clear_filters();
    assert_eq!(store.filters().search, "");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn failed_article_fetch_clears_the_current_article() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": article_json(5, "Pelangi", 0, 0)
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/6"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "message": "Article not found" })),
        )
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);

    assert!(store.fetch_article(5).await.is_some());
    assert!(store.fetch_article(6).await.is_none());
    assert!(store.current_article().is_none());
    assert_eq!(store.article_state(), &LoadState::Failed("Article not found".to_string()));
}

#[tokio::test]
async fn category_fetch_is_idempotent_and_falls_back_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "id": 1, "name": "Novel", "slug": "novel", "article_count": 3 }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    store.fetch_categories().await;
    let first = store.categories().to_vec();
    assert_eq!(store.fetch_categories().await, LoadState::Loaded);
    assert_eq!(store.categories(), first.as_slice());

    let offline = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&offline)
        .await;
    let client = client_with(&offline, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    assert!(store.fetch_categories().await.is_failed());
    assert_eq!(store.categories().len(), 6);
    assert_eq!(store.categories()[5].slug, "coding");
}

#[tokio::test]
async fn creating_an_article_refetches_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_body(vec![article_json(11, "Baru", 0, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, logged_in_storage(Role::User));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    assert!(store.create_article(&new_article()).await);
    assert_eq!(store.list_state(), &LoadState::Loaded);
    assert_eq!(store.articles()[0].id, 11);
}

#[tokio::test]
async fn load_initial_fills_list_and_categories() {
    let server = MockServer::start().await;
    mount_list(&server, list_body(vec![
        json!({ "id": 1, "title": "A", "like_count": 1, "featured": true }),
        json!({ "id": 2, "title": "B", "like_count": 9 }),
        json!({ "id": 3, "title": "C", "like_count": 4, "featured": true }),
        json!({ "id": 4, "title": "D", "like_count": 9 }),
    ]))
    .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    store.load_initial().await;

    assert_eq!(store.list_state(), &LoadState::Loaded);
    assert_eq!(store.categories_state(), &LoadState::Empty);
    let trending: Vec<i64> = store.trending_articles().iter().map(|a| a.id).collect();
    assert_eq!(trending, vec![2, 4, 3]);
    let featured: Vec<i64> = store.featured_articles().iter().map(|a| a.id).collect();
    assert_eq!(featured, vec![1, 3]);
}

#[tokio::test]
async fn null_columns_do_not_sink_the_list() {
    let server = MockServer::start().await;
    mount_list(&server, list_body(vec![
        article_json(1, "Senja", 0, 0),
        json!({ "id": 2, "title": "Fajar", "excerpt": null, "author_name": null, "like_count": null }),
    ]))
    .await;

    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);

    assert_eq!(store.fetch_articles(FilterOverrides::default()).await, LoadState::Loaded);
    let titles: Vec<&str> = store.articles().iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Senja", "Fajar"]);
    assert_eq!(store.articles()[1].excerpt, "");
}

#[tokio::test]
async fn apply_filters_refetches_only_on_query_changes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_body(vec![article_json(1, "P1", 0, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "24"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_body(vec![article_json(2, "P2", 0, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, Arc::new(MemoryStorage::new()));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    store.fetch_articles(FilterOverrides::default()).await;

    let limit_only = store
        .apply_filters(FilterOverrides {
            limit: Some(24),
            ..FilterOverrides::default()
        })
        .await;
    assert_eq!(limit_only, LoadState::Loaded);
    assert_eq!(store.articles()[0].title, "P1");

    let next_page = store
        .apply_filters(FilterOverrides {
            page: Some(2),
            ..FilterOverrides::default()
        })
        .await;
    assert_eq!(next_page, LoadState::Loaded);
    assert_eq!(store.filters().page, 2);
    assert_eq!(store.articles()[0].title, "P2");
}

#[tokio::test]
async fn comment_edit_and_removal_reload_the_thread() {
    let server = MockServer::start().await;
    mount_list(&server, list_body(vec![article_json(4, "Hujan", 0, 0)])).await;
    Mock::given(method("GET"))
        .and(path("/api/articles/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": article_json(4, "Hujan", 0, 0)
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/articles/comments/9"))
        .and(body_json(json!({ "content": "diperbaiki" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/comments/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/4/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "id": 9, "content": "diperbaiki", "parent_id": 0 }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_with(&server, logged_in_storage(Role::User));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    store.fetch_articles(FilterOverrides::default()).await;
    store.fetch_article(4).await;

    assert_eq!(store.edit_comment(4, 9, "diperbaiki").await, ActionOutcome::Done);
    assert_eq!(store.comments()[0].content, "diperbaiki");
    assert_eq!(store.articles()[0].comment_count, 0);

    assert_eq!(store.remove_comment(4, 9).await, ActionOutcome::Done);
    assert_eq!(store.comments_state(), &LoadState::Loaded);
    assert_eq!(store.articles()[0].comment_count, 0);
    assert_eq!(store.current_article().map(|a| a.comment_count), Some(0));
}

#[tokio::test]
async fn removing_a_comment_decrements_the_count() {
    let server = MockServer::start().await;
    mount_list(&server, list_body(vec![article_json(4, "Hujan", 0, 3)])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/comments/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/4/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, logged_in_storage(Role::User));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    store.fetch_articles(FilterOverrides::default()).await;

    assert_eq!(store.remove_comment(4, 9).await, ActionOutcome::Done);
    assert_eq!(store.comments_state(), &LoadState::Empty);
    assert_eq!(store.articles()[0].comment_count, 2);
}

#[tokio::test]
async fn updating_an_article_refetches_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/articles/3"))
        .and(body_json(json!({ "title": "Judul Baru" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_body(vec![article_json(3, "Judul Baru", 0, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, logged_in_storage(Role::User));
    let mut store = ArticleStore::new(client, FallbackPolicy::Placeholder);
    let update = ArticleUpdate {
        title: Some("Judul Baru".to_string()),
        ..ArticleUpdate::default()
    };

    assert!(store.update_article(3, &update).await);
    assert_eq!(store.articles()[0].title, "Judul Baru");
}
