//! Smoke tests for the catalog client over real HTTP.

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use anichart::clients::{AnilistClient, ClientError, ClientOptions, HttpTransport, RetryOptions};
use anichart::models::AnimeListParams;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone)]
struct Upstream {
    hits: Arc<AtomicUsize>,
    reply: fn(usize) -> Response,
}

async fn handle(State(upstream): State<Upstream>, Json(_body): Json<Value>) -> Response {
    let n = upstream.hits.fetch_add(1, Ordering::SeqCst);
    (upstream.reply)(n)
}

async fn spawn_client(reply: fn(usize) -> Response) -> (AnilistClient, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route("/", post(handle)).with_state(Upstream {
        hits: hits.clone(),
        reply,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let transport = HttpTransport::new(reqwest::Client::new(), format!("http://{addr}/"));
    let options = ClientOptions {
        retry: RetryOptions {
            max_retries: 3,
            delay: Duration::from_millis(1),
            exponential_backoff: true,
        },
        ..ClientOptions::default()
    };
    (AnilistClient::new(Arc::new(transport), options), hits)
}

fn one_page(_: usize) -> Response {
    Json(json!({
        "data": {
            "Page": {
                "pageInfo": { "total": 1, "hasNextPage": false },
                "media": [{ "id": 1, "title": { "romaji": "Mushishi" }, "genres": [], "isAdult": false }]
            }
        }
    }))
    .into_response()
}

#[tokio::test]
async fn test_second_identical_query_is_cached() {
    let (client, hits) = spawn_client(one_page).await;
    let params = AnimeListParams::builder().page(1).per_page(10).build();

    let first = client.get_anime_list(&params).await.unwrap();
    let second = client.get_anime_list(&params).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.media[0].title.romaji.as_deref(), Some("Mushishi"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(client.cache_size(), 1);

    client.clear_cache();
    client.get_anime_list(&params).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let (client, hits) = spawn_client(|_| {
        (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "30")],
            Json(json!({ "errors": [{ "message": "Too Many Requests.", "status": 429 }] })),
        )
            .into_response()
    })
    .await;

    let err = client.get_trending_anime(1, 10).await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::RateLimited {
            retry_after: Some(30)
        }
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_plain_text_rate_limit_is_not_retried() {
    let (client, hits) = spawn_client(|_| {
        (StatusCode::SERVICE_UNAVAILABLE, "Too Many Requests").into_response()
    })
    .await;

    let err = client.get_trending_anime(1, 10).await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::RateLimited {
            retry_after: Some(60)
        }
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let (client, hits) = spawn_client(|n| {
        if n < 2 {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "boom" }))).into_response()
        } else {
            one_page(n)
        }
    })
    .await;

    let page = client.get_trending_anime(1, 10).await.unwrap();

    assert_eq!(page.media.len(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_graphql_errors_become_graphql_error() {
    let (client, hits) = spawn_client(|_| {
        Json(json!({ "data": null, "errors": [{ "message": "Invalid query" }] })).into_response()
    })
    .await;

    let err = client.get_anime_details(1).await.unwrap_err();

    // Retries ran out; the wrapped failure is the payload error.
    let ClientError::Network { source, .. } = err else {
        panic!("expected a network error, got {err:?}");
    };
    let inner = source.unwrap().downcast::<ClientError>().unwrap();
    assert!(matches!(*inner, ClientError::GraphQl(ref msg) if msg.contains("Invalid query")));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}
