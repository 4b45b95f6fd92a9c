//! End-to-end checks of the HTTP surface.

use std::path::Path;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::Router;
use glint_server::{router, AppState, Broadcaster};
use glint_tracer::RenderOptions;
use tokio::net::TcpListener;

async fn spawn_app(palette_url: String) -> String {
    let options = RenderOptions {
        width: 8,
        height: 8,
        samples_per_pixel: 2,
        max_bounces: 4,
        ..RenderOptions::default()
    };
    let state = AppState {
        hub: Arc::new(Broadcaster::new(options)),
        client: reqwest::Client::new(),
        palette_url,
    };
    let app = router(state, Path::new("assets"));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stream_responds_with_octet_records() {
    let base = spawn_app("http://127.0.0.1:1/api/".into()).await;

    let response = reqwest::get(format!("{base}/stream")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );

    let mut response = response;
    let chunk = response.chunk().await.unwrap().expect("stream must emit");
    assert!(!chunk.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_change_accepts_any_form_input() {
    let base = spawn_app("http://127.0.0.1:1/api/".into()).await;
    let client = reqwest::Client::new();

    for form in [
        vec![("angle", "45"), ("zoom", "10")],
        vec![("angle", "sideways")],
        vec![],
    ] {
        let response = client
            .post(format!("{base}/change"))
            .form(&form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "form {form:?}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_randomize_maps_provider_failure_to_500() {
    // No provider is listening on this port
    let base = spawn_app("http://127.0.0.1:1/api/".into()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/randomize"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_randomize_succeeds_with_working_provider() {
    let provider = Router::new().route(
        "/api/",
        post(|| async {
            (
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"result": [[12, 34, 56], [200, 100, 50]]}"#,
            )
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let provider_url = format!("http://{}/api/", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, provider).await.unwrap();
    });

    let base = spawn_app(provider_url).await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/randomize"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
