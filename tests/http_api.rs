use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use superhero_registry::{
    AppState, ImageStore, JsonFileStore, RecordStore, SuperheroService, build_router,
};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "X-SUPERHERO-BOUNDARY";

struct TestApp {
    router: Router,
    store: Arc<JsonFileStore>,
    dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let store = Arc::new(JsonFileStore::new(dir.path().join("data/superheroes.json")));
        let service = SuperheroService::new(store.clone(), ImageStore::new(dir.path().join("uploads")));
        let router = build_router(AppState::new(service));
        Self { router, store, dir }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response expected");
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("response body should be readable")
            .to_bytes();

        if body.is_empty() {
            return (status, Value::Null);
        }
        let json = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn send_json(&self, method: Method, uri: &str, payload: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request should build");
        self.send(request).await
    }

    async fn send_empty(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        self.send(request).await
    }

    async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("request should build");
        self.send(request).await
    }

    async fn upload(&self, id: &str, files: &[(&str, &str, &[u8])]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/superheroes/{id}/images"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(files)))
            .expect("request should build");
        self.send(request).await
    }

    async fn create(&self, nickname: &str, real_name: &str) -> Value {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/api/superheroes",
                json!({ "nickname": nickname, "real_name": real_name }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }
}

fn multipart_body(files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, content_type, bytes) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"images\"; filename=\"{name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn list_on_empty_store() {
    let app = TestApp::new();

    let (status, body) = app.send_empty(Method::GET, "/api/superheroes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(
        body["pagination"],
        json!({ "currentPage": 1, "totalPages": 0, "totalItems": 0, "itemsPerPage": 5 })
    );
}

#[tokio::test]
async fn create_returns_defaults() {
    let app = TestApp::new();

    let (status, body) = app
        .send_json(
            Method::POST,
            "/api/superheroes",
            json!({ "nickname": "Test Hero", "real_name": "Test Name" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["id"].as_str().unwrap_or_default().is_empty());
    assert_eq!(body["nickname"], "Test Hero");
    assert_eq!(body["real_name"], "Test Name");
    assert_eq!(body["images"], json!([]));
    assert_eq!(body["origin_description"], "");
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn create_rejects_empty_required_fields() {
    let app = TestApp::new();

    for payload in [
        json!({ "nickname": "", "real_name": "" }),
        json!({ "nickname": "Only Nick" }),
        json!({}),
    ] {
        let (status, body) = app
            .send_json(Method::POST, "/api/superheroes", payload)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    assert!(app.store.load().await.is_empty());
}

#[tokio::test]
async fn pagination_follows_query() {
    let app = TestApp::new();
    for i in 0..7 {
        app.create(&format!("hero-{i}"), "someone").await;
    }

    let (status, body) = app
        .send_empty(Method::GET, "/api/superheroes?page=2&limit=3")
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("data should be array")
        .iter()
        .map(|hero| hero["nickname"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["hero-3", "hero-4", "hero-5"]);
    assert_eq!(body["pagination"]["currentPage"], 2);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["totalItems"], 7);
    assert_eq!(body["pagination"]["itemsPerPage"], 3);

    let (_, body) = app
        .send_empty(Method::GET, "/api/superheroes?page=abc&limit=0")
        .await;
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["itemsPerPage"], 5);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(5));

    let (_, body) = app
        .send_empty(Method::GET, "/api/superheroes?page=10")
        .await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn update_merges_and_keeps_identity() {
    let app = TestApp::new();
    let created = app.create("Old Nick", "Real").await;
    let id = created["id"].as_str().expect("id");
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;

    let (status, body) = app
        .send_json(
            Method::PUT,
            &format!("/api/superheroes/{id}"),
            json!({
                "id": "hijacked",
                "created_at": "2001-01-01T00:00:00Z",
                "nickname": "New Nick",
                "superpowers": "flight"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["created_at"], created["created_at"]);
    assert_eq!(body["nickname"], "New Nick");
    assert_eq!(body["real_name"], "Real");
    assert_eq!(body["superpowers"], "flight");

    let stored = app.store.load().await;
    assert_eq!(stored.superheroes[0].nickname, "New Nick");
    assert!(stored.superheroes[0].updated_at > stored.superheroes[0].created_at);
}

#[tokio::test]
async fn update_unknown_is_not_found() {
    let app = TestApp::new();
    app.create("Someone", "Real").await;
    let before = app.store.load().await;

    let (status, body) = app
        .send_json(
            Method::PUT,
            "/api/superheroes/non-existent-id",
            json!({ "nickname": "x" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Superhero not found");
    assert_eq!(app.store.load().await, before);
}

#[tokio::test]
async fn delete_removes_and_reports() {
    let app = TestApp::new();
    let created = app.create("Doomed", "Real").await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = app
        .send_empty(Method::DELETE, &format!("/api/superheroes/{id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Superhero deleted successfully");
    assert_eq!(body["deletedRecord"], created);

    let (_, list) = app.send_empty(Method::GET, "/api/superheroes").await;
    assert_eq!(list["data"], json!([]));

    let (status, _) = app
        .send_empty(Method::DELETE, "/api/superheroes/non-existent-id")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_then_delete_image() {
    let app = TestApp::new();
    let created = app.create("Shutterbug", "Real").await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = app
        .upload(
            id,
            &[
                ("front.png", "image/png", &b"png-bytes"[..]),
                ("side.jpg", "image/jpeg", &b"jpg-bytes"[..]),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let uploaded: Vec<String> = serde_json::from_value(body["uploadedImages"].clone())
        .expect("uploadedImages should be strings");
    assert_eq!(uploaded.len(), 2);
    assert!(uploaded[0].ends_with(".png"));
    assert!(uploaded[1].ends_with(".jpg"));
    assert_eq!(body["record"]["images"], json!(uploaded));

    let (status, _) = app
        .send_empty(Method::GET, &format!("/uploads/{}", uploaded[0]))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send_empty(
            Method::DELETE,
            &format!("/api/superheroes/{id}/images/{}", uploaded[0]),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedImage"], uploaded[0]);
    assert_eq!(body["record"]["images"], json!([uploaded[1]]));
    assert!(!app.dir.path().join("uploads").join(&uploaded[0]).exists());

    let (status, _) = app
        .send_empty(
            Method::DELETE,
            &format!("/api/superheroes/{id}/images/{}", uploaded[0]),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_appends_to_existing_images() {
    let app = TestApp::new();
    let created = app.create("Collector", "Real").await;
    let id = created["id"].as_str().expect("id");

    let (_, first) = app.upload(id, &[("a.png", "image/png", &b"a"[..])]).await;
    let (status, second) = app.upload(id, &[("b.png", "image/png", &b"b"[..])]).await;

    assert_eq!(status, StatusCode::OK);
    let images = second["record"]["images"].as_array().expect("images");
    assert_eq!(images.len(), 2);
    assert_eq!(images[0], first["uploadedImages"][0]);
}

#[tokio::test]
async fn upload_errors() {
    let app = TestApp::new();
    let created = app.create("Camera Shy", "Real").await;
    let id = created["id"].as_str().expect("id");

    let (status, _) = app.upload(id, &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .upload("non-existent-id", &[("a.png", "image/png", &b"a"[..])])
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let six: Vec<(&str, &str, &[u8])> = (0..6).map(|_| ("x.png", "image/png", &b"x"[..])).collect();
    let (status, _) = app.upload(id, &six).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.upload(id, &[("notes.txt", "text/plain", &b"hi"[..])]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uploads = app.dir.path().join("uploads");
    let leftovers = std::fs::read_dir(&uploads).map(|dir| dir.count()).unwrap_or(0);
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn unreadable_json_bodies_are_bad_requests() {
    let app = TestApp::new();
    let created = app.create("Target", "Real").await;
    let id = created["id"].as_str().expect("id");
    let json_type = Some("application/json");

    let cases = [
        (Method::POST, "/api/superheroes".to_string(), json_type, r#"{"nickname":5,"real_name":"r"}"#),
        (Method::POST, "/api/superheroes".to_string(), json_type, "{oops"),
        (Method::POST, "/api/superheroes".to_string(), None, r#"{"nickname":"n","real_name":"r"}"#),
        (Method::PUT, format!("/api/superheroes/{id}"), json_type, r#"{"images":"not-a-list"}"#),
        (Method::PUT, format!("/api/superheroes/{id}"), None, r#"{"nickname":"n"}"#),
    ];

    for (method, uri, content_type, payload) in cases {
        let (status, body) = app.send_raw(method, &uri, content_type, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {payload}");
        assert!(body["error"].is_string(), "{uri} {payload}");
        assert_eq!(body["code"], "validation_error");
    }

    let stored = app.store.load().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.superheroes[0].nickname, "Target");
}

#[tokio::test]
async fn non_multipart_upload_is_a_bad_request() {
    let app = TestApp::new();
    let created = app.create("Target", "Real").await;
    let id = created["id"].as_str().expect("id");
    let uri = format!("/api/superheroes/{id}/images");

    for content_type in [None, Some("application/json"), Some("multipart/form-data")] {
        let (status, body) = app.send_raw(Method::POST, &uri, content_type, "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|message| message.starts_with("Invalid multipart body"))
        );
    }
}

#[tokio::test]
async fn health_endpoint_answers() {
    let app = TestApp::new();
    let (status, body) = app.send_empty(Method::GET, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "ok");
}

#[tokio::test]
async fn data_survives_a_new_router() {
    let app = TestApp::new();
    app.create("Persistent", "Real").await;

    let store = Arc::new(JsonFileStore::new(app.store.path()));
    let service = SuperheroService::new(store, ImageStore::new(app.dir.path().join("uploads")));
    let router = build_router(AppState::new(service));
    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/superheroes")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("response expected");
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["data"][0]["nickname"], "Persistent");
}
