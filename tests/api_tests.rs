use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use dealership_inventory::{
    config::EnvironmentConfig,
    create_app,
    repositories::InMemoryVehicleRepository,
    services::{CleanupQueue, FileStorage, LocalFileStorage, TranslationService},
    utils::jwt::generate_token,
    AppState,
};

const BOUNDARY: &str = "----dealership-test-boundary";

struct TestApp {
    router: Router,
    dir: TempDir,
    token: String,
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn file_path(&self, reference: &str) -> std::path::PathBuf {
        self.dir.path().join(reference.trim_start_matches('/'))
    }
}

// Sin proveedores: las traducciones devuelven el texto original
fn create_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = EnvironmentConfig::for_tests(dir.path().to_path_buf());
    let token = generate_token("admin-1", Some("admin@example.com"), &config.jwt_secret, 3600).unwrap();

    let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(dir.path().to_path_buf()));
    let (cleanup, _worker) = CleanupQueue::start(storage.clone());
    let translator = TranslationService::new(
        Vec::new(),
        config.supported_locales.clone(),
        Duration::from_secs(1),
    );
    let state = AppState::new(
        config,
        Arc::new(InMemoryVehicleRepository::new()),
        storage,
        translator,
        cleanup,
        None,
    );

    TestApp {
        router: create_app(state),
        dir,
        token,
    }
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    for (file_name, contents) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image_files\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn vehicle_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("brand", "Porsche"),
        ("model", "911 Carrera"),
        ("year", "2019"),
        ("price", "98500"),
        ("mileage", "42000"),
        ("fuel", "Petrol"),
        ("transmission", "Automatic"),
        ("body_type", "Coupe"),
        ("color", "Silver"),
        ("power_hp", "385"),
        ("description", "Pristine condition"),
        ("featured", "on"),
    ]
}

fn admin_request(app: &TestApp, method: &str, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create_vehicle(app: &TestApp, files: &[(&str, &str)]) -> Value {
    let body = multipart_body(&vehicle_fields(), files);
    let (status, body) = app.send(admin_request(app, "POST", "/api/admin/vehicles", body)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = app.send(get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = create_test_app();

    let (status, body) = app.send(get("/api/admin/vehicles")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/vehicles")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(&vehicle_fields(), &[("front.jpg", "jpeg")])))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(!app.dir.path().join("uploads").exists());
    let (_, body) = app.send(get("/api/vehicles")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_vehicle_via_multipart() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, &[("front.jpg", "front-bytes"), ("empty.jpg", "")]).await;

    assert_eq!(vehicle["brand"], "Porsche");
    assert_eq!(vehicle["featured"], true);
    assert_eq!(vehicle["power_hp"], 385);

    let images = vehicle["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    let reference = images[0].as_str().unwrap();
    assert!(reference.starts_with("/uploads/"));
    assert!(reference.ends_with(".jpg"));
    assert_eq!(std::fs::read(app.file_path(reference)).unwrap(), b"front-bytes");

    for locale in ["en", "fr", "de", "es"] {
        assert_eq!(vehicle["translations"][locale]["description"], "Pristine condition");
    }
}

#[tokio::test]
async fn test_public_detail_with_locale_and_static_image() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, &[("front.jpg", "front-bytes")]).await;
    let id = vehicle["id"].as_str().unwrap();

    let (status, body) = app.send(get(&format!("/api/vehicles/{}?locale=fr", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["localized_description"], "Pristine condition");

    let reference = vehicle["images"][0].as_str().unwrap();
    let response = app.router.clone().oneshot(get(reference)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"front-bytes");
}

#[tokio::test]
async fn test_public_list_filters() {
    let app = create_test_app();
    create_vehicle(&app, &[]).await;

    let (_, body) = app.send(get("/api/vehicles?brand=porsche&maxPrice=100000")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = app.send(get("/api/vehicles?brand=ferrari")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (_, body) = app.send(get("/api/vehicles/featured")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_with_invalid_year_is_rejected() {
    let app = create_test_app();
    let fields: Vec<(&str, &str)> = vehicle_fields()
        .into_iter()
        .map(|(name, value)| if name == "year" { (name, "nineteen") } else { (name, value) })
        .collect();

    let request = admin_request(
        &app,
        "POST",
        "/api/admin/vehicles",
        multipart_body(&fields, &[("front.jpg", "jpeg")]),
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(!app.dir.path().join("uploads").exists());
}

#[tokio::test]
async fn test_create_with_oversized_price_is_rejected() {
    let app = create_test_app();
    let fields: Vec<(&str, &str)> = vehicle_fields()
        .into_iter()
        .map(|(name, value)| if name == "price" { (name, "10000000000") } else { (name, value) })
        .collect();

    let request = admin_request(
        &app,
        "POST",
        "/api/admin/vehicles",
        multipart_body(&fields, &[("front.jpg", "jpeg")]),
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(!app.dir.path().join("uploads").exists());
}

#[tokio::test]
async fn test_update_and_delete_vehicle() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, &[("a.jpg", "a"), ("b.jpg", "b")]).await;
    let id = vehicle["id"].as_str().unwrap().to_string();
    let kept = vehicle["images"][0].as_str().unwrap().to_string();
    let dropped = vehicle["images"][1].as_str().unwrap().to_string();

    let mut fields: Vec<(&str, &str)> = vehicle_fields();
    fields.push(("existing_images", kept.as_str()));
    let request = admin_request(
        &app,
        "PUT",
        &format!("/api/admin/vehicles/{}", id),
        multipart_body(&fields, &[("c.jpg", "c")]),
    );
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);

    let images = body["data"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0], kept.as_str());

    // El borrado es asíncrono
    for _ in 0..50 {
        if !app.file_path(&dropped).exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(!app.file_path(&dropped).exists());
    assert!(app.file_path(&kept).exists());

    let (status, _) = app
        .send(admin_request(&app, "DELETE", &format!("/api/admin/vehicles/{}", id), Vec::new()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(get(&format!("/api/vehicles/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_without_smtp_is_unavailable() {
    let app = create_test_app();
    let inquiry = json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "message": "Is the 911 still available?"
    });

    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(inquiry.to_string()))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let invalid = json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "not-an-email",
        "message": "Is the 911 still available?"
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(invalid.to_string()))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
