/// Router-level tests
///
/// These tests exercise the built router without a live database: the pool
/// is created lazily and never connected, so only paths that fail before
/// reaching Postgres are asserted (authentication rejection, payload
/// validation, routing, health degradation).

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use taskhub_api::app::{build_router, AppState};
use taskhub_api::config::{ApiConfig, AwsConfig, Config, DatabaseConfig, JwtConfig};
use taskhub_shared::storage::ObjectStore;
use tower::Service as _;

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost:1/unreachable".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "router-test-secret-key-at-least-32-bytes".to_string(),
        },
        aws: AwsConfig {
            s3_bucket: "test-bucket".to_string(),
            email_from: "noreply@example.com".to_string(),
        },
    }
}

fn test_store() -> ObjectStore {
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

    let credentials = Credentials::new("test-access-key", "test-secret-key", None, None, "test");
    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .build();

    ObjectStore::new(aws_sdk_s3::Client::from_conf(config), "test-bucket".to_string())
}

/// Builds the router over a pool that is never connected
fn test_app() -> axum::Router {
    let pool = sqlx::PgPool::connect_lazy("postgresql://localhost:1/unreachable")
        .expect("lazy pool");
    let state = AppState::new(pool, test_config(), test_store());
    build_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_is_200_even_when_database_is_down() {
    let mut app = test_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_protected_routes_reject_missing_token() {
    let mut app = test_app();

    for (method, uri) in [
        ("GET", "/api/users/profile"),
        ("GET", "/api/projects"),
        ("POST", "/api/projects"),
        ("POST", "/api/tasks"),
        ("GET", "/api/files/tasks/00000000-0000-0000-0000-000000000000/attachment"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = app.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_protected_routes_reject_malformed_token() {
    let mut app = test_app();

    let request = Request::builder()
        .uri("/api/projects")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid authentication");
}

#[tokio::test]
async fn test_expired_and_tampered_tokens_get_the_same_answer() {
    use taskhub_shared::auth::jwt::{create_token, Claims};
    use uuid::Uuid;

    let mut app = test_app();
    let secret = test_config().jwt.secret;

    let expired = {
        let claims = Claims::with_expiration(Uuid::new_v4(), chrono::Duration::seconds(-3600));
        create_token(&claims, &secret).unwrap()
    };
    let tampered = {
        let claims = Claims::new(Uuid::new_v4());
        create_token(&claims, "another-secret-key-also-32-bytes-long!!").unwrap()
    };

    for token in [expired, tampered] {
        let request = Request::builder()
            .uri("/api/projects")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid authentication");
    }
}

#[tokio::test]
async fn test_register_validates_payload_before_touching_storage() {
    let mut app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/users/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "email": "not-an-email",
                "password": "short",
                "name": ""
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["details"].as_array().is_some_and(|d| !d.is_empty()));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let mut app = test_app();

    let request = Request::builder()
        .uri("/api/nope")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
