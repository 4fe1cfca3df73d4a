use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use sqlx::postgres::PgPoolOptions;
use tapiceria_api::{
    config::AppConfig,
    enums::Role,
    routes::{build_app, health::health_check},
    services::auth_service::issue_token,
    state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://postgres@localhost/unused".into(),
        database_max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "router-test-secret".into(),
        jwt_expiration_hours: 1,
    }
}

// Nothing here reaches the database; the lazy pool never connects.
fn app() -> axum::Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    build_app(AppState::new(pool, config))
}

fn bearer(role: Role) -> String {
    let (token, _) = issue_token(&test_config(), Uuid::new_v4(), "tester", role).unwrap();
    format!("Bearer {token}")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");
    assert!(response.0.data.is_some());
}

#[tokio::test]
async fn health_route_reports_status_and_time() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["data"]["timestamp"].is_string());
}

#[tokio::test]
async fn protected_routes_need_a_bearer_token() {
    let response = app()
        .oneshot(Request::get("/api/clientes").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app()
        .oneshot(
            Request::get("/api/materiales")
                .header(header::AUTHORIZATION, "Basic YWRtaW46YWRtaW4=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app()
        .oneshot(
            Request::get("/api/trabajos")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["error"], "Unauthorized: Invalid or expired token");
}

#[tokio::test]
async fn wrong_role_is_forbidden() {
    let response = app()
        .oneshot(
            Request::get("/api/reports/dashboard")
                .header(header::AUTHORIZATION, bearer(Role::Empleado))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app()
        .oneshot(
            Request::get("/api/trabajos")
                .header(header::AUTHORIZATION, bearer(Role::Cliente))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app()
        .oneshot(
            Request::delete(format!("/api/empleados/{}", Uuid::new_v4()))
                .header(header::AUTHORIZATION, bearer(Role::Gerente))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let response = app()
        .oneshot(
            Request::post("/api/auth/cliente/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"username\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    let response = app()
        .oneshot(Request::get("/api/sillas").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["data"]["path"], "/api/sillas");
}
