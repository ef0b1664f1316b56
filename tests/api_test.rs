//! End-to-end tests of the HTTP surface against a mocked database.
//!
//! Run with: `cargo test --test api_test`
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use uuid::Uuid;

use showcase_admin::auth::TokenVerifier;
use showcase_admin::auth::jwt::Claims;
use showcase_admin::config::{AppConfig, AuthConfig};
use showcase_admin::handlers;
use showcase_admin::models::Status;
use showcase_admin::models::client;
use showcase_admin::models::portfolio::{self, ComponentFilter, ComponentIds};
use showcase_admin::storage::LocalStorage;

const SECRET: &str = "api-test-secret-at-least-256-bits-long-xxxxxxxxxxxx";

fn config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".to_string(),
        port: 8080,
        app_env: "test".to_string(),
        public_base_url: "http://localhost:8080".to_string(),
        upload_dir: std::env::temp_dir().join("showcase-api-test"),
        upload_max_bytes: 1024 * 1024,
        auth: AuthConfig::Secret(SECRET.to_string()),
    }
}

macro_rules! test_app {
    ($db:expr) => {{
        let config = config();
        test::init_service(
            App::new()
                .app_data(web::Data::new($db))
                .app_data(web::Data::new(TokenVerifier::from_config(&config.auth)))
                .app_data(web::Data::new(LocalStorage::new(
                    &config.upload_dir,
                    &config.public_base_url,
                )))
                .app_data(web::Data::new(config))
                .configure(handlers::configure),
        )
        .await
    }};
}

fn token(exp_offset: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "admin".to_string(),
        exp: (now + exp_offset) as usize,
        iat: Some(now as usize),
        iss: None,
        email: Some("admin@example.com".to_string()),
        role: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn bearer() -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token(3600)))
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn stored_portfolio(status: Status) -> portfolio::Model {
    portfolio::Model {
        id: Uuid::new_v4(),
        title: "Selected work".to_string(),
        description: None,
        code: "Zx81Qw09Lm".to_string(),
        component_ids: ComponentIds::default(),
        filters: ComponentFilter::default(),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[actix_web::test]
async fn status_is_public() {
    let app = test_app!(empty_db());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/status").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["payload"]["status"], "ok");
}

#[actix_web::test]
async fn admin_routes_require_bearer_credentials() {
    let app = test_app!(empty_db());

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/client").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Missing Authorization Credentials");
    assert_eq!(body["error"]["status"], 403);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/client")
            .insert_header((header::AUTHORIZATION, "Basic YWRtaW46c2VjcmV0"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn expired_token_is_unauthorized() {
    let app = test_app!(empty_db());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/portfolio")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token(-600))))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"]["message"],
        "Token has expired, please re-authenticate"
    );
}

#[actix_web::test]
async fn lists_clients_inside_payload() {
    let acme = client::Model {
        id: Uuid::new_v4(),
        name: "Acme".to_string(),
        address: Some("1 Main St".to_string()),
        status: Status::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![acme.clone()]])
        .into_connection();
    let app = test_app!(db);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/client")
            .insert_header(bearer())
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["payload"][0]["name"], "Acme");
    assert_eq!(body["payload"][0]["status"], "active");
}

fn stored_client(status: Status) -> client::Model {
    client::Model {
        id: Uuid::new_v4(),
        name: "Acme".to_string(),
        address: None,
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn logged_sql(db: DatabaseConnection) -> Vec<String> {
    db.into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.to_string()))
        .collect()
}

#[actix_web::test]
async fn archiving_a_client_flips_its_status() {
    let acme = stored_client(Status::Active);
    let archived = client::Model {
        status: Status::Archived,
        ..acme.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![acme.clone()], vec![archived]])
        .into_connection();
    let app = test_app!(db.clone());

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/client/{}", acme.id))
            .insert_header(bearer())
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["payload"]["id"], acme.id.to_string());
    assert_eq!(body["payload"]["message"], "Successfully Archived");

    let sql = logged_sql(db);
    assert_eq!(sql.len(), 2);
    assert!(sql[0].starts_with("SELECT"), "{}", sql[0]);
    assert!(sql[1].starts_with(r#"UPDATE "clients""#), "{}", sql[1]);
    assert!(sql[1].contains(r#""status" = 'archived'"#), "{}", sql[1]);
}

#[actix_web::test]
async fn archiving_an_archived_client_writes_nothing() {
    let acme = stored_client(Status::Archived);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![acme.clone()]])
        .into_connection();
    let app = test_app!(db.clone());

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/client/{}", acme.id))
            .insert_header(bearer())
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let sql = logged_sql(db);
    assert_eq!(sql.len(), 1);
    assert!(!sql.iter().any(|stmt| stmt.starts_with("UPDATE")));
}

#[actix_web::test]
async fn listings_hide_archived_rows_unless_asked() {
    let acme = stored_client(Status::Archived);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<client::Model>::new(), vec![acme.clone()], vec![acme.clone()]])
        .into_connection();
    let app = test_app!(db.clone());

    for (uri, expected) in [
        ("/api/v1/admin/client".to_string(), 0),
        ("/api/v1/admin/client?include_archived=true".to_string(), 1),
    ] {
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header(bearer())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["payload"].as_array().map(Vec::len), Some(expected), "{uri}");
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/admin/client/{}?include_archived=true", acme.id))
            .insert_header(bearer())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["payload"]["status"], "archived");

    let sql = logged_sql(db);
    assert!(sql[0].contains(r#""status" = 'active'"#), "{}", sql[0]);
    assert!(!sql[1].contains("'active'"), "{}", sql[1]);
    assert!(!sql[2].contains("'active'"), "{}", sql[2]);
}

#[actix_web::test]
async fn unknown_portfolio_code_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<portfolio::Model>::new()])
        .into_connection();
    let app = test_app!(db);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/public/portfolio/doesnotexist")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["application_code"], "not-found");
}

#[actix_web::test]
async fn archived_portfolio_code_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored_portfolio(Status::Archived)]])
        .into_connection();
    let app = test_app!(db);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/public/portfolio/Zx81Qw09Lm")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn gif_cover_is_rejected_before_touching_the_store() {
    let db = empty_db();
    let app = test_app!(db.clone());

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"cover\"; filename=\"anim.gif\"\r\nContent-Type: image/gif\r\n\r\nGIF89a\r\n--{boundary}--\r\n"
    );
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/admin/project/{}/cover", Uuid::new_v4()))
            .insert_header(bearer())
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(body)
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["application_code"], "invalid-file");
    assert!(db.into_transaction_log().is_empty());
}

#[actix_web::test]
async fn portfolio_without_filters_is_missing_parameters() {
    let db = empty_db();
    let app = test_app!(db.clone());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/portfolio")
            .insert_header(bearer())
            .set_json(json!({ "title": "Everything" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["application_code"], "missing-parameters");
    assert!(db.into_transaction_log().is_empty());
}

#[actix_web::test]
async fn empty_project_update_is_a_bad_request() {
    let app = test_app!(empty_db());

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/admin/project/{}", Uuid::new_v4()))
            .insert_header(bearer())
            .set_json(json!({}))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "No attributes specified for updation");
}

#[actix_web::test]
async fn loose_project_dates_are_invalid() {
    let app = test_app!(empty_db());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/project")
            .insert_header(bearer())
            .set_json(json!({
                "name": "Storefront",
                "client_id": Uuid::new_v4(),
                "start_date": "03/01/2024"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["application_code"], "invalid-date");
}

#[actix_web::test]
async fn missing_body_fields_use_the_error_envelope() {
    let app = test_app!(empty_db());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/client")
            .insert_header(bearer())
            .set_json(json!({ "address": "nowhere" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["application_code"], "missing-parameters");
}

#[actix_web::test]
async fn malformed_ids_and_unknown_paths_are_not_found() {
    let app = test_app!(empty_db());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/client/not-a-uuid")
            .insert_header(bearer())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Unknown path");
}
