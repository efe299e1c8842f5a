use actix_web::http::StatusCode;
use actix_web::{App, test, web::Data};
use chrono::{Duration, Local};
use enterprise_dashboard::{config::Config, db, routes};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;

const ADMIN: &str = "admin";
const ADMIN_PASSWORD: &str = "admin-pass";

fn test_config() -> Config {
    Config {
        jwt_secret: "integration-secret".into(),
        ..Config::default()
    }
}

async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();
    db::seed_admin(&pool, ADMIN, ADMIN_PASSWORD).await.unwrap();
    pool
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

macro_rules! app {
    ($pool:expr, $config:expr) => {{
        let config = $config.clone();
        test::init_service(
            App::new()
                .app_data(Data::new($pool.clone()))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| routes::configure(cfg, &config)),
        )
        .await
    }};
}

macro_rules! login {
    ($app:expr, $user:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer())
            .set_json(json!({"username": $user, "password": $password}))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        (
            body["access_token"].as_str().unwrap().to_string(),
            body["refresh_token"].as_str().unwrap().to_string(),
        )
    }};
}

fn get(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
}

fn post(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
}

fn put(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::put()
        .uri(uri)
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
}

#[actix_web::test]
async fn protected_routes_need_an_access_token() {
    let pool = test_pool().await;
    let app = app!(pool, test_config());

    let req = test::TestRequest::get()
        .uri("/api/employees")
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (_, refresh) = login!(app, ADMIN, ADMIN_PASSWORD);
    let resp = test::call_service(&app, get("/api/employees", &refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(json!({"username": ADMIN, "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn refresh_token_rotates_once() {
    let pool = test_pool().await;
    let app = app!(pool, test_config());
    let (_, refresh) = login!(app, ADMIN, ADMIN_PASSWORD);

    let resp = test::call_service(&app, post("/auth/refresh", &refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let pair: Value = test::read_body_json(resp).await;
    assert!(pair["access_token"].is_string());

    let resp = test::call_service(&app, post("/auth/refresh", &refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn employee_lifecycle_over_http() {
    let pool = test_pool().await;
    let app = app!(pool, test_config());
    let (token, _) = login!(app, ADMIN, ADMIN_PASSWORD);

    let employee = json!({
        "emp_code": "EMP-001",
        "name": "John Doe",
        "department": "Engineering",
        "email": "john@example.com"
    });
    let resp = test::call_service(
        &app,
        post("/api/employees", &token).set_json(&employee).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        post("/api/employees", &token).set_json(&employee).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(&app, get("/api/employees/EMP-001", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "John Doe");

    let resp = test::call_service(&app, get("/api/employees/NOPE", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, put("/api/leaves/999/approve", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        get("/api/reports/headcount", &token).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([{"department": "Engineering", "count": 1}]));
}

#[actix_web::test]
async fn viewer_may_read_but_not_write() {
    let pool = test_pool().await;
    let app = app!(pool, test_config());
    let (admin_token, _) = login!(app, ADMIN, ADMIN_PASSWORD);

    let resp = test::call_service(
        &app,
        post("/api/users", &admin_token)
            .set_json(json!({"username": "viewer", "password": "viewer-pass", "role": "Viewer"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let (token, _) = login!(app, "viewer", "viewer-pass");
    let resp = test::call_service(&app, get("/api/transactions", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        post("/api/transactions", &token)
            .set_json(json!({"tx_type": "Income", "amount": 10.0}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        post("/api/users", &token)
            .set_json(json!({"username": "x", "password": "y", "role": "Admin"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn csv_import_then_export() {
    let pool = test_pool().await;
    let app = app!(pool, test_config());
    let (token, _) = login!(app, ADMIN, ADMIN_PASSWORD);

    let csv = "emp_code,name,department,email\n\
               EMP-001,Ann,Sales,ann@example.com\n\
               EMP-002,,Sales,\n\
               EMP-003,Bob,,not-an-email\n\
               EMP-004,Cid,Ops,\n";
    let resp = test::call_service(
        &app,
        post("/api/data/import/employees", &token)
            .insert_header(("Content-Type", "text/csv"))
            .set_payload(csv)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = test::read_body_json(resp).await;
    assert_eq!(report, json!({"total": 4, "inserted": 2, "skipped": 2}));

    // same file again: every code already exists
    let resp = test::call_service(
        &app,
        post("/api/data/import/employees", &token)
            .set_payload(csv)
            .to_request(),
    )
    .await;
    let report: Value = test::read_body_json(resp).await;
    assert_eq!(report["inserted"], 0);

    let resp = test::call_service(&app, get("/api/data/export/employees", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("Content-Type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/csv"));
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("id,emp_code,name"));
    assert!(text.contains("EMP-004"));
    assert_eq!(text.lines().count(), 3);

    let resp = test::call_service(&app, post("/api/data/import/payroll", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, get("/api/data/export/users", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn finance_summary_and_snapshot() {
    let pool = test_pool().await;
    let app = app!(pool, test_config());
    let (token, _) = login!(app, ADMIN, ADMIN_PASSWORD);

    let today = Local::now().date_naive();
    let yesterday = today - Duration::days(1);
    for (date, tx_type, amount) in [
        (yesterday, "Income", 100.0),
        (yesterday, "Expense", 40.0),
        (today, "Income", 50.0),
    ] {
        let resp = test::call_service(
            &app,
            post("/api/transactions", &token)
                .set_json(json!({"tx_date": date, "tx_type": tx_type, "amount": amount}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = test::call_service(
        &app,
        post("/api/transactions", &token)
            .set_json(json!({"tx_type": "Income", "amount": 0.0}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        get("/api/reports/finance?window_days=7&bucket=day", &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary["income"], 150.0);
    assert_eq!(summary["expense"], 40.0);
    assert_eq!(summary["net_balance"], 110.0);
    let series = summary["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["total"], 140.0);
    assert_eq!(series[1]["total"], 50.0);

    let resp = test::call_service(&app, get("/api/reports/overview", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        get("/api/reports/snapshot.pdf", &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/pdf"
    );
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF-"));
}

fn employee_csv(rows: usize) -> String {
    let mut csv = String::from("emp_code,name,department,role,email,phone,notes\n");
    for i in 0..rows {
        csv.push_str(&format!(
            "EMP-{i:05},Employee Number {i},Operations,Warehouse Associate,emp{i}@example.com,+1 555 010 {:04},imported in bulk\n",
            i % 10_000
        ));
    }
    csv
}

#[actix_web::test]
async fn large_csv_upload_is_imported() {
    let pool = test_pool().await;
    let app = app!(pool, test_config());
    let (token, _) = login!(app, ADMIN, ADMIN_PASSWORD);

    let csv = employee_csv(5000);
    assert!(csv.len() > 256 * 1024);

    let resp = test::call_service(
        &app,
        post("/api/data/import/employees", &token)
            .insert_header(("Content-Type", "text/csv"))
            .set_payload(csv)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = test::read_body_json(resp).await;
    assert_eq!(report, json!({"total": 5000, "inserted": 5000, "skipped": 0}));
}

#[actix_web::test]
async fn upload_over_configured_limit_is_refused() {
    let pool = test_pool().await;
    let config = Config {
        import_max_bytes: 1024,
        ..test_config()
    };
    let app = app!(pool, config);
    let (token, _) = login!(app, ADMIN, ADMIN_PASSWORD);

    let resp = test::call_service(
        &app,
        post("/api/data/import/employees", &token)
            .set_payload(employee_csv(100))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
