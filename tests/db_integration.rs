//! Database integration tests.
//!
//! These run against a live Postgres instance and are skipped unless
//! `TEST_DATABASE_URL` is set. Each test tags its rows with a random
//! prefix and cleans them up afterwards, so a shared database stays
//! usable.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use festival::api::{create_api_router, AppContext};
use festival::auth::insert_session;
use festival::config::AppConfig;
use festival::database::{
    AccommodationService, EventService, NewEventFields, NewFeeFields, NewSponsorFields,
    RegistrationFilter, RegistrationService, SponsorService,
};

const ADMIN_EMAIL: &str = "admin@example.com";

async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return None;
    };
    let pool = PgPool::connect(&url).await.expect("connect test database");
    ensure_schema(&pool).await;
    Some(pool)
}

async fn ensure_schema(pool: &PgPool) {
    let ddl = [
        "CREATE TABLE IF NOT EXISTS accommodation_type (id BIGSERIAL PRIMARY KEY, package_name TEXT NOT NULL, price NUMERIC, start_date DATE, end_date DATE, description TEXT, is_available BOOLEAN)",
        "CREATE TABLE IF NOT EXISTS sponsors (sponsor_id BIGSERIAL PRIMARY KEY, name TEXT NOT NULL, tier TEXT NOT NULL, website_url TEXT, logo_url TEXT, description TEXT, display_order INT)",
        "CREATE TABLE IF NOT EXISTS event_category (category_id BIGSERIAL PRIMARY KEY, category_name TEXT NOT NULL, description TEXT, category_image TEXT)",
        "CREATE TABLE IF NOT EXISTS event (event_id BIGSERIAL PRIMARY KEY, event_name TEXT NOT NULL, category_id BIGINT, event_date TIMESTAMPTZ, event_picture TEXT, rulebook TEXT, description TEXT, is_registration_open BOOLEAN, is_dau_free BOOLEAN)",
        "CREATE TABLE IF NOT EXISTS fee (fee_id BIGSERIAL PRIMARY KEY, participation_type TEXT NOT NULL, price NUMERIC NOT NULL, min_members INT NOT NULL, max_members INT NOT NULL)",
        "CREATE TABLE IF NOT EXISTS event_fee (event_fee_id BIGSERIAL PRIMARY KEY, event_id BIGINT NOT NULL, fee_id BIGINT NOT NULL)",
        "CREATE TABLE IF NOT EXISTS users (user_id UUID PRIMARY KEY, email TEXT NOT NULL UNIQUE, user_name TEXT, phone TEXT, college TEXT, gender TEXT, dob DATE, password_hash TEXT NOT NULL, password_salt TEXT NOT NULL)",
        "CREATE TABLE IF NOT EXISTS payment_method (method_id BIGSERIAL PRIMARY KEY, method_name TEXT NOT NULL, gateway_charge NUMERIC)",
        "CREATE TABLE IF NOT EXISTS team (team_id BIGSERIAL PRIMARY KEY)",
        "CREATE TABLE IF NOT EXISTS team_members (team_id BIGINT NOT NULL, user_id UUID)",
        "CREATE TABLE IF NOT EXISTS event_registrations (registration_id BIGSERIAL PRIMARY KEY, transaction_id TEXT, user_id UUID, event_fee_id BIGINT, payment_method_id BIGINT, team_id BIGINT, payment_status TEXT, gross_amount NUMERIC)",
        "CREATE TABLE IF NOT EXISTS merchandise_management (product_id BIGSERIAL PRIMARY KEY, product_name TEXT NOT NULL, price NUMERIC, available_sizes TEXT[], product_image TEXT, description TEXT, is_available BOOLEAN)",
        "CREATE TABLE IF NOT EXISTS merchandise_orders (order_id BIGSERIAL PRIMARY KEY, items JSONB, amount NUMERIC, order_date TIMESTAMPTZ, payment_status TEXT, payment_method TEXT)",
        "CREATE TABLE IF NOT EXISTS concert (concert_id BIGSERIAL PRIMARY KEY, concert_name TEXT NOT NULL)",
        "CREATE TABLE IF NOT EXISTS artist (id BIGSERIAL PRIMARY KEY, name TEXT NOT NULL, concert_id BIGINT, genre TEXT, reveal_date DATE, bio TEXT, artist_image_url TEXT)",
    ];
    for statement in ddl {
        sqlx::query(statement).execute(pool).await.expect("schema");
    }
}

fn prefix() -> String {
    format!("it_{}", &Uuid::new_v4().to_string()[..8])
}

fn test_context(pool: PgPool) -> AppContext {
    let config = AppConfig {
        database_url: String::new(),
        admin_email: ADMIN_EMAIL.to_string(),
        port: 0,
        storage_root: std::env::temp_dir().join("festival-db-test-storage"),
        public_base_url: "http://localhost:3000".to_string(),
        ..AppConfig::default()
    };
    AppContext::new(pool, config)
}

fn json_request(method: &str, uri: &str, token: Option<Uuid>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Accommodation: full route round trip
// ============================================================================

#[tokio::test]
async fn accommodation_crud_round_trip() {
    let Some(pool) = test_pool().await else { return };
    let ctx = test_context(pool.clone());
    let app = create_api_router(ctx.clone());
    let token = insert_session(&ctx.sessions, Uuid::new_v4(), ADMIN_EMAIL.into()).await;
    let name = format!("{} Deluxe", prefix());

    // Create
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/accommodation",
            Some(token),
            &format!(r#"{{"package_name":"{name}","price":100}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    let id = body["package"]["id"].as_i64().unwrap();
    assert_eq!(body["package"]["package_name"], serde_json::json!(name));

    // Read back
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/admin/accommodation/{id}"),
            None,
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Partial update
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/accommodation/{id}"),
            Some(token),
            r#"{"price":250,"is_available":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["package"]["package_name"], serde_json::json!(name));
    assert_eq!(body["package"]["is_available"], serde_json::json!(true));

    // Delete
    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/admin/accommodation/{id}"),
            Some(token),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Gone
    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/admin/accommodation/{id}"),
            None,
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(
        body["error"],
        serde_json::json!("Accommodation package not found")
    );
}

#[tokio::test]
async fn accommodation_missing_id_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let ctx = test_context(pool);
    let app = create_api_router(ctx);

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/admin/accommodation/999999999",
            None,
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(
        body["error"],
        serde_json::json!("Accommodation package not found")
    );
}

// ============================================================================
// Sponsors: unauthorized mutation leaves the row in place
// ============================================================================

#[tokio::test]
async fn unauthorized_delete_leaves_sponsor_present() {
    let Some(pool) = test_pool().await else { return };
    let ctx = test_context(pool.clone());
    let app = create_api_router(ctx.clone());
    let service = SponsorService::new(pool);

    let sponsor = service
        .create(&NewSponsorFields {
            name: format!("{} Acme", prefix()),
            tier: "gold".to_string(),
            website_url: None,
            logo_url: None,
            description: None,
        })
        .await
        .unwrap();

    let visitor = insert_session(&ctx.sessions, Uuid::new_v4(), "visitor@example.com".into()).await;
    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/admin/sponsors/{}", sponsor.sponsor_id),
            Some(visitor),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The row survived the rejected call.
    assert!(service.get(sponsor.sponsor_id).await.unwrap().is_some());

    service.delete(sponsor.sponsor_id).await.unwrap();
}

#[tokio::test]
async fn sponsor_reorder_updates_display_order() {
    let Some(pool) = test_pool().await else { return };
    let service = SponsorService::new(pool);
    let tag = prefix();

    let first = service
        .create(&NewSponsorFields {
            name: format!("{tag} One"),
            tier: "gold".into(),
            website_url: None,
            logo_url: None,
            description: None,
        })
        .await
        .unwrap();
    let second = service
        .create(&NewSponsorFields {
            name: format!("{tag} Two"),
            tier: "silver".into(),
            website_url: None,
            logo_url: None,
            description: None,
        })
        .await
        .unwrap();

    let updated = service
        .reorder(&[(first.sponsor_id, 2), (second.sponsor_id, 1)])
        .await
        .unwrap();
    assert_eq!(updated, 2);

    let listed = service.list().await.unwrap();
    let pos = |id: i64| listed.iter().position(|s| s.sponsor_id == id).unwrap();
    assert!(pos(second.sponsor_id) < pos(first.sponsor_id));

    service.delete(first.sponsor_id).await.unwrap();
    service.delete(second.sponsor_id).await.unwrap();
}

// ============================================================================
// Events: fee replacement is atomic and complete
// ============================================================================

#[tokio::test]
async fn event_fee_replacement_swaps_the_whole_set() {
    let Some(pool) = test_pool().await else { return };
    let service = EventService::new(pool.clone());
    let tag = prefix();

    let event = service
        .create(
            &NewEventFields {
                event_name: format!("{tag} Hackathon"),
                category_id: 0,
                event_date: None,
                event_picture: None,
                rulebook: None,
                description: None,
                is_registration_open: true,
                is_dau_free: false,
            },
            &[
                NewFeeFields {
                    participation_type: "solo".into(),
                    price: Decimal::from(100),
                    min_members: 1,
                    max_members: 1,
                },
                NewFeeFields {
                    participation_type: "duet".into(),
                    price: Decimal::from(200),
                    min_members: 2,
                    max_members: 2,
                },
            ],
        )
        .await
        .unwrap();

    let old_fees = service.fees_for_event(event.event_id).await.unwrap();
    assert_eq!(old_fees.len(), 2);

    service
        .update(
            event.event_id,
            &Default::default(),
            Some(&[NewFeeFields {
                participation_type: "squad".into(),
                price: Decimal::from(500),
                min_members: 4,
                max_members: 6,
            }]),
        )
        .await
        .unwrap()
        .expect("event exists");

    let new_fees = service.fees_for_event(event.event_id).await.unwrap();
    assert_eq!(new_fees.len(), 1);
    assert_eq!(new_fees[0].participation_type, "squad");

    // The replaced fee rows are gone, not orphaned.
    for fee in &old_fees {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fee WHERE fee_id = $1")
            .bind(fee.fee_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    assert!(service.delete(event.event_id).await.unwrap());
}

// ============================================================================
// Registrations: totals and summary cover the whole filtered set
// ============================================================================

#[tokio::test]
async fn registration_report_aggregates_whole_filter() {
    let Some(pool) = test_pool().await else { return };
    let service = RegistrationService::new(pool.clone());
    let tag = prefix();
    let college = format!("{tag} College");

    let (method_id,): (i64,) = sqlx::query_as(
        "INSERT INTO payment_method (method_name, gateway_charge) VALUES ($1, $2) RETURNING method_id",
    )
    .bind(format!("{tag}-upi"))
    .bind(Decimal::from(5))
    .fetch_one(&pool)
    .await
    .unwrap();

    let mut registration_ids = Vec::new();
    for (i, status) in ["done", "pending"].iter().enumerate() {
        let user_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (user_id, email, user_name, college, password_hash, password_salt) VALUES ($1, $2, $3, $4, 'x', 'y')",
        )
        .bind(user_id)
        .bind(format!("{tag}-{i}@example.com"))
        .bind(format!("{tag} user {i}"))
        .bind(&college)
        .execute(&pool)
        .await
        .unwrap();

        let (registration_id,): (i64,) = sqlx::query_as(
            "INSERT INTO event_registrations (transaction_id, user_id, payment_method_id, payment_status, gross_amount) VALUES ($1, $2, $3, $4, $5) RETURNING registration_id",
        )
        .bind(format!("{tag}-txn-{i}"))
        .bind(user_id)
        .bind(method_id)
        .bind(status)
        .bind(Decimal::from(100))
        .fetch_one(&pool)
        .await
        .unwrap();
        registration_ids.push(registration_id);
    }

    let filter = RegistrationFilter {
        search: Some(college.clone()),
        ..Default::default()
    };
    let (rows, total, summary) = service.paged_report(&filter, 1, 1).await.unwrap();

    // One row per page, but totals describe the whole filtered set.
    assert_eq!(rows.len(), 1);
    assert_eq!(total, 2);
    assert_eq!(summary.total_registrations, 2);
    assert_eq!(summary.paid, 1);
    assert_eq!(summary.gross_revenue, Decimal::from(100));
    assert_eq!(summary.gateway_charges, Decimal::from(5));
    assert_eq!(summary.net_revenue, Decimal::from(95));

    // Transaction-id search reaches the same rows.
    let filter = RegistrationFilter {
        search: Some(format!("{tag}-txn")),
        ..Default::default()
    };
    let (_, total, _) = service.paged_report(&filter, 1, 10).await.unwrap();
    assert_eq!(total, 2);

    for registration_id in registration_ids {
        sqlx::query("DELETE FROM event_registrations WHERE registration_id = $1")
            .bind(registration_id)
            .execute(&pool)
            .await
            .unwrap();
    }
    sqlx::query("DELETE FROM users WHERE college = $1")
        .bind(&college)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM payment_method WHERE method_id = $1")
        .bind(method_id)
        .execute(&pool)
        .await
        .unwrap();
}

// ============================================================================
// Auth: register then login round trip
// ============================================================================

#[tokio::test]
async fn register_then_login_round_trip() {
    let Some(pool) = test_pool().await else { return };
    let ctx = test_context(pool.clone());
    let app = create_api_router(ctx);
    let email = format!("{}@example.com", prefix());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &format!(
                r#"{{"email":"{email}","password":"hunter2","first_name":"Fest","last_name":"Goer","college":"Tech","dob":"2001-05-14"}}"#
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Duplicate registration is rejected.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &format!(
                r#"{{"email":"{email}","password":"hunter2","first_name":"Fest","last_name":"Goer"}}"#
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Wrong password fails.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &format!(r#"{{"email":"{email}","password":"wrong"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct password succeeds and reports non-admin.
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &format!(r#"{{"email":"{email}","password":"hunter2"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["isAdmin"], serde_json::json!(false));
    assert_eq!(body["user"]["user_name"], serde_json::json!("Fest Goer"));

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&pool)
        .await
        .unwrap();
}

// ============================================================================
// Accommodation service: direct round trip
// ============================================================================

#[tokio::test]
async fn accommodation_service_round_trip() {
    let Some(pool) = test_pool().await else { return };
    let service = AccommodationService::new(pool);
    let name = format!("{} Standard", prefix());

    let created = service
        .create(&festival::database::NewAccommodationFields {
            package_name: name.clone(),
            price: Some(Decimal::from(100)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(created.id > 0);

    let fetched = service.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.package_name, name);
    assert_eq!(fetched.price, Some(Decimal::from(100)));

    assert!(service.delete(created.id).await.unwrap());
    assert!(service.get(created.id).await.unwrap().is_none());
    assert!(!service.delete(created.id).await.unwrap());
}
