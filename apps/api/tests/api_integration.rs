//! Integration tests for the API server.
//!
//! Each test builds the router over its own in-memory database, seeds a
//! pharmacy and medicines through the pool, and drives the routes with
//! tower's `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use tower::ServiceExt;

use medirush_api::AppState;
use medirush_core::DeliveryPricing;
use medirush_db::{Database, DbConfig};

const PHARMACY_ID: &str = "ph-everest";
const PHARMACY_LAT: f64 = 24.5794;
const PHARMACY_LNG: f64 = 80.8320;

async fn setup() -> (axum::Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    sqlx::query(
        r#"
        INSERT INTO pharmacies (id, name, address, lat, lng, is_approved, phone, created_at)
        VALUES (?, 'Everest Medical', '11 Rajendra Nagar Rd, Satna', ?, ?, 1, '', ?)
        "#,
    )
    .bind(PHARMACY_ID)
    .bind(PHARMACY_LAT)
    .bind(PHARMACY_LNG)
    .bind(Utc::now())
    .execute(db.pool())
    .await
    .unwrap();

    let now = Utc::now();
    for (id, price_paise, stock) in [("med-1", 10_000_i64, 50_i64), ("med-2", 2_800, 3)] {
        sqlx::query(
            r#"
            INSERT INTO medicines (id, pharmacy_id, name, category, strength, unit,
                                   price_paise, stock_qty, is_available, created_at, updated_at)
            VALUES (?, ?, ?, 'Everyday', '500mg', 'strip', ?, ?, 1, ?, ?)
            "#,
        )
        .bind(id)
        .bind(PHARMACY_ID)
        .bind(format!("Medicine {id}"))
        .bind(price_paise)
        .bind(stock)
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();
    }

    let state = Arc::new(AppState {
        db: db.clone(),
        delivery: DeliveryPricing::default(),
    });

    (medirush_api::create_app(state), db)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn put_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn order_request() -> serde_json::Value {
    serde_json::json!({
        "pharmacy_id": PHARMACY_ID,
        "items": [{ "medicine_id": "med-1", "quantity": 5 }],
        "is_express": false,
        "delivery_address": "12 Hospital Rd, Satna",
        "customer_phone": "+91 98765 43210"
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _db) = setup().await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_order() {
    let (app, _db) = setup().await;

    let response = app.oneshot(post_json("/orders", order_request())).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert!(json["order_number"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(json["order"]["status"], "pending");
    assert_eq!(json["order"]["subtotal_paise"], 45_000);
    assert_eq!(json["order"]["quantity_discount_paise"], 5_000);
    assert_eq!(json["order"]["total_paise"], 45_000);
    assert_eq!(json["order"]["distance_km"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_create_order_with_surcharge_and_express() {
    let (app, _db) = setup().await;

    let mut body = order_request();
    body["is_express"] = serde_json::json!(true);
    body["customer_lat"] = serde_json::json!(PHARMACY_LAT + 0.05);
    body["customer_lng"] = serde_json::json!(PHARMACY_LNG);

    let response = app.oneshot(post_json("/orders", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["order"]["distance_surcharge_paise"], 3_000);
    assert_eq!(json["order"]["express_charge_paise"], 3_000);
    assert_eq!(json["order"]["total_paise"], 51_000);
    assert!(json["order"]["distance_km"].as_f64().unwrap() > 2.5);
}

#[tokio::test]
async fn test_create_and_get_order() {
    let (app, _db) = setup().await;

    let response = app
        .clone()
        .oneshot(post_json("/orders", order_request()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["order"]["id"].as_str().unwrap().to_string();

    let response = app.oneshot(get(&format!("/orders/{id}"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["order"]["id"].as_str().unwrap(), id);
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["unit_price_paise"], 9_000);
    assert_eq!(json["pharmacy"]["name"], "Everest Medical");
}

#[tokio::test]
async fn test_get_unknown_order_is_404() {
    let (app, _db) = setup().await;

    let response = app.oneshot(get("/orders/ord-ghost")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["kind"], "not_found");
}

#[tokio::test]
async fn test_insufficient_stock_is_409_naming_the_medicine() {
    let (app, db) = setup().await;

    let mut body = order_request();
    body["items"] = serde_json::json!([{ "medicine_id": "med-2", "quantity": 5 }]);

    let response = app.oneshot(post_json("/orders", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = json_body(response).await;
    assert_eq!(json["kind"], "insufficient_stock");
    assert_eq!(json["medicine_id"], "med-2");

    // Nothing was committed
    assert_eq!(db.medicines().stock_of("med-2").await.unwrap(), Some(3));
}

#[tokio::test]
async fn test_blank_address_is_400() {
    let (app, _db) = setup().await;

    let mut body = order_request();
    body["delivery_address"] = serde_json::json!("   ");

    let response = app.oneshot(post_json("/orders", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["kind"], "validation");
}

#[tokio::test]
async fn test_unknown_pharmacy_is_404() {
    let (app, _db) = setup().await;

    let mut body = order_request();
    body["pharmacy_id"] = serde_json::json!("ph-ghost");

    let response = app.oneshot(post_json("/orders", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["kind"], "not_found");
}

#[tokio::test]
async fn test_pay_then_deliver_lifecycle() {
    let (app, _db) = setup().await;

    let response = app
        .clone()
        .oneshot(post_json("/orders", order_request()))
        .await
        .unwrap();
    let created = json_body(response).await;
    let id = created["order"]["id"].as_str().unwrap().to_string();

    // pending -> paid
    let response = app
        .clone()
        .oneshot(post_json(&format!("/orders/{id}/pay"), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "paid");

    // paid -> out_for_delivery -> delivered
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/orders/{id}/status"),
            serde_json::json!({ "status": "out_for_delivery" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/orders/{id}/status"),
            serde_json::json!({ "status": "delivered" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "delivered");

    // delivered is terminal
    let response = app
        .oneshot(put_json(
            &format!("/orders/{id}/status"),
            serde_json::json!({ "status": "out_for_delivery" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = json_body(response).await;
    assert_eq!(json["kind"], "conflict");
}
