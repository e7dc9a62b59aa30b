// HTTP-level tests against the real route table

use actix_web::{http::StatusCode, test, web, App};
use fraudguard_api::{handlers, metrics, AppState};
use risk_engine::RiskEngine;
use serde_json::{json, Value};
use std::sync::Arc;

macro_rules! app {
    ($max_batch:expr) => {{
        metrics::init();
        test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(RiskEngine::deterministic())))
                .app_data(web::Data::new(AppState::new($max_batch)))
                .configure(handlers::configure_routes),
        )
        .await
    }};
}

fn weekday_transaction() -> Value {
    json!({
        "amount": 1250.00,
        "currency": "USD",
        "merchantId": "MERCH_001",
        "paymentMethod": "credit_card",
        "customerEmail": "alice.johnson@gmail.com",
        "timestamp": "2024-03-13T15:00:00Z"
    })
}

fn suspicious_transaction() -> Value {
    json!({
        "amount": 75000,
        "currency": "USD",
        "merchantId": "CRYPTO_EXCHANGE_NEW",
        "paymentMethod": "digital_wallet",
        "customerEmail": "x@tempmail.com",
        "timestamp": "2024-03-16T02:30:00Z"
    })
}

#[actix_web::test]
async fn test_predict_scores_batch_in_order() {
    let app = app!(100);

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({ "transactions": [weekday_transaction(), suspicious_transaction()] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["totalProcessed"], 2);
    assert_eq!(body["highRiskCount"], 1);

    let first = &body["predictions"][0];
    assert_eq!(first["riskLevel"], "low");
    assert_eq!(first["isFraud"], false);
    assert!(first["riskFactors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "Moderate transaction amount"));

    let second = &body["predictions"][1];
    assert_eq!(second["riskLevel"], "high");
    assert_eq!(second["isFraud"], true);
    assert!(second["riskScore"].as_f64().unwrap() <= 1.0);
    assert!(second["confidence"].as_f64().unwrap() <= 0.99);
}

#[actix_web::test]
async fn test_predict_accepts_unknown_currency() {
    let app = app!(100);

    let mut tx = weekday_transaction();
    tx["currency"] = json!("XYZ");
    tx["paymentMethod"] = json!("voucher");

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({ "transactions": [tx] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let factors = body["predictions"][0]["riskFactors"].as_array().unwrap().clone();
    assert!(factors.iter().any(|f| f == "Unrecognized currency"));
    assert!(factors.iter().any(|f| f == "Unrecognized payment method"));
}

#[actix_web::test]
async fn test_timestamp_without_offset_is_accepted() {
    let app = app!(100);

    // Saturday 02:30, no offset: read as UTC
    let mut naive = weekday_transaction();
    naive["timestamp"] = json!("2024-03-16T02:30:00");
    let mut garbled = weekday_transaction();
    garbled["timestamp"] = json!("16/03/2024");

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({ "transactions": [naive, garbled] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let factors = |i: usize| body["predictions"][i]["riskFactors"].as_array().unwrap().clone();

    assert!(factors(0).iter().any(|f| f == "Late-night transaction"));
    assert!(factors(0).iter().any(|f| f == "Weekend transaction"));
    assert!(factors(1).iter().any(|f| f == "Invalid timestamp format"));
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = app!(100);

    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"transactions\": [")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_web::test]
async fn test_wrong_field_type_is_unprocessable() {
    let app = app!(100);

    let mut tx = weekday_transaction();
    tx["amount"] = json!(true);

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({ "transactions": [tx] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_invalid_transaction_reports_index() {
    let app = app!(100);

    let mut bad = weekday_transaction();
    bad["amount"] = json!(0);

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({ "transactions": [weekday_transaction(), bad] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("index 1"));
}

#[actix_web::test]
async fn test_batch_size_limits() {
    let app = app!(2);

    let empty = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({ "transactions": [] }))
        .to_request();
    assert_eq!(
        test::call_service(&app, empty).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let three = vec![weekday_transaction(); 3];
    let oversized = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({ "transactions": three }))
        .to_request();
    assert_eq!(
        test::call_service(&app, oversized).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_web::test]
async fn test_health_and_index() {
    let app = app!(100);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["predict"], "/predict");
    assert_eq!(body["modelInfo"], "/model/info");
}

#[actix_web::test]
async fn test_model_info() {
    let app = app!(100);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/model/info").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "FraudGuard Risk Model");
    assert_eq!(body["riskThresholds"]["fraud"], 0.6);
    assert_eq!(body["features"].as_array().unwrap().len(), 6);
    assert!(body["supportedCurrencies"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "NGN"));
}

#[actix_web::test]
async fn test_metrics_exposition() {
    let app = app!(100);

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({ "transactions": [suspicious_transaction()] }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("fraudguard_predictions_total"));
    assert!(text.contains("fraudguard_fraud_flagged_total"));
}
