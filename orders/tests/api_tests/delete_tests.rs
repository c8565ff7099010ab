use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use common::test_helpers::{TestResult, test_utils};
use common::{test_assert, test_assert_eq};
use orders::images::ImageStorage;
use orders::model::{FoodCategory, Order};
use serde_json::json;

use super::mocks::{MockStorage, TestApp, get, json_request, str_field};

#[tokio::test]
async fn test_delete_order_removes_record_and_photo() -> TestResult {
    let app = TestApp::new().await?;
    let created = app.create_pizza().await?;
    let id = str_field(&created, "_id")?;
    let photo = str_field(&created, "photo")?;

    let (status, body) = app.send(json_request("DELETE", "/order", &json!({ "_id": id }))?).await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    test_assert_eq!(str_field(&body, "message")?, "Order deleted");
    test_assert_eq!(body["order"]["_id"], json!(id));
    test_assert_eq!(body["order"]["food"], json!("Pizza"));
    test_assert!(!app.has_file(photo).await?);

    let (_, listed) = app.send(get("/order")?).await?;
    test_assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn test_delete_order_twice_is_not_found() -> TestResult {
    let app = TestApp::new().await?;
    let created = app.create_pizza().await?;
    let request = || json_request("DELETE", "/order", &json!({ "_id": created["_id"] }));

    let (status, _) = app.send(request()?).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;

    let (status, body) = app.send(request()?).await?;
    test_utils::check_status_code(status, StatusCode::NOT_FOUND)?;
    test_assert_eq!(str_field(&body, "error")?, "Order not found");
    Ok(())
}

#[tokio::test]
async fn test_delete_order_requires_id() -> TestResult {
    let app = TestApp::new().await?;

    for body in [json!({}), json!({ "_id": "" })] {
        let (status, response) = app.send(json_request("DELETE", "/order", &body)?).await?;
        test_utils::check_status_code(status, StatusCode::BAD_REQUEST)?;
        test_assert_eq!(str_field(&response, "error")?, "Order _id required for deletion");
    }

    let (status, _) = app.send(test_utils::build_request("DELETE", "/order", None)?).await?;
    test_utils::check_status_code(status, StatusCode::BAD_REQUEST)?;
    Ok(())
}

#[tokio::test]
async fn test_delete_order_with_missing_photo_file() -> TestResult {
    let app = TestApp::new().await?;
    let created = app.create_pizza().await?;
    let photo = str_field(&created, "photo")?;
    std::fs::remove_file(app.images.root().join(photo))?;

    let (status, _) = app
        .send(json_request("DELETE", "/order", &json!({ "_id": created["_id"] }))?)
        .await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    Ok(())
}

#[tokio::test]
async fn test_delete_order_store_failure_reports_error() -> TestResult {
    let now = Utc::now();
    let order = Order {
        id: "64b7f0c2a1b2c3d4e5f60001".to_string(),
        name: "Ana".to_string(),
        phone: "555".to_string(),
        city: "Metropolis".to_string(),
        pincode: "10001".to_string(),
        food: "Pizza".to_string(),
        category: FoodCategory::Vegetarian,
        photo: "1700000000000-1.jpg".to_string(),
        created_at: now,
        updated_at: now,
    };

    let mut storage = MockStorage::new();
    storage
        .expect_get_order()
        .withf(|id: &str| id == "64b7f0c2a1b2c3d4e5f60001")
        .returning(move |_| Ok(Some(order.clone())));
    storage
        .expect_delete_order()
        .times(1)
        .returning(|_| Err("write concern failed".into()));
    let app = TestApp::with_storage(Arc::new(storage)).await?;

    let (status, body) = app
        .send(json_request("DELETE", "/order", &json!({ "_id": "64b7f0c2a1b2c3d4e5f60001" }))?)
        .await?;

    test_utils::check_status_code(status, StatusCode::INTERNAL_SERVER_ERROR)?;
    test_assert!(str_field(&body, "error")?.contains("write concern failed"));
    Ok(())
}
