use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use common::test_helpers::{TestResult, test_utils};
use common::{test_assert, test_assert_eq};
use orders::{
    model::{FoodCategory, Order},
    storage::InMemoryOrderStorage,
};
use serde_json::{Value, json};

use super::mocks::{BASE_URL, MockStorage, TestApp, get, str_field};

fn seeded_order(id: &str, food: &str, category: FoodCategory) -> Order {
    let now = Utc::now();
    Order {
        id: id.to_string(),
        name: "Bruno".to_string(),
        phone: "556".to_string(),
        city: "Gotham".to_string(),
        pincode: "20002".to_string(),
        food: food.to_string(),
        category,
        photo: format!("{id}.png"),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_list_orders_empty() -> TestResult {
    let app = TestApp::new().await?;

    let (status, body) = app.send(get("/order")?).await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    test_assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn test_list_orders_keeps_insertion_order_and_adds_photo_urls() -> TestResult {
    let storage = InMemoryOrderStorage::with_orders(vec![
        seeded_order("64b7f0c2a1b2c3d4e5f60001", "Wings", FoodCategory::NonVegetarian),
        seeded_order("64b7f0c2a1b2c3d4e5f60002", "Lemonade", FoodCategory::Beverage),
    ]);
    let app = TestApp::with_storage(Arc::new(storage)).await?;
    let created = app.create_pizza().await?;

    let (status, body) = app.send(get("/order")?).await?;
    test_utils::check_status_code(status, StatusCode::OK)?;

    let listed = body.as_array().cloned().unwrap_or_default();
    let ids: Vec<&str> = listed.iter().filter_map(|o| o["_id"].as_str()).collect();
    test_assert_eq!(
        ids,
        vec!["64b7f0c2a1b2c3d4e5f60001", "64b7f0c2a1b2c3d4e5f60002", str_field(&created, "_id")?]
    );

    test_assert_eq!(str_field(&listed[0], "category")?, "Non-Vegetarian");
    test_assert_eq!(
        str_field(&listed[1], "photoUrl")?,
        format!("{BASE_URL}/uploads/64b7f0c2a1b2c3d4e5f60002.png")
    );
    test_assert!(listed.iter().all(|o| o.get("createdAt").is_some_and(Value::is_string)));
    Ok(())
}

#[tokio::test]
async fn test_list_orders_store_failure() -> TestResult {
    let mut storage = MockStorage::new();
    storage
        .expect_list_orders()
        .returning(|| Err("server selection timeout".into()));
    let app = TestApp::with_storage(Arc::new(storage)).await?;

    let (status, body) = app.send(get("/order")?).await?;

    test_utils::check_status_code(status, StatusCode::INTERNAL_SERVER_ERROR)?;
    test_assert!(str_field(&body, "error")?.contains("server selection timeout"));
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> TestResult {
    let app = TestApp::new().await?;

    let (status, body) = app.send_raw(get("/health")?).await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    test_assert_eq!(body, b"OK".to_vec());
    Ok(())
}
