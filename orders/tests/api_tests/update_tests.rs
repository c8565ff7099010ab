use axum::http::StatusCode;
use common::test_helpers::{PNG_BYTES, TestResult, multipart::MultipartBuilder, test_utils};
use common::{test_assert, test_assert_eq};
use serde_json::json;

use super::mocks::{BASE_URL, TestApp, get, json_request, str_field};

#[tokio::test]
async fn test_update_order_text_fields_keeps_photo() -> TestResult {
    let app = TestApp::new().await?;
    let created = app.create_pizza().await?;
    let id = str_field(&created, "_id")?;

    let request = MultipartBuilder::new()
        .text("_id", id)
        .text("food", "Calzone")
        .text("category", "Vegan")
        .into_request("PUT", "/order")?;
    let (status, body) = app.send(request).await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    test_assert_eq!(str_field(&body, "_id")?, id);
    test_assert_eq!(str_field(&body, "food")?, "Calzone");
    test_assert_eq!(str_field(&body, "category")?, "Vegan");
    test_assert_eq!(str_field(&body, "name")?, "Ana");
    test_assert_eq!(str_field(&body, "photo")?, str_field(&created, "photo")?);
    test_assert_eq!(str_field(&body, "createdAt")?, str_field(&created, "createdAt")?);
    test_assert!(app.has_file(str_field(&created, "photo")?).await?);
    Ok(())
}

#[tokio::test]
async fn test_update_order_replaces_photo() -> TestResult {
    let app = TestApp::new().await?;
    let created = app.create_pizza().await?;
    let old_photo = str_field(&created, "photo")?;

    let request = MultipartBuilder::new()
        .text("_id", str_field(&created, "_id")?)
        .file("photo", "new.png", "image/png", PNG_BYTES)
        .into_request("PUT", "/order")?;
    let (status, body) = app.send(request).await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    let new_photo = str_field(&body, "photo")?;
    test_assert!(new_photo != old_photo);
    test_assert!(new_photo.ends_with(".png"));
    test_assert_eq!(str_field(&body, "photoUrl")?, format!("{BASE_URL}/uploads/{new_photo}"));
    test_assert!(app.has_file(new_photo).await?);
    test_assert!(!app.has_file(old_photo).await?, "replaced photo must be removed");
    test_assert_eq!(app.stored_files()?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_update_order_with_json_body() -> TestResult {
    let app = TestApp::new().await?;
    let created = app.create_pizza().await?;

    let request = json_request(
        "PUT",
        "/order",
        &json!({ "_id": str_field(&created, "_id")?, "city": "Star City", "phone": "557" }),
    )?;
    let (status, body) = app.send(request).await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    test_assert_eq!(str_field(&body, "city")?, "Star City");
    test_assert_eq!(str_field(&body, "phone")?, "557");
    test_assert_eq!(str_field(&body, "photo")?, str_field(&created, "photo")?);

    let (_, listed) = app.send(get("/order")?).await?;
    test_assert_eq!(listed[0]["city"], json!("Star City"));
    Ok(())
}

#[tokio::test]
async fn test_update_order_requires_id() -> TestResult {
    let app = TestApp::new().await?;

    let request = MultipartBuilder::new()
        .text("food", "Calzone")
        .into_request("PUT", "/order")?;
    let (status, body) = app.send(request).await?;

    test_utils::check_status_code(status, StatusCode::BAD_REQUEST)?;
    test_assert_eq!(str_field(&body, "error")?, "Order _id required for update");
    Ok(())
}

#[tokio::test]
async fn test_update_unknown_order_is_not_found() -> TestResult {
    let app = TestApp::new().await?;
    let created = app.create_pizza().await?;

    for id in ["64b7f0c2a1b2c3d4e5f6ffff", "not-an-object-id"] {
        let request = MultipartBuilder::new()
            .text("_id", id)
            .text("food", "Calzone")
            .file("photo", "new.png", "image/png", PNG_BYTES)
            .into_request("PUT", "/order")?;
        let (status, body) = app.send(request).await?;

        test_utils::check_status_code(status, StatusCode::NOT_FOUND)?;
        test_assert_eq!(str_field(&body, "error")?, "Order not found");
    }

    test_assert_eq!(app.stored_files()?, vec![str_field(&created, "photo")?.to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_update_order_rejects_blank_field() -> TestResult {
    let app = TestApp::new().await?;
    let created = app.create_pizza().await?;

    let request = MultipartBuilder::new()
        .text("_id", str_field(&created, "_id")?)
        .text("name", "  ")
        .file("photo", "new.png", "image/png", PNG_BYTES)
        .into_request("PUT", "/order")?;
    let (status, _) = app.send(request).await?;

    test_utils::check_status_code(status, StatusCode::BAD_REQUEST)?;
    test_assert_eq!(
        app.stored_files()?,
        vec![str_field(&created, "photo")?.to_string()],
        "new photo must be rolled back"
    );

    let (_, listed) = app.send(get("/order")?).await?;
    test_assert_eq!(listed[0]["name"], json!("Ana"));
    Ok(())
}
