use axum::http::StatusCode;
use common::test_helpers::{JPEG_BYTES, TestResult, test_utils};
use common::test_assert_eq;

use super::mocks::{TestApp, get, str_field};

#[tokio::test]
async fn test_uploaded_photo_is_served() -> TestResult {
    let app = TestApp::new().await?;
    let created = app.create_pizza().await?;
    let photo = str_field(&created, "photo")?;

    let (status, bytes) = app.send_raw(get(&format!("/uploads/{photo}"))?).await?;

    test_utils::check_status_code(status, StatusCode::OK)?;
    test_assert_eq!(bytes, JPEG_BYTES.to_vec());
    Ok(())
}

#[tokio::test]
async fn test_missing_upload_is_not_found() -> TestResult {
    let app = TestApp::new().await?;

    let (status, _) = app.send_raw(get("/uploads/1700000000000-1.jpg")?).await?;

    test_utils::check_status_code(status, StatusCode::NOT_FOUND)?;
    Ok(())
}
