use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State, multipart::MultipartError, rejection::JsonRejection},
    http::{StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    error::OrderError,
    executable_utils::AppState,
    images::{ImageUpload, check_content_type},
    model::{OrderFields, OrderRecord},
};

/// Form field carrying the image.
pub const PHOTO_FIELD: &str = "photo";
pub const ID_FIELD: &str = "_id";

/// A write request: `multipart/form-data` with an optional `photo` part, or a
/// JSON object of text fields.
#[derive(Debug, Default)]
pub struct OrderSubmission {
    pub id: Option<String>,
    pub fields: OrderFields,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Deserialize)]
struct JsonSubmission {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(flatten)]
    fields: OrderFields,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

impl FromRequest<AppState> for OrderSubmission {
    type Rejection = OrderError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| OrderError::BadRequest(rejection.body_text()))?;
            Self::from_multipart(multipart, state.max_image_bytes).await
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<JsonSubmission>::from_request(req, state)
                .await
                .map_err(|rejection| OrderError::BadRequest(rejection.body_text()))?;
            Ok(Self {
                id: body.id,
                fields: body.fields,
                image: None,
            })
        } else {
            Err(OrderError::BadRequest(
                "Expected a multipart/form-data or application/json body".to_string(),
            ))
        }
    }
}

impl OrderSubmission {
    async fn from_multipart(mut multipart: Multipart, limit: usize) -> Result<Self, OrderError> {
        let mut submission = Self::default();
        let to_order_error = |e: MultipartError| multipart_error(e, limit);

        while let Some(mut field) = multipart.next_field().await.map_err(to_order_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == PHOTO_FIELD {
                let original_name = field.file_name().unwrap_or_default().to_string();
                // Browsers send an empty, nameless part when no file was picked.
                if original_name.is_empty() {
                    continue;
                }
                let content_type = check_content_type(field.content_type())?;

                let mut bytes = Vec::new();
                while let Some(chunk) = field.chunk().await.map_err(to_order_error)? {
                    if bytes.len() + chunk.len() > limit {
                        return Err(OrderError::PayloadTooLarge { limit });
                    }
                    bytes.extend_from_slice(&chunk);
                }

                if !bytes.is_empty() {
                    submission.image = Some(ImageUpload::new(original_name, content_type, bytes));
                }
                continue;
            }

            let value = field.text().await.map_err(to_order_error)?;
            if name == ID_FIELD {
                submission.id = Some(value);
            } else if !submission.fields.set(&name, value) {
                debug!(field = %name, "Ignoring unknown form field");
            }
        }

        Ok(submission)
    }
}

fn multipart_error(error: MultipartError, limit: usize) -> OrderError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        OrderError::PayloadTooLarge { limit }
    } else {
        OrderError::BadRequest(error.body_text())
    }
}

pub async fn create_order(
    State(state): State<AppState>,
    submission: OrderSubmission,
) -> Result<(StatusCode, Json<OrderRecord>), OrderError> {
    let record = state.service.create(submission.fields, submission.image).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderRecord>>, OrderError> {
    Ok(Json(state.service.list().await?))
}

pub async fn update_order(
    State(state): State<AppState>,
    submission: OrderSubmission,
) -> Result<Json<OrderRecord>, OrderError> {
    let record = state
        .service
        .update(submission.id.as_deref(), submission.fields, submission.image)
        .await?;
    Ok(Json(record))
}

pub async fn delete_order(
    State(state): State<AppState>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, OrderError> {
    let Json(request) = body.map_err(|rejection| OrderError::BadRequest(rejection.body_text()))?;
    let order = state.service.delete(request.id.as_deref()).await?;
    Ok(Json(json!({ "message": "Order deleted", "order": order })))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK").into_response()
}
