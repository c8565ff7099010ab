//! Order lifecycle.
//!
//! The record and its image file are two resources with no shared
//! transaction. Writes are ordered so that a failure leaves at worst an
//! orphaned file, never a record pointing at a missing one:
//!
//! - create: write image, validate, insert; the image is removed if either step fails
//! - update: resolve the record, write the new image, update, then remove the old image
//! - delete: resolve the record, remove its image, then remove the record

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use crate::error::OrderError;
use crate::images::{ImageStorage, ImageUpload};
use crate::model::{Order, OrderChanges, OrderFields, OrderRecord};
use crate::storage::OrderStorage;

/// Public path prefix of stored images.
pub const UPLOADS_PATH: &str = "uploads";

#[derive(Clone)]
pub struct OrderService {
    storage: Arc<dyn OrderStorage>,
    images: Arc<dyn ImageStorage>,
    public_base_url: Url,
}

impl OrderService {
    pub fn new(storage: Arc<dyn OrderStorage>, images: Arc<dyn ImageStorage>, public_base_url: Url) -> Self {
        Self {
            storage,
            images,
            public_base_url,
        }
    }

    pub fn images(&self) -> &Arc<dyn ImageStorage> {
        &self.images
    }

    /// Public address of a stored image.
    pub fn photo_url(&self, file_name: &str) -> String {
        let base = self.public_base_url.as_str().trim_end_matches('/');
        format!("{base}/{UPLOADS_PATH}/{file_name}")
    }

    pub fn to_record(&self, order: Order) -> OrderRecord {
        OrderRecord {
            photo_url: self.photo_url(&order.photo),
            order,
        }
    }

    /// Writes `upload`, then runs `step` with the stored file name. If `step`
    /// fails the file is removed again before the error is returned.
    async fn stage_image<T, F, Fut>(&self, upload: &ImageUpload, step: F) -> Result<T, OrderError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, OrderError>>,
    {
        let file_name = self.images.save(upload).await.map_err(OrderError::Image)?;

        match step(file_name.clone()).await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.discard_image(&file_name, "rollback").await;
                Err(err)
            }
        }
    }

    /// Best-effort removal; failures are logged and swallowed.
    async fn discard_image(&self, file_name: &str, reason: &str) {
        if let Err(e) = self.images.remove(file_name).await {
            warn!(file = %file_name, reason, error = %e, "Failed to remove image");
        }
    }

    pub async fn create(
        &self,
        fields: OrderFields,
        image: Option<ImageUpload>,
    ) -> Result<OrderRecord, OrderError> {
        let image = image.ok_or_else(|| OrderError::Validation("Food photo is required".to_string()))?;

        let order = self
            .stage_image(&image, |file_name| async move {
                let new_order = fields.into_new_order(file_name)?;
                self.storage.insert_order(new_order).await.map_err(OrderError::Store)
            })
            .await?;

        info!(order_id = %order.id, photo = %order.photo, "Created order");
        Ok(self.to_record(order))
    }

    pub async fn list(&self) -> Result<Vec<OrderRecord>, OrderError> {
        let orders = self.storage.list_orders().await.map_err(OrderError::Store)?;
        Ok(orders.into_iter().map(|order| self.to_record(order)).collect())
    }

    pub async fn update(
        &self,
        id: Option<&str>,
        fields: OrderFields,
        image: Option<ImageUpload>,
    ) -> Result<OrderRecord, OrderError> {
        let id = required_id(id, "update")?;
        let existing = self.find_existing(id).await?;

        let updated = match image {
            Some(image) => {
                self.stage_image(&image, |file_name| async move {
                    let changes = fields.into_changes(Some(file_name))?;
                    self.apply_changes(id, &changes).await
                })
                .await?
            }
            None => {
                let changes = fields.into_changes(None)?;
                self.apply_changes(id, &changes).await?
            }
        };

        if updated.photo != existing.photo {
            self.discard_image(&existing.photo, "replaced").await;
        }

        info!(order_id = %updated.id, "Updated order");
        Ok(self.to_record(updated))
    }

    pub async fn delete(&self, id: Option<&str>) -> Result<OrderRecord, OrderError> {
        let id = required_id(id, "deletion")?;
        let existing = self.find_existing(id).await?;

        self.images
            .remove(&existing.photo)
            .await
            .map_err(OrderError::Image)?;

        let deleted = self
            .storage
            .delete_order(id)
            .await
            .map_err(OrderError::Store)?
            .ok_or(OrderError::NotFound)?;

        info!(order_id = %deleted.id, "Deleted order");
        Ok(self.to_record(deleted))
    }

    async fn find_existing(&self, id: &str) -> Result<Order, OrderError> {
        self.storage
            .get_order(id)
            .await
            .map_err(OrderError::Store)?
            .ok_or(OrderError::NotFound)
    }

    async fn apply_changes(&self, id: &str, changes: &OrderChanges) -> Result<Order, OrderError> {
        self.storage
            .update_order(id, changes)
            .await
            .map_err(OrderError::Store)?
            .ok_or(OrderError::NotFound)
    }
}

fn required_id<'a>(id: Option<&'a str>, action: &str) -> Result<&'a str, OrderError> {
    id.map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| OrderError::BadRequest(format!("Order _id required for {action}")))
}
