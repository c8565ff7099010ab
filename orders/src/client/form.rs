use std::path::Path;

use reqwest::multipart::{Form, Part};

use super::ClientError;
use crate::model::{FoodCategory, OrderRecord};
use crate::routes::{ID_FIELD, PHOTO_FIELD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// A photo is mandatory
    Create,
    /// The stored photo is kept unless a new one is chosen
    Update,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Photo {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo")
            .to_string();

        Ok(Self {
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            bytes,
        })
    }
}

/// Declared type for a local file, judged by extension only.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Order form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub name: String,
    pub phone: String,
    pub city: String,
    pub pincode: String,
    pub food: String,
    pub category: FoodCategory,
    pub photo: Option<PhotoFile>,
}

impl OrderDraft {
    /// Prefill for editing; the stored photo stays on the server.
    pub fn from_record(record: &OrderRecord) -> Self {
        let order = &record.order;
        Self {
            name: order.name.clone(),
            phone: order.phone.clone(),
            city: order.city.clone(),
            pincode: order.pincode.clone(),
            food: order.food.clone(),
            category: order.category,
            photo: None,
        }
    }

    pub fn validate(&self, mode: FormMode) -> Result<(), ClientError> {
        let fail = |message: &str| -> Result<(), ClientError> {
            Err(ClientError::Validation(message.to_string()))
        };

        if self.name.trim().is_empty() {
            return fail("Please enter your name");
        }
        if self.phone.trim().is_empty() {
            return fail("Please enter your phone number");
        }
        if self.city.trim().is_empty() || self.pincode.trim().is_empty() {
            return fail("Please enter your complete address");
        }
        if self.food.trim().is_empty() {
            return fail("Please enter the food item");
        }
        if mode == FormMode::Create && self.photo.is_none() {
            return fail("Please upload a food photo");
        }
        Ok(())
    }

    /// Multipart body for submission. Text values are trimmed; `id` is added
    /// for updates.
    pub fn into_form(self, id: Option<&str>) -> Result<Form, ClientError> {
        let mut form = Form::new()
            .text("name", self.name.trim().to_string())
            .text("phone", self.phone.trim().to_string())
            .text("city", self.city.trim().to_string())
            .text("pincode", self.pincode.trim().to_string())
            .text("food", self.food.trim().to_string())
            .text("category", self.category.to_string());

        if let Some(photo) = self.photo {
            let part = Part::bytes(photo.bytes)
                .file_name(photo.file_name)
                .mime_str(&photo.content_type)?;
            form = form.part(PHOTO_FIELD, part);
        }
        if let Some(id) = id {
            form = form.text(ID_FIELD, id.to_string());
        }

        Ok(form)
    }
}
