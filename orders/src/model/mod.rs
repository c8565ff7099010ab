use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use strum_macros::{Display as EnumDisplay, EnumIter, EnumString};

use crate::error::OrderError;

pub mod mongo_model;

pub type GenericError = Box<dyn Error + Send + Sync>;

/// Hex rendering of the store-assigned identifier.
pub type OrderId = String;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumDisplay, EnumString, EnumIter,
)]
pub enum FoodCategory {
    #[default]
    Vegetarian,
    #[serde(rename = "Non-Vegetarian")]
    #[strum(to_string = "Non-Vegetarian")]
    NonVegetarian,
    Vegan,
    Dessert,
    Beverage,
}

impl FoodCategory {
    pub fn parse(raw: &str) -> Result<Self, OrderError> {
        raw.trim()
            .parse()
            .map_err(|_| OrderError::Validation(format!("Unknown food category: {}", raw.trim())))
    }
}

/// A persisted order. `photo` is the server-local image file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub name: String,
    pub phone: String,
    pub city: String,
    pub pincode: String,
    pub food: String,
    #[serde(default)]
    pub category: FoodCategory,
    pub photo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order as handed to callers, carrying the public image address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(flatten)]
    pub order: Order,
    pub photo_url: String,
}

/// Validated input for a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub name: String,
    pub phone: String,
    pub city: String,
    pub pincode: String,
    pub food: String,
    pub category: FoodCategory,
    pub photo: String,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub food: Option<String>,
    pub category: Option<FoodCategory>,
    pub photo: Option<String>,
}

impl OrderChanges {
    pub fn apply_to(&self, order: &mut Order, now: DateTime<Utc>) {
        let text_fields = [
            (&self.name, &mut order.name),
            (&self.phone, &mut order.phone),
            (&self.city, &mut order.city),
            (&self.pincode, &mut order.pincode),
            (&self.food, &mut order.food),
            (&self.photo, &mut order.photo),
        ];
        for (change, field) in text_fields {
            if let Some(value) = change {
                *field = value.clone();
            }
        }
        if let Some(category) = self.category {
            order.category = category;
        }
        order.updated_at = now;
    }
}

/// Text fields as submitted by a form or JSON body, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderFields {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub food: Option<String>,
    pub category: Option<String>,
}

impl OrderFields {
    /// Stores `value` under the form field `name`. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "name" => &mut self.name,
            "phone" => &mut self.phone,
            "city" => &mut self.city,
            "pincode" => &mut self.pincode,
            "food" => &mut self.food,
            "category" => &mut self.category,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn into_new_order(self, photo: String) -> Result<NewOrder, OrderError> {
        Ok(NewOrder {
            name: required("name", self.name)?,
            phone: required("phone", self.phone)?,
            city: required("city", self.city)?,
            pincode: required("pincode", self.pincode)?,
            food: required("food", self.food)?,
            category: match non_blank(self.category) {
                Some(raw) => FoodCategory::parse(&raw)?,
                None => FoodCategory::default(),
            },
            photo,
        })
    }

    /// Every supplied field must be non-empty; absent fields stay unchanged.
    pub fn into_changes(self, photo: Option<String>) -> Result<OrderChanges, OrderError> {
        Ok(OrderChanges {
            name: optional("name", self.name)?,
            phone: optional("phone", self.phone)?,
            city: optional("city", self.city)?,
            pincode: optional("pincode", self.pincode)?,
            food: optional("food", self.food)?,
            category: optional("category", self.category)?
                .map(|raw| FoodCategory::parse(&raw))
                .transpose()?,
            photo,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(field: &str, value: Option<String>) -> Result<String, OrderError> {
    non_blank(value).ok_or_else(|| OrderError::Validation(format!("Missing required field: {field}")))
}

fn optional(field: &str, value: Option<String>) -> Result<Option<String>, OrderError> {
    match value {
        None => Ok(None),
        Some(raw) => non_blank(Some(raw))
            .map(Some)
            .ok_or_else(|| OrderError::Validation(format!("Field {field} must not be empty"))),
    }
}
