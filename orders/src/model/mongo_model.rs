use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime as BsonDateTime, Document, doc};
use serde::{Deserialize, Serialize};

use crate::model::{FoodCategory, NewOrder, Order, OrderChanges};

pub fn bson_datetime(dt: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(dt.timestamp_millis())
}

fn chrono_datetime(dt: BsonDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub phone: String,
    pub city: String,
    pub pincode: String,
    pub food: String,
    #[serde(default)]
    pub category: FoodCategory,
    pub photo: String,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl OrderDocument {
    pub fn from_new(order: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            name: order.name,
            phone: order.phone,
            city: order.city,
            pincode: order.pincode,
            food: order.food,
            category: order.category,
            photo: order.photo,
            created_at: bson_datetime(now),
            updated_at: bson_datetime(now),
        }
    }
}

impl From<OrderDocument> for Order {
    fn from(document: OrderDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            name: document.name,
            phone: document.phone,
            city: document.city,
            pincode: document.pincode,
            food: document.food,
            category: document.category,
            photo: document.photo,
            created_at: chrono_datetime(document.created_at),
            updated_at: chrono_datetime(document.updated_at),
        }
    }
}

/// `$set` body for a partial update; `updatedAt` is always refreshed.
pub fn set_document(changes: &OrderChanges, now: DateTime<Utc>) -> Document {
    let mut set = doc! { "updatedAt": bson_datetime(now) };

    let text_fields = [
        ("name", &changes.name),
        ("phone", &changes.phone),
        ("city", &changes.city),
        ("pincode", &changes.pincode),
        ("food", &changes.food),
        ("photo", &changes.photo),
    ];
    for (key, value) in text_fields {
        if let Some(value) = value {
            set.insert(key, value.as_str());
        }
    }
    if let Some(category) = changes.category {
        set.insert("category", category.to_string());
    }

    doc! { "$set": set }
}
