use crate::model::{GenericError, NewOrder, Order, OrderChanges};
use crate::storage::OrderStorage;
use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

/// Process-local store with the same id scheme as the MongoDB one.
#[derive(Default)]
pub struct InMemoryOrderStorage {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: RwLock::new(orders),
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderStorage for InMemoryOrderStorage {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, GenericError> {
        let now = Utc::now();
        let order = Order {
            id: ObjectId::new().to_hex(),
            name: order.name,
            phone: order.phone,
            city: order.city,
            pincode: order.pincode,
            food: order.food,
            category: order.category,
            photo: order.photo,
            created_at: now,
            updated_at: now,
        };
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, GenericError> {
        Ok(self.orders.read().await.clone())
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>, GenericError> {
        Ok(self.orders.read().await.iter().find(|o| o.id == id).cloned())
    }

    async fn update_order(&self, id: &str, changes: &OrderChanges) -> Result<Option<Order>, GenericError> {
        let mut orders = self.orders.write().await;
        Ok(orders.iter_mut().find(|o| o.id == id).map(|order| {
            changes.apply_to(order, Utc::now());
            order.clone()
        }))
    }

    async fn delete_order(&self, id: &str) -> Result<Option<Order>, GenericError> {
        let mut orders = self.orders.write().await;
        let Some(index) = orders.iter().position(|o| o.id == id) else {
            return Ok(None);
        };
        Ok(Some(orders.remove(index)))
    }
}
