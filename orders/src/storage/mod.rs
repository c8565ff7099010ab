pub mod in_memory;
pub mod mongo;

pub use in_memory::InMemoryOrderStorage;
pub use mongo::MongoOrderStorage;

use crate::model::{GenericError, NewOrder, Order, OrderChanges};
use async_trait::async_trait;

/// Persistence seam for orders. A missing record is `Ok(None)`, never an error.
#[async_trait]
pub trait OrderStorage: Send + Sync {
    /// Persist a new order; the store assigns the id and timestamps
    async fn insert_order(&self, order: NewOrder) -> Result<Order, GenericError>;

    /// All orders, in insertion order
    async fn list_orders(&self) -> Result<Vec<Order>, GenericError>;

    async fn get_order(&self, id: &str) -> Result<Option<Order>, GenericError>;

    /// Apply `changes` and return the updated order
    async fn update_order(
        &self,
        id: &str,
        changes: &OrderChanges,
    ) -> Result<Option<Order>, GenericError>;

    /// Remove the order and return what was removed
    async fn delete_order(&self, id: &str) -> Result<Option<Order>, GenericError>;
}
