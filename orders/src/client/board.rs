use crate::model::{FoodCategory, Order, OrderRecord};

/// Category and free-text filter over already fetched orders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    /// Exact category match; `None` means all categories
    pub category: Option<FoodCategory>,
    /// Case-insensitive substring of food, customer name or city
    pub search: String,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if self.category.is_some_and(|category| category != order.category) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || [&order.food, &order.name, &order.city]
                .iter()
                .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

/// The client's local copy of the order list. Creations and deletions are
/// applied directly instead of re-fetching.
#[derive(Debug, Clone, Default)]
pub struct OrderBoard {
    orders: Vec<OrderRecord>,
}

impl OrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, orders: Vec<OrderRecord>) {
        self.orders = orders;
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&OrderRecord> {
        self.orders.iter().find(|record| record.order.id == id)
    }

    pub fn insert(&mut self, record: OrderRecord) {
        self.orders.push(record);
    }

    /// Swap in a newer copy of an order; returns false if it is not listed.
    pub fn replace(&mut self, record: OrderRecord) -> bool {
        match self.orders.iter_mut().find(|r| r.order.id == record.order.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<OrderRecord> {
        let index = self.orders.iter().position(|record| record.order.id == id)?;
        Some(self.orders.remove(index))
    }

    pub fn filter(&self, filter: &OrderFilter) -> Vec<&OrderRecord> {
        self.orders
            .iter()
            .filter(|record| filter.matches(&record.order))
            .collect()
    }
}
