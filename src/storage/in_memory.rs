//! In-memory implementation of CrmStore for testing and development
//!
//! Uses a single `RwLock` over the whole dataset, so every store call is
//! one transaction: a write guard spans all checks and inserts of a
//! mutation, and no partial state is ever observable. Reads under the same
//! lock get read-your-writes consistency within a request.

use crate::core::entity::{Customer, Order, OrderDetail, Product};
use crate::core::error::StorageError;
use crate::core::store::{CrmStore, NewCustomer, NewOrder, NewProduct};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct StoreState {
    customers: HashMap<i64, Customer>,
    products: HashMap<i64, Product>,
    orders: HashMap<i64, Order>,
    order_products: HashMap<i64, Vec<i64>>,
    customer_seq: i64,
    product_seq: i64,
    order_seq: i64,
}

impl StoreState {
    fn order_detail(&self, order: &Order) -> Result<OrderDetail, StorageError> {
        let customer = self
            .customers
            .get(&order.customer_id)
            .cloned()
            .ok_or(StorageError::MissingRow {
                entity_type: "Customer",
                id: order.customer_id,
            })?;
        let product_ids = self
            .order_products
            .get(&order.id)
            .cloned()
            .unwrap_or_default();
        let products = product_ids
            .iter()
            .filter_map(|id| self.products.get(id).cloned())
            .collect();
        Ok(OrderDetail {
            order: order.clone(),
            customer,
            products,
        })
    }
}

/// In-memory CRM store
///
/// Thread-safe via `RwLock`; clones share the same dataset.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreState>, StorageError> {
        self.state
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreState>, StorageError> {
        self.state
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }
}

fn sorted_by_id<T, F: Fn(&T) -> i64>(mut rows: Vec<T>, key: F) -> Vec<T> {
    rows.sort_by_key(|row| key(row));
    rows
}

#[async_trait]
impl CrmStore for InMemoryStore {
    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, StorageError> {
        let mut state = self.write()?;
        state.customer_seq += 1;
        let now = Utc::now();
        let customer = Customer {
            id: state.customer_seq,
            name: new.name,
            email: new.email,
            phone: new.phone,
            created_at: now,
            updated_at: now,
        };
        state.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn customer(&self, id: i64) -> Result<Option<Customer>, StorageError> {
        Ok(self.read()?.customers.get(&id).cloned())
    }

    async fn customers(&self) -> Result<Vec<Customer>, StorageError> {
        let rows = self.read()?.customers.values().cloned().collect();
        Ok(sorted_by_id(rows, |c: &Customer| c.id))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StorageError> {
        let needle = email.to_lowercase();
        Ok(self
            .read()?
            .customers
            .values()
            .any(|customer| customer.email.to_lowercase() == needle))
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, StorageError> {
        let mut state = self.write()?;
        state.product_seq += 1;
        let now = Utc::now();
        let product = Product {
            id: state.product_seq,
            name: new.name,
            price: new.price,
            stock: new.stock,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn product(&self, id: i64) -> Result<Option<Product>, StorageError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn products(&self) -> Result<Vec<Product>, StorageError> {
        let rows = self.read()?.products.values().cloned().collect();
        Ok(sorted_by_id(rows, |p: &Product| p.id))
    }

    async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, StorageError> {
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        let rows = self
            .read()?
            .products
            .values()
            .filter(|product| wanted.contains(&product.id))
            .cloned()
            .collect();
        Ok(sorted_by_id(rows, |p: &Product| p.id))
    }

    async fn products_below_stock(&self, threshold: i64) -> Result<Vec<Product>, StorageError> {
        let rows = self
            .read()?
            .products
            .values()
            .filter(|product| product.stock < threshold)
            .cloned()
            .collect();
        Ok(sorted_by_id(rows, |p: &Product| p.id))
    }

    async fn save_product(&self, mut product: Product) -> Result<Product, StorageError> {
        let mut state = self.write()?;
        if !state.products.contains_key(&product.id) {
            return Err(StorageError::MissingRow {
                entity_type: "Product",
                id: product.id,
            });
        }
        product.updated_at = Utc::now();
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn create_order(&self, new: NewOrder) -> Result<OrderDetail, StorageError> {
        // One write guard = one transaction. All referential checks happen
        // before the first insert, so a failure leaves nothing behind.
        let mut state = self.write()?;

        let customer = state
            .customers
            .get(&new.customer_id)
            .cloned()
            .ok_or(StorageError::MissingRow {
                entity_type: "Customer",
                id: new.customer_id,
            })?;

        let mut products = Vec::with_capacity(new.product_ids.len());
        for id in &new.product_ids {
            let product = state
                .products
                .get(id)
                .cloned()
                .ok_or(StorageError::MissingRow {
                    entity_type: "Product",
                    id: *id,
                })?;
            products.push(product);
        }

        let total: Decimal = products.iter().map(|product| product.price).sum();

        state.order_seq += 1;
        let now = Utc::now();
        let order = Order {
            id: state.order_seq,
            customer_id: customer.id,
            order_date: new.order_date,
            total_amount: total,
            created_at: now,
            updated_at: now,
        };
        state.orders.insert(order.id, order.clone());
        state.order_products.insert(order.id, new.product_ids.clone());

        Ok(OrderDetail {
            order,
            customer,
            products,
        })
    }

    async fn order_with_relations(&self, id: i64) -> Result<Option<OrderDetail>, StorageError> {
        let state = self.read()?;
        match state.orders.get(&id) {
            Some(order) => Ok(Some(state.order_detail(order)?)),
            None => Ok(None),
        }
    }

    async fn orders_with_relations(&self) -> Result<Vec<OrderDetail>, StorageError> {
        let state = self.read()?;
        let mut orders: Vec<&Order> = state.orders.values().collect();
        orders.sort_by_key(|order| order.id);
        orders
            .into_iter()
            .map(|order| state.order_detail(order))
            .collect()
    }

    async fn recalculate_order_total(&self, order_id: i64) -> Result<Order, StorageError> {
        let mut state = self.write()?;
        let product_ids = state
            .order_products
            .get(&order_id)
            .cloned()
            .unwrap_or_default();
        let total: Decimal = product_ids
            .iter()
            .filter_map(|id| state.products.get(id))
            .map(|product| product.price)
            .sum();

        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or(StorageError::MissingRow {
                entity_type: "Order",
                id: order_id,
            })?;
        order.total_amount = total;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            name: "Alice".to_string(),
            email: email.to_string(),
            phone: String::new(),
        }
    }

    fn new_product(name: &str, price: Decimal, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price,
            stock,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_customer() {
        let store = InMemoryStore::new();
        let created = store
            .create_customer(new_customer("alice@example.com"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let fetched = store.customer(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = InMemoryStore::new();
        let first = store
            .create_customer(new_customer("a@example.com"))
            .await
            .unwrap();
        let second = store
            .create_customer(new_customer("b@example.com"))
            .await
            .unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn test_email_exists_is_case_insensitive() {
        let store = InMemoryStore::new();
        store
            .create_customer(new_customer("Alice@Example.com"))
            .await
            .unwrap();
        assert!(store.email_exists("alice@example.COM").await.unwrap());
        assert!(!store.email_exists("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_products_below_stock_is_strict() {
        let store = InMemoryStore::new();
        store
            .create_product(new_product("a", Decimal::ONE, 9))
            .await
            .unwrap();
        store
            .create_product(new_product("b", Decimal::ONE, 10))
            .await
            .unwrap();

        let low = store.products_below_stock(10).await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "a");
    }

    #[tokio::test]
    async fn test_create_order_snapshots_total() {
        let store = InMemoryStore::new();
        let customer = store
            .create_customer(new_customer("alice@example.com"))
            .await
            .unwrap();
        let p1 = store
            .create_product(new_product("widget", Decimal::new(1000, 2), 5))
            .await
            .unwrap();
        let p2 = store
            .create_product(new_product("gadget", Decimal::new(500, 2), 5))
            .await
            .unwrap();

        let detail = store
            .create_order(NewOrder {
                customer_id: customer.id,
                product_ids: vec![p1.id, p2.id],
                order_date: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(detail.order.total_amount, Decimal::new(1500, 2));
        assert_eq!(detail.products.len(), 2);

        // Later price changes must not move the snapshot.
        let mut updated = p1.clone();
        updated.price = Decimal::new(9900, 2);
        store.save_product(updated).await.unwrap();

        let refetched = store
            .order_with_relations(detail.order.id)
            .await
            .unwrap()
            .expect("order exists");
        assert_eq!(refetched.order.total_amount, Decimal::new(1500, 2));
    }

    #[tokio::test]
    async fn test_create_order_missing_product_persists_nothing() {
        let store = InMemoryStore::new();
        let customer = store
            .create_customer(new_customer("alice@example.com"))
            .await
            .unwrap();

        let result = store
            .create_order(NewOrder {
                customer_id: customer.id,
                product_ids: vec![999],
                order_date: Utc::now(),
            })
            .await;
        assert!(result.is_err());
        assert!(store.orders_with_relations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recalculate_order_total_uses_current_prices() {
        let store = InMemoryStore::new();
        let customer = store
            .create_customer(new_customer("alice@example.com"))
            .await
            .unwrap();
        let product = store
            .create_product(new_product("widget", Decimal::new(1000, 2), 5))
            .await
            .unwrap();

        let detail = store
            .create_order(NewOrder {
                customer_id: customer.id,
                product_ids: vec![product.id],
                order_date: Utc::now(),
            })
            .await
            .unwrap();

        let mut updated = product.clone();
        updated.price = Decimal::new(2500, 2);
        store.save_product(updated).await.unwrap();

        let order = store
            .recalculate_order_total(detail.order.id)
            .await
            .unwrap();
        assert_eq!(order.total_amount, Decimal::new(2500, 2));
    }

    #[tokio::test]
    async fn test_save_product_unknown_row_fails() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let ghost = Product {
            id: 42,
            name: "ghost".to_string(),
            price: Decimal::ONE,
            stock: 0,
            created_at: now,
            updated_at: now,
        };
        assert!(store.save_product(ghost).await.is_err());
    }
}
