use campuseats_common::{DeliveryLocation, Order, OrderStatus};
use chrono::{DateTime, Utc};

use crate::cart::Cart;
use crate::error::{CampusError, Result};

/// `ORD-` followed by nine uppercase alphanumerics.
pub fn new_order_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("ORD-{}", &raw[..9])
}

/// Append-only order history, newest first.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the cart into a new order. Totals and location are
    /// snapshotted here and never change afterwards.
    pub fn place(&mut self, cart: &mut Cart, location: &DeliveryLocation, now: DateTime<Utc>) -> Result<&Order> {
        if location.address.trim().is_empty() {
            return Err(CampusError::MissingAddress);
        }
        if cart.is_empty() {
            return Err(CampusError::EmptyCart);
        }

        let subtotal = cart.subtotal();
        let total = cart.total();
        let order = Order {
            id: new_order_id(),
            items: cart.take(),
            subtotal,
            total,
            status: OrderStatus::Preparing,
            created_at: now,
            location: location.clone(),
        };
        tracing::info!(
            "placed order {} ({} items, total {:.2}) to {}",
            order.id,
            order.items.len(),
            order.total,
            order.location.address
        );
        self.orders.insert(0, order);
        Ok(&self.orders[0])
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuseats_common::catalog;

    fn cart_with(ids: &[&str]) -> Cart {
        let mut cart = Cart::new();
        for id in ids {
            cart.add(catalog::find(id).unwrap());
        }
        cart
    }

    #[test]
    fn order_id_format() {
        let id = new_order_id();
        assert!(id.starts_with("ORD-"));
        let suffix = &id[4..];
        assert_eq!(suffix.len(), 9);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn checkout_moves_cart_into_order() {
        let mut book = OrderBook::new();
        let mut cart = cart_with(&["1", "1", "6"]);
        let location = DeliveryLocation::manual("Hostel Block C");
        let now = Utc::now();

        let order = book.place(&mut cart, &location, now).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.items.len(), 2);
        assert!((order.subtotal - 30.48).abs() < 1e-9);
        assert!((order.total - 32.004).abs() < 1e-9);
        assert_eq!(order.location.address, "Hostel Block C");
        assert_eq!(order.created_at, now);
        assert!(cart.is_empty());
    }

    #[test]
    fn blank_address_is_rejected_and_cart_kept() {
        let mut book = OrderBook::new();
        let mut cart = cart_with(&["2"]);
        let err = book
            .place(&mut cart, &DeliveryLocation::manual("   "), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CampusError::MissingAddress));
        assert_eq!(err.to_string(), "Please specify a delivery location first!");
        assert_eq!(cart.count(), 1);
        assert!(book.is_empty());
    }

    #[test]
    fn empty_cart_is_rejected() {
        let mut book = OrderBook::new();
        let err = book
            .place(&mut Cart::new(), &DeliveryLocation::manual("Library"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CampusError::EmptyCart));
    }

    #[test]
    fn newest_order_comes_first_and_old_orders_are_frozen() {
        let mut book = OrderBook::new();
        let location = DeliveryLocation::manual("Library");

        let mut cart = cart_with(&["5"]);
        let first_id = book.place(&mut cart, &location, Utc::now()).unwrap().id.clone();

        let mut cart = cart_with(&["3", "3"]);
        let second_id = book.place(&mut cart, &location, Utc::now()).unwrap().id.clone();

        assert_eq!(book.len(), 2);
        assert_eq!(book.orders()[0].id, second_id);
        assert_eq!(book.orders()[1].id, first_id);
        assert!((book.orders()[1].subtotal - 8.99).abs() < 1e-9);
    }
}
