use campuseats_common::{catalog, CategoryFilter, DeliveryLocation, FoodItem, MatchedRecommendation, View};
use campuseats_protocol::{Event, Op};
use chrono::{DateTime, Utc};

use crate::cart::Cart;
use crate::chat::ChatSession;
use crate::error::{CampusError, Result};
use crate::orders::OrderBook;

/// All application state. The UI reads from it and feeds it user
/// actions and concierge events; methods that start an AI call hand back
/// the `Op` to submit.
#[derive(Debug)]
pub struct Store {
    pub view: View,
    pub category: CategoryFilter,
    pub search: String,
    pub cart: Cart,
    pub orders: OrderBook,
    pub location: DeliveryLocation,
    pub recommendations: Vec<MatchedRecommendation>,
    pub chat: ChatSession,
    loading_recommendations: bool,
    detecting_location: bool,
}

impl Store {
    pub fn new(thread_chat_history: bool) -> Self {
        Self {
            view: View::Menu,
            category: CategoryFilter::All,
            search: String::new(),
            cart: Cart::new(),
            orders: OrderBook::new(),
            location: DeliveryLocation::default(),
            recommendations: Vec::new(),
            chat: ChatSession::new(thread_chat_history),
            loading_recommendations: false,
            detecting_location: false,
        }
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn visible_menu(&self) -> Vec<&'static FoodItem> {
        catalog::filter(catalog::catalog(), self.category, &self.search)
    }

    pub fn add_to_cart(&mut self, id: &str) -> Result<()> {
        let item = catalog::find(id).ok_or_else(|| CampusError::UnknownItem(id.to_string()))?;
        self.cart.add(item);
        Ok(())
    }

    /// Adds the `index`-th recommendation to the cart.
    pub fn quick_add(&mut self, index: usize) -> Result<()> {
        let id = self
            .recommendations
            .get(index)
            .map(|r| r.item.id.clone())
            .ok_or_else(|| CampusError::UnknownItem(format!("recommendation #{}", index + 1)))?;
        self.add_to_cart(&id)
    }

    pub fn update_quantity(&mut self, id: &str, delta: i32) {
        self.cart.update_quantity(id, delta);
    }

    /// Edits the address text only; detected coordinates and insight stay.
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.location.address = address.into();
    }

    /// Places an order and switches to the orders view. Returns the order id.
    pub fn checkout(&mut self, now: DateTime<Utc>) -> Result<String> {
        let id = self.orders.place(&mut self.cart, &self.location, now)?.id.clone();
        self.view = View::Orders;
        Ok(id)
    }

    pub fn request_recommendations(&mut self, mood: &str) -> Option<Op> {
        if mood.trim().is_empty() || self.loading_recommendations {
            return None;
        }
        self.loading_recommendations = true;
        Some(Op::Recommend { mood: mood.to_string() })
    }

    pub fn request_location(&mut self) -> Option<Op> {
        if self.detecting_location {
            return None;
        }
        self.detecting_location = true;
        Some(Op::DetectLocation)
    }

    pub fn send_chat(&mut self, input: &str) -> Option<Op> {
        let (message, history) = self.chat.submit(input)?;
        Some(Op::Chat { message, history })
    }

    pub fn apply(&mut self, event: Event) {
        match event {
            Event::RecommendationsReady { recommendations } => {
                self.recommendations = recommendations;
                self.loading_recommendations = false;
            }
            Event::LocationResolved { location } => {
                self.location = location;
                self.detecting_location = false;
            }
            Event::ChatReply { text } => self.chat.receive_reply(text),
            Event::ShutdownComplete => {}
        }
    }

    pub fn is_loading_recommendations(&self) -> bool {
        self.loading_recommendations
    }

    pub fn is_detecting_location(&self) -> bool {
        self.detecting_location
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(false)
    }
}
