use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Burgers,
    Pizza,
    Sushi,
    Salads,
    Desserts,
    Drinks,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Burgers,
        Category::Pizza,
        Category::Sushi,
        Category::Salads,
        Category::Desserts,
        Category::Drinks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Burgers => "Burgers",
            Category::Pizza => "Pizza",
            Category::Sushi => "Sushi",
            Category::Salads => "Salads",
            Category::Desserts => "Desserts",
            Category::Drinks => "Drinks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selector used by the menu: `All` or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// `All` first, then every category in catalog order.
    pub fn options() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.iter().copied().map(CategoryFilter::Only))
            .collect()
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.as_str(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .map(|c| CategoryFilter::Only(*c))
            .ok_or_else(|| anyhow::anyhow!("unknown category: {wanted}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub image: String,
    pub calories: u32,
    pub rating: f32,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub item: FoodItem,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.item.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLocation {
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub insight: Option<String>,
}

impl DeliveryLocation {
    pub fn manual(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Preparing,
    OutForDelivery,
    Delivered,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub items: Vec<CartItem>,
    pub subtotal: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub location: DeliveryLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum View {
    #[default]
    Menu,
    Cart,
    Orders,
    Chat,
    Contact,
}

impl View {
    pub const ALL: [View; 5] = [View::Menu, View::Cart, View::Orders, View::Chat, View::Contact];

    pub fn title(&self) -> &'static str {
        match self {
            View::Menu => "Menu",
            View::Cart => "Cart",
            View::Orders => "My Orders",
            View::Chat => "Smart Assistant",
            View::Contact => "Contact",
        }
    }

    pub fn next(&self) -> View {
        let idx = Self::ALL.iter().position(|v| v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> View {
        let idx = Self::ALL.iter().position(|v| v == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A single suggestion as the model returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "foodId")]
    pub food_id: String,
    pub reason: String,
}

/// A recommendation resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRecommendation {
    pub item: FoodItem,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Bot, text: text.into() }
    }
}
