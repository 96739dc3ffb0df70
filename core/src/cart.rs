use campuseats_common::{CartItem, FoodItem};

/// Service fee applied on top of the subtotal at checkout. Delivery is free.
pub const SERVICE_FEE_RATE: f64 = 0.05;

pub fn with_service_fee(subtotal: f64) -> f64 {
    subtotal * (1.0 + SERVICE_FEE_RATE)
}

/// `$12.99`
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Lines are kept in the order they were first added. Every line has
/// quantity >= 1.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: &FoodItem) {
        match self.lines.iter_mut().find(|l| l.item.id == item.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartItem {
                item: item.clone(),
                quantity: 1,
            }),
        }
    }

    /// Adjusts a line by `delta`, clamping at zero and dropping empty
    /// lines. Returns the new quantity, or `None` if the id is not in
    /// the cart.
    pub fn update_quantity(&mut self, id: &str, delta: i32) -> Option<u32> {
        let idx = self.lines.iter().position(|l| l.item.id == id)?;
        let current = i64::from(self.lines[idx].quantity);
        let next = (current + i64::from(delta)).clamp(0, i64::from(u32::MAX)) as u32;
        if next == 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = next;
        }
        Some(next)
    }

    pub fn lines(&self) -> &[CartItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartItem::line_total).sum()
    }

    pub fn total(&self) -> f64 {
        with_service_fee(self.subtotal())
    }

    /// Number of units across all lines.
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Empties the cart, returning its lines.
    pub fn take(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.lines)
    }
}
