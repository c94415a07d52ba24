use rust_decimal::Decimal;
use thiserror::Error;

/// One item in a session cart. `unit_price` is the price seen when the item
/// was added and is only used for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub restaurant_id: String,
    pub item_id: String,
    pub item_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(
        restaurant_id: impl Into<String>,
        item_id: impl Into<String>,
        item_name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            item_id: item_id.into(),
            item_name: item_name.into(),
            unit_price,
            quantity,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Item {0} is not in the cart")]
    NotFound(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Cart total too large")]
    TotalOverflow,
}

/// Per-session scratch state. Owned by the session and passed explicitly to
/// the checkout pipeline; nothing else holds it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line, merging into an existing line with the same item id.
    ///
    /// Returns the item's quantity after the add.
    pub fn add(&mut self, line: CartLine) -> Result<u32, CartError> {
        if line.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        let mut lines = self.lines.clone();
        let quantity = match lines.iter_mut().find(|existing| existing.item_id == line.item_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(CartError::InvalidQuantity(line.quantity))?;
                existing.quantity
            }
            None => {
                let quantity = line.quantity;
                lines.push(line);
                quantity
            }
        };
        checked_total(&lines).ok_or(CartError::TotalOverflow)?;
        self.lines = lines;
        Ok(quantity)
    }

    /// Removes the line for `item_id` and returns its name.
    pub fn remove(&mut self, item_id: &str) -> Result<String, CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.item_id == item_id)
            .ok_or_else(|| CartError::NotFound(item_id.to_string()))?;
        Ok(self.lines.remove(index).item_name)
    }

    /// Display total from the snapshot prices. Checkout reprices from the catalog.
    pub fn compute_total(&self) -> Decimal {
        // `add` refuses lines whose total would not fit.
        checked_total(&self.lines).unwrap_or(Decimal::MAX)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

fn checked_total(lines: &[CartLine]) -> Option<Decimal> {
    lines.iter().try_fold(Decimal::ZERO, |total, line| {
        line.unit_price
            .checked_mul(Decimal::from(line.quantity))
            .and_then(|subtotal| total.checked_add(subtotal))
    })
}
