use rust_decimal::Decimal;

/// A dish on a restaurant's menu. The catalog's price is authoritative for
/// checkout; cart snapshots are not.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub price: Decimal,
    pub available: bool,
}

/// Payload for adding a dish to a menu.
#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub restaurant_id: String,
    pub name: String,
    pub price: Decimal,
}

impl MenuItemCreate {
    pub fn new(restaurant_id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            name: name.into(),
            price,
        }
    }
}
