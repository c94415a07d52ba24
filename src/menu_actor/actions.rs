use rust_decimal::Decimal;

/// Catalog maintenance actions for MenuItem entities.
#[derive(Debug, Clone)]
pub enum MenuAction {
    SetPrice(Decimal),
    SetAvailability(bool),
}
