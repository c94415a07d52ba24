use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{MenuItem, MenuItemCreate};
use super::actions::MenuAction;
use super::error::MenuError;

impl Entity for MenuItem {
    type Id = String;
    type CreateParams = MenuItemCreate;
    type Action = MenuAction;
    type ActionResult = MenuItem;
    type Rejection = MenuError;

    const KIND: &'static str = "menu_item";

    /// New dishes start out available.
    fn from_create_params(id: String, params: MenuItemCreate) -> Result<Self, MenuError> {
        ensure_price(params.price)?;
        Ok(Self {
            id,
            restaurant_id: params.restaurant_id,
            name: params.name,
            price: params.price,
            available: true,
        })
    }

    fn handle_action(&mut self, action: MenuAction) -> Result<MenuItem, MenuError> {
        match action {
            MenuAction::SetPrice(price) => {
                ensure_price(price)?;
                self.price = price;
            }
            MenuAction::SetAvailability(available) => self.available = available,
        }
        Ok(self.clone())
    }
}

fn ensure_price(price: Decimal) -> Result<(), MenuError> {
    if price < Decimal::ZERO {
        return Err(MenuError::InvalidPrice(price));
    }
    Ok(())
}
