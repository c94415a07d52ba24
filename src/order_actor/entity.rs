use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderStatus};
use super::error::OrderError;

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Action = (); // Orders are immutable once stored
    type ActionResult = ();
    type Rejection = OrderError;

    const KIND: &'static str = "order";

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// The order is initialized with status `Pending`.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        if params.menu_items.is_empty() {
            return Err(OrderError::ValidationError("order has no items".to_string()));
        }
        if params.total_amount < Decimal::ZERO {
            return Err(OrderError::ValidationError(format!("negative total {}", params.total_amount)));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            restaurant_id: params.restaurant_id,
            menu_items: params.menu_items,
            order_status: OrderStatus::Pending,
            payee_info: params.payee_info,
            delivery_address: params.delivery_address,
            delivery_method: params.delivery_method,
            payment_method: params.payment_method,
            total_amount: params.total_amount,
            created_at: params.created_at,
            checkout_key: params.checkout_key,
        })
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), OrderError> {
        Ok(())
    }
}
