use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Order, OrderCreate, OrderStatus};
use crate::order_actor::OrderError;

/// Client for the order store.
///
/// Orders are placed under ids chosen by the caller so a placement whose answer
/// was lost can still be found and undone.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

crate::impl_basic_client!(OrderClient, Order, OrderError, order);

impl OrderClient {
    #[instrument(skip(self, order), fields(user_id = %order.user_id, total = %order.total_amount))]
    pub async fn place_order(&self, id: String, order: OrderCreate) -> Result<String, OrderError> {
        debug!("Sending request");
        let id = self.inner.insert(id, order).await?;
        info!("Order stored");
        Ok(id)
    }

    /// All of a user's orders, newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: String) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        let orders = self.inner.find(move |order: &Order| order.user_id == user_id).await?;
        Ok(newest_first(orders))
    }

    /// A user's orders created with `status`, newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_user_with_status(
        &self,
        user_id: String,
        status: OrderStatus,
    ) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        let orders = self
            .inner
            .find(move |order: &Order| order.user_id == user_id && order.order_status == status)
            .await?;
        Ok(newest_first(orders))
    }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    orders
}
