use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{MenuItem, MenuItemCreate};
use crate::menu_actor::{MenuAction, MenuError};

/// Client for the menu catalog.
#[derive(Clone)]
pub struct MenuClient {
    inner: ResourceClient<MenuItem>,
}

crate::impl_basic_client!(MenuClient, MenuItem, MenuError, menu_item);

impl MenuClient {
    #[instrument(skip(self))]
    pub async fn add_item(&self, item: MenuItemCreate) -> Result<String, MenuError> {
        debug!("Sending request");
        Ok(self.inner.create(item).await?)
    }

    /// Authoritative price of `item_id` on `restaurant_id`'s menu.
    ///
    /// `None` when the item is unknown, belongs to another restaurant, or is
    /// currently unavailable.
    #[instrument(skip(self))]
    pub async fn find_price(&self, restaurant_id: String, item_id: String) -> Result<Option<Decimal>, MenuError> {
        debug!("Sending request");
        let price = self
            .inner
            .get(item_id)
            .await?
            .filter(|item| item.restaurant_id == restaurant_id && item.available)
            .map(|item| item.price);
        Ok(price)
    }

    #[instrument(skip(self))]
    pub async fn set_price(&self, item_id: String, price: Decimal) -> Result<MenuItem, MenuError> {
        debug!("Sending request");
        Ok(self.inner.perform_action(item_id, MenuAction::SetPrice(price)).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_availability(&self, item_id: String, available: bool) -> Result<MenuItem, MenuError> {
        debug!("Sending request");
        Ok(self.inner.perform_action(item_id, MenuAction::SetAvailability(available)).await?)
    }

    /// A restaurant's menu sorted by dish name.
    #[instrument(skip(self))]
    pub async fn restaurant_menu(&self, restaurant_id: String) -> Result<Vec<MenuItem>, MenuError> {
        debug!("Sending request");
        let mut items = self.inner.find(move |item: &MenuItem| item.restaurant_id == restaurant_id).await?;
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}
