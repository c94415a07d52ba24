use anyhow::Context;
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use food_orders::app_system::{setup_tracing, FoodSystem};
use food_orders::config::Config;
use food_orders::domain::{
    Cart, CartLine, CheckoutRequest, DeliveryAddress, MenuItemCreate, OrderStatus, PayeeInfo, PaymentMethod,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_filter);

    info!("Starting food ordering system");
    let system = FoodSystem::new(&config);

    // Menu for one restaurant
    let noodles = system
        .menu
        .add_item(MenuItemCreate::new("golden_dragon", "Beef Noodles", Decimal::new(1200, 2)))
        .await?;
    system
        .menu
        .add_item(MenuItemCreate::new("golden_dragon", "Jasmine Tea", Decimal::new(350, 2)))
        .await?;

    // Alice signs up and tops up with a recharge card
    system.ledger.open_account("alice".to_string(), Decimal::ZERO).await?;
    let card = system
        .recharge
        .issue(Decimal::new(50, 0), Some("admin".to_string()))
        .await?;
    info!(code = %card.code, value = %card.value, "Recharge card issued");
    let balance = system.recharge.redeem(card.code.clone(), "alice".to_string()).await?;
    info!(%balance, "Recharge card redeemed");

    // Fill the cart from the menu
    let mut cart = Cart::new();
    for item in system.menu.restaurant_menu("golden_dragon".to_string()).await? {
        let quantity = if item.id == noodles { 2 } else { 1 };
        cart.add(CartLine::new(item.restaurant_id, item.id, item.name, item.price, quantity))?;
    }
    info!(lines = cart.lines().len(), total = %cart.compute_total(), "Cart ready");

    let request = CheckoutRequest {
        user_id: "alice".to_string(),
        idempotency_key: uuid::Uuid::new_v4().to_string(),
        payee_info: PayeeInfo {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            phone: "555-0100".to_string(),
        },
        delivery_address: DeliveryAddress {
            address: "1 Rabbit Hole".to_string(),
            region: "Oxfordshire".to_string(),
            country: "UK".to_string(),
        },
        delivery_method: "standard".to_string(),
        payment_method: "balance".parse::<PaymentMethod>().map_err(anyhow::Error::msg)?,
    };

    let span = tracing::info_span!("checkout_processing");
    let checkout_result = async {
        info!("Processing checkout");
        system.checkout.checkout(&mut cart, request).await
    }
    .instrument(span)
    .await;

    match checkout_result {
        Ok(summary) => {
            info!(order_id = %summary.order_id, "{}", summary);
            system
                .tracking
                .append_status(summary.order_id.clone(), OrderStatus::Preparing)
                .await?;
            for entry in system.tracking.get_history(summary.order_id.clone()).await? {
                info!(status = %entry.status, at = %entry.update_time, "Tracking");
            }
        }
        Err(e) => error!(error = %e, retryable = e.is_retryable(), "Checkout failed"),
    }

    let account = system.ledger.get_balance("alice".to_string()).await?;
    info!(balance = %account.balance, "Final balance");

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
