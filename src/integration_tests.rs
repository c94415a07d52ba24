#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::actor_framework::{Entity, FrameworkError, ResourceActor, ResourceClient};
    use crate::app_system::FoodSystem;
    use crate::checkout::{AttemptStatus, CheckoutError, CheckoutPipeline};
    use crate::clients::{LedgerClient, MenuClient, OrderClient, TrackingClient};
    use crate::config::Config;
    use crate::domain::{
        Account, Cart, CartLine, CheckoutRequest, DeliveryAddress, MenuItem, MenuItemCreate, Order, OrderStatus,
        OrderTracking, PayeeInfo, PaymentMethod,
    };
    use crate::ledger_actor::{LedgerAction, LedgerActionResult};
    use crate::mock_framework::{create_mock_client, expect_action, expect_delete, expect_get, expect_insert};
    use crate::order_actor::OrderError;

    fn request(user_id: &str, key: &str, payment_method: PaymentMethod) -> CheckoutRequest {
        CheckoutRequest {
            user_id: user_id.to_string(),
            idempotency_key: key.to_string(),
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
            payment_method,
        }
    }

    fn cart_with(item_id: &str, unit_price: Decimal, quantity: u32) -> Cart {
        let mut cart = Cart::new();
        cart.add(CartLine::new("r1", item_id, "Beef Noodles", unit_price, quantity)).unwrap();
        cart
    }

    /// Running system with one dish (price 10) on restaurant r1 and an account for alice.
    async fn seeded_system(balance: Decimal) -> (FoodSystem, String) {
        let system = FoodSystem::new(&Config::default());
        let item_id = system
            .menu
            .add_item(MenuItemCreate::new("r1", "Beef Noodles", dec!(10)))
            .await
            .unwrap();
        system.ledger.open_account("alice".into(), balance).await.unwrap();
        (system, item_id)
    }

    fn spawn_keyed<T: Entity<Id = String>>() -> ResourceClient<T> {
        let (actor, client) = ResourceActor::<T>::keyed(16);
        tokio::spawn(actor.run());
        client
    }

    async fn balance_of(ledger: &LedgerClient, owner: &str) -> Decimal {
        ledger.get_balance(owner.to_string()).await.unwrap().balance
    }

    /// Waits until the attempt under `key` is no longer in progress.
    async fn settled_attempt(pipeline: &CheckoutPipeline, key: &str) -> AttemptStatus {
        for _ in 0..200 {
            match pipeline.attempt_status(key.to_string()).await.unwrap() {
                Some(AttemptStatus::InProgress) | None => tokio::time::sleep(Duration::from_millis(10)).await,
                Some(status) => return status,
            }
        }
        panic!("attempt {} never finished", key);
    }

    /// Real ledger (alice at 100), menu and attempt store; orders and tracking supplied by the test.
    async fn pipeline_with(
        orders: OrderClient,
        tracking: TrackingClient,
        step_timeout: Duration,
    ) -> (CheckoutPipeline, LedgerClient, String) {
        let (ledger_actor, ledger_inner) = ResourceActor::<Account>::keyed(16);
        tokio::spawn(ledger_actor.run());
        let ledger = LedgerClient::new(ledger_inner);
        ledger.open_account("alice".into(), dec!(100)).await.unwrap();

        let menu = MenuClient::new(spawn_menu());
        let item_id = menu.add_item(MenuItemCreate::new("r1", "Beef Noodles", dec!(10))).await.unwrap();

        let pipeline = CheckoutPipeline::new(ledger.clone(), menu, orders, tracking, spawn_keyed(), step_timeout);
        (pipeline, ledger, item_id)
    }

    #[tokio::test]
    async fn test_checkout_success_flow() {
        let (system, item_id) = seeded_system(dec!(100)).await;
        let mut cart = cart_with(&item_id, dec!(10), 2);

        let summary = system
            .checkout
            .checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance))
            .await
            .unwrap();

        assert_eq!(summary.total_amount, dec!(20));
        assert_eq!(summary.to_string(), "Order created, total price: 20");
        assert!(cart.is_empty());
        assert_eq!(balance_of(&system.ledger, "alice").await, dec!(80));

        let orders = system.orders.orders_for_user("alice".into()).await.unwrap();
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.id, summary.order_id);
        assert_eq!(order.restaurant_id, "r1");
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.total_amount, dec!(20));
        assert_eq!(order.menu_items[0].item_price, dec!(10));
        assert_eq!(order.menu_items[0].item_quantity, 2);
        assert_eq!(order.checkout_key, "key-1");

        let history = system.tracking.get_history(summary.order_id.clone()).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, OrderStatus::Pending);
        assert_eq!(history[0].update_time, order.created_at);

        assert_eq!(
            system.checkout.attempt_status("key-1".into()).await.unwrap(),
            Some(AttemptStatus::Completed(summary))
        );
        // A committed debit no longer holds its reference.
        let account = system.ledger.get_balance("alice".into()).await.unwrap();
        assert_eq!(account.debited_under("key-1"), None);
    }

    #[tokio::test]
    async fn test_insufficient_funds_changes_nothing() {
        let (system, item_id) = seeded_system(dec!(15)).await;
        let mut cart = cart_with(&item_id, dec!(10), 2);
        let before = cart.clone();

        let result = system
            .checkout
            .checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance))
            .await;

        assert_eq!(
            result,
            Err(CheckoutError::InsufficientFunds { required: dec!(20), available: dec!(15) })
        );
        assert_eq!(balance_of(&system.ledger, "alice").await, dec!(15));
        assert!(system.orders.orders_for_user("alice".into()).await.unwrap().is_empty());
        assert_eq!(cart, before);
        assert!(matches!(
            system.checkout.attempt_status("key-1".into()).await.unwrap(),
            Some(AttemptStatus::Failed(_))
        ));
    }

    #[tokio::test]
    async fn test_terminal_failures_are_reported_verbatim() {
        let (system, item_id) = seeded_system(dec!(100)).await;

        let mut empty = Cart::new();
        let result = system
            .checkout
            .checkout(&mut empty, request("alice", "key-empty", PaymentMethod::Balance))
            .await;
        assert_eq!(result, Err(CheckoutError::EmptyCart));

        let mut cart = cart_with(&item_id, dec!(10), 1);
        let result = system
            .checkout
            .checkout(&mut cart, request("alice", "key-paypal", PaymentMethod::Paypal))
            .await;
        assert_eq!(result, Err(CheckoutError::UnsupportedPaymentMethod("paypal".into())));
        assert!(!result.unwrap_err().is_retryable());

        system.menu.set_availability(item_id.clone(), false).await.unwrap();
        let result = system
            .checkout
            .checkout(&mut cart, request("alice", "key-sold-out", PaymentMethod::Balance))
            .await;
        assert_eq!(
            result,
            Err(CheckoutError::ItemUnavailable { restaurant_id: "r1".into(), item_id: item_id.clone() })
        );

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(balance_of(&system.ledger, "alice").await, dec!(100));
        assert!(system.orders.orders_for_user("alice".into()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_charges_catalog_price() {
        let (system, item_id) = seeded_system(dec!(100)).await;
        let mut cart = cart_with(&item_id, dec!(7), 2);
        assert_eq!(cart.compute_total(), dec!(14));

        let summary = system
            .checkout
            .checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance))
            .await
            .unwrap();

        assert_eq!(summary.total_amount, dec!(20));
        assert_eq!(balance_of(&system.ledger, "alice").await, dec!(80));
    }

    #[tokio::test]
    async fn test_oversized_catalog_price_fails_cleanly() {
        let (system, item_id) = seeded_system(dec!(100)).await;
        system.menu.set_price(item_id.clone(), Decimal::MAX).await.unwrap();
        let mut cart = cart_with(&item_id, dec!(10), 2);

        let result = system
            .checkout
            .checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance))
            .await;

        assert_eq!(result, Err(CheckoutError::Invalid("order total is too large".into())));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(balance_of(&system.ledger, "alice").await, dec!(100));
        assert!(matches!(
            system.checkout.attempt_status("key-1".into()).await.unwrap(),
            Some(AttemptStatus::Failed(_))
        ));
    }

    #[tokio::test]
    async fn test_same_key_never_charges_twice() {
        let (system, item_id) = seeded_system(dec!(100)).await;
        let mut cart = cart_with(&item_id, dec!(10), 2);

        let first = system
            .checkout
            .checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance))
            .await
            .unwrap();

        // The client retries with a refilled cart after losing the response.
        let mut retry_cart = cart_with(&item_id, dec!(10), 2);
        let second = system
            .checkout
            .checkout(&mut retry_cart, request("alice", "key-1", PaymentMethod::Balance))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(retry_cart.is_empty());
        assert_eq!(balance_of(&system.ledger, "alice").await, dec!(80));
        assert_eq!(system.orders.orders_for_user("alice".into()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_key_belongs_to_one_user() {
        let (system, item_id) = seeded_system(dec!(100)).await;
        system.ledger.open_account("bob".into(), dec!(100)).await.unwrap();

        let mut cart = cart_with(&item_id, dec!(10), 1);
        system
            .checkout
            .checkout(&mut cart, request("alice", "shared-key", PaymentMethod::Balance))
            .await
            .unwrap();

        let mut bob_cart = cart_with(&item_id, dec!(10), 1);
        let result = system
            .checkout
            .checkout(&mut bob_cart, request("bob", "shared-key", PaymentMethod::Balance))
            .await;

        assert_eq!(result, Err(CheckoutError::AttemptConflict("shared-key".into())));
        assert_eq!(bob_cart.lines().len(), 1);
        assert_eq!(balance_of(&system.ledger, "bob").await, dec!(100));
    }

    #[tokio::test]
    async fn test_failed_attempt_can_be_retried() {
        let (system, item_id) = seeded_system(dec!(15)).await;
        let mut cart = cart_with(&item_id, dec!(10), 2);

        let result = system
            .checkout
            .checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance))
            .await;
        assert!(matches!(result, Err(CheckoutError::InsufficientFunds { .. })));

        let card = system.recharge.issue(dec!(10), None).await.unwrap();
        system.recharge.redeem(card.code, "alice".into()).await.unwrap();

        let summary = system
            .checkout
            .checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance))
            .await
            .unwrap();
        assert_eq!(summary.total_amount, dec!(20));
        assert_eq!(balance_of(&system.ledger, "alice").await, dec!(5));
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_share_one_balance() {
        let (system, item_id) = seeded_system(dec!(30)).await;

        let mut tasks = Vec::new();
        for key in ["key-a", "key-b"] {
            let pipeline = system.checkout.clone();
            let mut cart = cart_with(&item_id, dec!(10), 2);
            tasks.push(tokio::spawn(async move {
                pipeline.checkout(&mut cart, request("alice", key, PaymentMethod::Balance)).await
            }));
        }

        let mut succeeded = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(err) => assert!(matches!(err, CheckoutError::InsufficientFunds { .. })),
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(balance_of(&system.ledger, "alice").await, dec!(10));
        assert_eq!(system.orders.orders_for_user("alice".into()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_order_queries() {
        let (system, item_id) = seeded_system(dec!(100)).await;

        let mut ids = Vec::new();
        for key in ["key-1", "key-2"] {
            let mut cart = cart_with(&item_id, dec!(10), 1);
            let summary = system
                .checkout
                .checkout(&mut cart, request("alice", key, PaymentMethod::Balance))
                .await
                .unwrap();
            ids.push(summary.order_id);
        }

        let orders = system.orders.orders_for_user("alice".into()).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders[0].created_at >= orders[1].created_at);

        let pending = system
            .orders
            .orders_for_user_with_status("alice".into(), OrderStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);
        let delivered = system
            .orders
            .orders_for_user_with_status("alice".into(), OrderStatus::Delivered)
            .await
            .unwrap();
        assert!(delivered.is_empty());

        let order = system.orders.get_order(ids[0].clone()).await.unwrap().unwrap();
        assert_eq!(order.user_id, "alice");
        assert_eq!(system.orders.get_order("missing".into()).await, Ok(None));
    }

    #[tokio::test]
    async fn test_rejected_order_refunds_debit() {
        let (ledger_actor, ledger_inner) = ResourceActor::<Account>::keyed(16);
        tokio::spawn(ledger_actor.run());
        let ledger = LedgerClient::new(ledger_inner);
        ledger.open_account("alice".into(), dec!(100)).await.unwrap();

        let menu = MenuClient::new(spawn_menu());
        let item_id = menu.add_item(MenuItemCreate::new("r1", "Beef Noodles", dec!(10))).await.unwrap();

        let (order_inner, mut order_rx) = create_mock_client::<Order>(10);
        let pipeline = CheckoutPipeline::new(
            ledger.clone(),
            menu,
            OrderClient::new(order_inner),
            TrackingClient::new(spawn_keyed::<OrderTracking>()),
            spawn_keyed(),
            Duration::from_secs(2),
        );

        let task = tokio::spawn(async move {
            let mut cart = cart_with(&item_id, dec!(10), 2);
            let result = pipeline.checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance)).await;
            (result, cart)
        });

        let (_order_id, params, responder) = expect_insert(&mut order_rx).await.expect("Expected Order Insert");
        assert_eq!(params.total_amount, dec!(20));
        responder
            .send(Err(FrameworkError::Rejected(OrderError::ValidationError("store refused".into()))))
            .unwrap();

        let (result, cart) = task.await.unwrap();
        assert_eq!(result, Err(CheckoutError::Invalid("store refused".into())));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(balance_of(&ledger, "alice").await, dec!(100));
        // A refused insert wrote nothing, so no delete is sent.
        assert!(order_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_order_timeout_deletes_and_refunds() {
        let (ledger_actor, ledger_inner) = ResourceActor::<Account>::keyed(16);
        tokio::spawn(ledger_actor.run());
        let ledger = LedgerClient::new(ledger_inner);
        ledger.open_account("alice".into(), dec!(100)).await.unwrap();

        let menu = MenuClient::new(spawn_menu());
        let item_id = menu.add_item(MenuItemCreate::new("r1", "Beef Noodles", dec!(10))).await.unwrap();

        let (order_inner, mut order_rx) = create_mock_client::<Order>(10);
        let pipeline = CheckoutPipeline::new(
            ledger.clone(),
            menu,
            OrderClient::new(order_inner),
            TrackingClient::new(spawn_keyed::<OrderTracking>()),
            spawn_keyed(),
            Duration::from_millis(50),
        );

        let task = tokio::spawn(async move {
            let mut cart = cart_with(&item_id, dec!(10), 2);
            let result = pipeline.checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance)).await;
            (result, cart)
        });

        // Hold the insert unanswered so the step times out.
        let (order_id, _params, pending) = expect_insert(&mut order_rx).await.expect("Expected Order Insert");

        let (deleted_id, responder) = expect_delete(&mut order_rx).await.expect("Expected Order Delete");
        assert_eq!(deleted_id, order_id);
        responder.send(Ok(())).unwrap();

        let (result, cart) = task.await.unwrap();
        assert_eq!(result, Err(CheckoutError::Timeout("order".into())));
        assert!(result.unwrap_err().is_retryable());
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(balance_of(&ledger, "alice").await, dec!(100));
        drop(pending);
    }

    #[tokio::test]
    async fn test_lost_debit_answer_is_refunded() {
        let (ledger_inner, mut ledger_rx) = create_mock_client::<Account>(10);
        let menu = MenuClient::new(spawn_menu());
        let item_id = menu.add_item(MenuItemCreate::new("r1", "Beef Noodles", dec!(10))).await.unwrap();
        let orders = OrderClient::new(spawn_keyed::<Order>());

        let pipeline = CheckoutPipeline::new(
            LedgerClient::new(ledger_inner),
            menu,
            orders.clone(),
            TrackingClient::new(spawn_keyed::<OrderTracking>()),
            spawn_keyed(),
            Duration::from_secs(2),
        );

        let task = tokio::spawn(async move {
            let mut cart = cart_with(&item_id, dec!(10), 2);
            pipeline.checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance)).await
        });

        // Validating reads the balance
        let (owner, responder) = expect_get(&mut ledger_rx).await.expect("Expected Account Get");
        assert_eq!(owner, "alice");
        responder.send(Ok(Some(Account::new("alice", dec!(100))))).unwrap();

        // The debit is received but its answer is lost
        let (owner, action, responder) = expect_action(&mut ledger_rx).await.expect("Expected Debit");
        assert_eq!(owner, "alice");
        match action {
            LedgerAction::Debit { amount, reference } => {
                assert_eq!(amount, dec!(20));
                assert_eq!(reference.as_deref(), Some("key-1"));
            }
            other => panic!("Unexpected action: {:?}", other),
        }
        drop(responder);

        // Compensation refunds by the attempt's key
        let (_, action, responder) = expect_action(&mut ledger_rx).await.expect("Expected Refund");
        match action {
            LedgerAction::Refund(reference) => assert_eq!(reference, "key-1"),
            other => panic!("Unexpected action: {:?}", other),
        }
        responder
            .send(Ok(LedgerActionResult::Refund { amount: dec!(20), balance: dec!(100) }))
            .unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(CheckoutError::StorageUnavailable(_))));
        assert!(result.unwrap_err().is_retryable());
        assert!(orders.orders_for_user("alice".into()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refused_tracking_deletes_order_and_refunds() {
        let orders = OrderClient::new(spawn_keyed::<Order>());
        let (tracking_inner, mut tracking_rx) = create_mock_client::<OrderTracking>(10);
        let (pipeline, ledger, item_id) =
            pipeline_with(orders.clone(), TrackingClient::new(tracking_inner), Duration::from_secs(2)).await;

        let task = tokio::spawn(async move {
            let mut cart = cart_with(&item_id, dec!(10), 2);
            let result = pipeline.checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance)).await;
            (result, cart)
        });

        let (order_id, params, responder) = expect_insert(&mut tracking_rx).await.expect("Expected Tracking Insert");
        assert_eq!(params.customer_id, "alice");
        assert_eq!(params.initial_status, OrderStatus::Pending);
        responder.send(Err(FrameworkError::AlreadyExists(order_id.clone()))).unwrap();

        let (result, cart) = task.await.unwrap();
        assert_eq!(result, Err(CheckoutError::DuplicateOrder(order_id.clone())));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(balance_of(&ledger, "alice").await, dec!(100));
        assert_eq!(orders.get_order(order_id).await, Ok(None));
        // The existing history is someone else's; it is left alone.
        assert!(tracking_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_tracking_timeout_undoes_whole_commit() {
        let orders = OrderClient::new(spawn_keyed::<Order>());
        let (tracking_inner, mut tracking_rx) = create_mock_client::<OrderTracking>(10);
        let (pipeline, ledger, item_id) =
            pipeline_with(orders.clone(), TrackingClient::new(tracking_inner), Duration::from_millis(50)).await;

        let task = tokio::spawn(async move {
            let mut cart = cart_with(&item_id, dec!(10), 2);
            let result = pipeline.checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance)).await;
            (result, cart)
        });

        let (order_id, _params, pending) = expect_insert(&mut tracking_rx).await.expect("Expected Tracking Insert");
        assert!(orders.get_order(order_id.clone()).await.unwrap().is_some());

        let (deleted_id, responder) = expect_delete(&mut tracking_rx).await.expect("Expected Tracking Delete");
        assert_eq!(deleted_id, order_id);
        responder.send(Ok(())).unwrap();

        let (result, cart) = task.await.unwrap();
        assert_eq!(result, Err(CheckoutError::Timeout("tracking".into())));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(balance_of(&ledger, "alice").await, dec!(100));
        assert_eq!(orders.get_order(order_id).await, Ok(None));
        drop(pending);
    }

    #[tokio::test]
    async fn test_abandoned_checkout_still_compensates() {
        let (order_inner, mut order_rx) = create_mock_client::<Order>(10);
        let (pipeline, ledger, item_id) = pipeline_with(
            OrderClient::new(order_inner),
            TrackingClient::new(spawn_keyed::<OrderTracking>()),
            Duration::from_millis(100),
        )
        .await;

        // The caller gives up while the order insert is unanswered.
        let mut cart = cart_with(&item_id, dec!(10), 2);
        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            pipeline.checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance)),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(cart.lines().len(), 1);

        let (order_id, _params, pending) = expect_insert(&mut order_rx).await.expect("Expected Order Insert");
        let (deleted_id, responder) = expect_delete(&mut order_rx).await.expect("Expected Order Delete");
        assert_eq!(deleted_id, order_id);
        responder.send(Ok(())).unwrap();

        assert!(matches!(settled_attempt(&pipeline, "key-1").await, AttemptStatus::Failed(_)));
        let account = ledger.get_balance("alice".into()).await.unwrap();
        assert_eq!(account.balance, dec!(100));
        assert_eq!(account.debited_under("key-1"), None);
        drop(pending);

        // The key is free to retry once the abandoned run has cleaned up.
        let retry = tokio::spawn({
            let pipeline = pipeline.clone();
            async move { pipeline.checkout(&mut cart, request("alice", "key-1", PaymentMethod::Balance)).await }
        });
        let (retry_id, _params, responder) = expect_insert(&mut order_rx).await.expect("Expected Order Insert");
        responder.send(Ok(retry_id.clone())).unwrap();
        let summary = retry.await.unwrap().unwrap();
        assert_eq!(summary.order_id, retry_id);
        assert_eq!(balance_of(&ledger, "alice").await, dec!(80));
    }

    #[tokio::test]
    async fn test_system_shutdown() {
        let (system, _item_id) = seeded_system(dec!(0)).await;
        assert!(system.shutdown().await.is_ok());
    }

    fn spawn_menu() -> ResourceClient<MenuItem> {
        let (actor, client) = ResourceActor::<MenuItem>::new(16, || uuid::Uuid::new_v4().to_string());
        tokio::spawn(actor.run());
        client
    }
}
