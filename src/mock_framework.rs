//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_insert`] or [`expect_action`] to assert behavior
//! and script the store's answer (success, failure, or silence for timeouts).

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

type Responder<V, T> = oneshot::Sender<Result<V, FrameworkError<<T as Entity>::Rejection>>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends messages to a channel the test owns instead of a running
/// `ResourceActor`, so each answer can be chosen deterministically.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is an Insert request
pub async fn expect_insert<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::CreateParams, Responder<T::Id, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Insert { id, params, respond_to }) => Some((id, params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<Option<T>, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<(), T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountOpen};
    use crate::ledger_actor::LedgerError;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Account>(10);

        let insert_task = tokio::spawn(async move {
            client.insert("alice".to_string(), AccountOpen { opening_balance: dec!(5) }).await
        });

        let (id, params, responder) = expect_insert(&mut receiver).await.expect("Expected Insert request");
        assert_eq!(id, "alice");
        assert_eq!(params.opening_balance, dec!(5));
        responder
            .send(Err(FrameworkError::Rejected(LedgerError::InvalidAmount(dec!(5)))))
            .unwrap();

        let result = insert_task.await.unwrap();
        assert_eq!(result, Err(FrameworkError::Rejected(LedgerError::InvalidAmount(dec!(5)))));
    }
}
