use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait, actions and rejections)
// =============================================================================

/// Trait that any stored record must implement to be managed by [`ResourceActor`].
///
/// Every mutation beyond create/delete goes through [`Entity::handle_action`],
/// which runs inside the actor's mailbox loop. Requests for the same store are
/// therefore applied one at a time, which is what makes a check-then-write
/// (such as "debit if the balance covers it") atomic.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    /// Domain error returned when params or an action are refused.
    type Rejection: Clone + Send + Sync + Debug + Display + 'static;

    /// Short name used in log fields.
    const KIND: &'static str;

    /// Construct the full record from its id and creation parameters.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Rejection>;

    /// Apply a domain-specific mutation.
    ///
    /// The actor applies the action to a copy and only stores it on `Ok`, so a
    /// rejected action never leaves a half-applied record behind.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Rejection>;
}

// =============================================================================
// 2. ERRORS AND GENERIC MESSAGES
// =============================================================================

/// Failures of the storage layer itself, plus entity rejections passed through.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameworkError<R> {
    /// The actor's mailbox is closed.
    ActorClosed,
    /// The actor dropped the request without answering.
    ActorDropped,
    /// `create` was sent to a store that only accepts caller-chosen keys.
    NoIdGenerator,
    NotFound(String),
    AlreadyExists(String),
    Rejected(R),
}

impl<R: Display> Display for FrameworkError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameworkError::ActorClosed => write!(f, "Actor closed"),
            FrameworkError::ActorDropped => write!(f, "Actor dropped"),
            FrameworkError::NoIdGenerator => write!(f, "Store has no id generator"),
            FrameworkError::NotFound(id) => write!(f, "Item not found: {}", id),
            FrameworkError::AlreadyExists(id) => write!(f, "Item already exists: {}", id),
            FrameworkError::Rejected(reason) => write!(f, "{}", reason),
        }
    }
}

impl<R: Debug + Display> std::error::Error for FrameworkError<R> {}

pub type Response<V, R> = oneshot::Sender<Result<V, FrameworkError<R>>>;

/// Filter used by [`ResourceRequest::Find`].
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Rejection>,
    },
    Insert {
        id: T::Id,
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Rejection>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Rejection>,
    },
    Find {
        predicate: Predicate<T>,
        respond_to: Response<Vec<T>, T::Rejection>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Rejection>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Rejection>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Option<Box<dyn Fn() -> T::Id + Send + Sync>>,
}

impl<T: Entity> ResourceActor<T> {
    /// Store whose records get ids from `next_id_fn` on `create`.
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, Some(Box::new(next_id_fn)))
    }

    /// Store keyed by caller-chosen ids; only `insert` adds records.
    pub fn keyed(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, None)
    }

    fn build(
        buffer_size: usize,
        next_id_fn: Option<Box<dyn Fn() -> T::Id + Send + Sync>>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Main actor loop. Ends when every client has been dropped.
    #[instrument(name = "resource_actor", fields(kind = T::KIND), skip(self))]
    pub async fn run(mut self) {
        debug!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let result = match self.next_id_fn.as_ref().map(|next_id| next_id()) {
                        Some(id) => self.handle_insert(id, params),
                        None => Err(FrameworkError::NoIdGenerator),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Insert { id, params, respond_to } => {
                    let _ = respond_to.send(self.handle_insert(id, params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::Find { predicate, respond_to } => {
                    let found = self.store.values().filter(|item| predicate(item)).cloned().collect();
                    let _ = respond_to.send(Ok(found));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let result = match self.store.remove(&id) {
                        Some(_) => Ok(()),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
            }
        }
        debug!(records = self.store.len(), "Actor stopped");
    }

    fn handle_insert(&mut self, id: T::Id, params: T::CreateParams) -> Result<T::Id, FrameworkError<T::Rejection>> {
        if self.store.contains_key(&id) {
            debug!(id = %id, "Insert refused, key taken");
            return Err(FrameworkError::AlreadyExists(id.to_string()));
        }
        let item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        self.store.insert(id.clone(), item);
        Ok(id)
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError<T::Rejection>> {
        let Some(current) = self.store.get_mut(&id) else {
            return Err(FrameworkError::NotFound(id.to_string()));
        };
        let mut draft = current.clone();
        match draft.handle_action(action) {
            Ok(result) => {
                *current = draft;
                Ok(result)
            }
            Err(rejection) => {
                warn!(id = %id, reason = %rejection, "Action rejected");
                Err(FrameworkError::Rejected(rejection))
            }
        }
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Derive would demand `T: Clone` on the phantom side; the sender is all we copy.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<V>(
        &self,
        build: impl FnOnce(Response<V, T::Rejection>) -> ResourceRequest<T>,
    ) -> Result<V, FrameworkError<T::Rejection>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError<T::Rejection>> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn insert(&self, id: T::Id, params: T::CreateParams) -> Result<T::Id, FrameworkError<T::Rejection>> {
        self.request(|respond_to| ResourceRequest::Insert { id, params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Rejection>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn find(
        &self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<T>, FrameworkError<T::Rejection>> {
        let predicate: Predicate<T> = Box::new(predicate);
        self.request(|respond_to| ResourceRequest::Find { predicate, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError<T::Rejection>> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError<T::Rejection>> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
