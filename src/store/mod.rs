use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ClientError;
use crate::models::{Identified, Notification};

/// Uninhabited input for operations a resource does not support
/// client-side.
pub enum Unsupported {}

/// The use-case seam between a store and its backend service: one thin,
/// stateless adapter per resource kind.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    type Item: Identified + Clone + Send + Sync;
    type Filter: Send;
    type CreateInput: Send;
    type UpdateInput: Send;

    async fn list(&self, filter: Self::Filter) -> Result<Vec<Self::Item>, ClientError>;
    async fn create(&self, input: Self::CreateInput) -> Result<Self::Item, ClientError>;
    async fn update(&self, id: Uuid, input: Self::UpdateInput)
        -> Result<Self::Item, ClientError>;
}

struct StoreState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

/// Local authoritative copy of one backend-owned collection, with
/// loading/error bookkeeping. One instance per resource kind; no two
/// stores share entries.
///
/// No ordering is enforced across overlapping calls: whichever response
/// resolves last wins, and `loading` is not reference-counted.
pub struct ResourceStore<C: ResourceClient> {
    client: C,
    state: Mutex<StoreState<C::Item>>,
}

impl<C: ResourceClient> ResourceStore<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: Mutex::new(StoreState {
                items: Vec::new(),
                loading: false,
                error: None,
            }),
        }
    }

    pub fn items(&self) -> Vec<C::Item> {
        self.state().items.clone()
    }

    pub fn loading(&self) -> bool {
        self.state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Replace the collection wholesale from the backend. A failed fetch
    /// records an error and keeps the previous items.
    pub async fn fetch(&self, filter: C::Filter) {
        self.begin();
        let result = self.client.list(filter).await;
        let mut state = self.state();
        state.loading = false;
        match result {
            Ok(items) => state.items = items,
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    /// Create through the backend and append the server's representation.
    /// Failures are recorded and also returned so callers can react.
    pub async fn create(&self, input: C::CreateInput) -> Result<C::Item, ClientError> {
        self.begin();
        let result = self.client.create(input).await;
        let mut state = self.state();
        state.loading = false;
        match result {
            Ok(item) => {
                state.items.push(item.clone());
                Ok(item)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Update through the backend and replace the matching local entry
    /// with the returned representation. An id with no local entry leaves
    /// the collection untouched.
    pub async fn update(
        &self,
        id: Uuid,
        input: C::UpdateInput,
    ) -> Result<C::Item, ClientError> {
        self.begin();
        let result = self.client.update(id, input).await;
        let mut state = self.state();
        state.loading = false;
        match result {
            Ok(item) => {
                if let Some(slot) = state.items.iter_mut().find(|existing| existing.id() == id) {
                    *slot = item.clone();
                }
                Ok(item)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn begin(&self) {
        let mut state = self.state();
        state.loading = true;
        state.error = None;
    }

    fn state(&self) -> MutexGuard<'_, StoreState<C::Item>> {
        self.state.lock().expect("store state lock poisoned")
    }
}

/// Notification store: the generic store plus the derived unread counter
/// and the mark-read path.
pub struct NotificationStore<C>
where
    C: ResourceClient<Item = Notification, Filter = bool, UpdateInput = ()>,
{
    inner: ResourceStore<C>,
}

impl<C> NotificationStore<C>
where
    C: ResourceClient<Item = Notification, Filter = bool, UpdateInput = ()>,
{
    pub fn new(client: C) -> Self {
        Self {
            inner: ResourceStore::new(client),
        }
    }

    pub fn items(&self) -> Vec<Notification> {
        self.inner.items()
    }

    pub fn loading(&self) -> bool {
        self.inner.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.error()
    }

    /// Recomputed from the current collection on every access.
    pub fn unread_count(&self) -> usize {
        self.inner.items().iter().filter(|n| !n.read).count()
    }

    pub async fn fetch(&self, unread_only: bool) {
        self.inner.fetch(unread_only).await
    }

    /// Marks the notification read server-side and replaces the local
    /// entry with the returned representation.
    pub async fn mark_read(&self, id: Uuid) -> Result<Notification, ClientError> {
        self.inner.update(id, ()).await
    }
}
