//! In-memory entity repositories
//!
//! A keyed store per entity type. Records are inserted whole under the write
//! lock, so a concurrent `list` observes either the complete record or none
//! of it. Iteration order is unspecified.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::ids::{generate_id, PRODUCT_PREFIX, USER_PREFIX};
use crate::models::{Product, ProductCreate, User, UserCreate};

/// A record type that can live in an `InMemoryRepository`
pub trait Entity: Clone + Send + Sync + 'static {
    /// Creation payload
    type Create: Send;

    /// Identifier prefix distinguishing this entity's namespace
    const PREFIX: &'static str;

    /// Human-readable name used in logs and not-found messages
    const KIND: &'static str;

    fn build(id: String, payload: Self::Create) -> Self;

    fn id(&self) -> &str;
}

impl Entity for User {
    type Create = UserCreate;
    const PREFIX: &'static str = USER_PREFIX;
    const KIND: &'static str = "User";

    fn build(id: String, payload: UserCreate) -> Self {
        User::from_payload(id, payload)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Product {
    type Create = ProductCreate;
    const PREFIX: &'static str = PRODUCT_PREFIX;
    const KIND: &'static str = "Product";

    fn build(id: String, payload: ProductCreate) -> Self {
        Product::from_payload(id, payload)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Shared in-memory store; clones point at the same map
pub struct InMemoryRepository<T: Entity> {
    store: Arc<RwLock<HashMap<String, T>>>,
}

pub type UserRepository = InMemoryRepository<User>;
pub type ProductRepository = InMemoryRepository<Product>;

impl<T: Entity> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store a new record under a freshly generated identifier
    pub async fn create(&self, payload: T::Create) -> T {
        let record = T::build(generate_id(T::PREFIX), payload);
        self.store
            .write()
            .insert(record.id().to_string(), record.clone());

        tracing::info!(id = %record.id(), "created {}", T::KIND.to_lowercase());
        record
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.store.read().get(id).cloned()
    }

    pub async fn list_all(&self) -> Vec<T> {
        self.store.read().values().cloned().collect()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.store.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
