use crate::errors::StoreError;
use crate::models::Joke;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence contract for jokes.
///
/// Every operation is atomic on its own; nothing spans multiple calls.
#[async_trait]
pub trait JokeStore: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Adds a joke. Fails with `DuplicateKey` if the id is already live.
    async fn insert(&self, joke: &Joke) -> Result<(), StoreError>;

    /// Removes a joke. Fails with `NotFound` if no joke has that id.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Returns Ok(None) if the joke is not found.
    async fn get(&self, id: Uuid) -> Result<Option<Joke>, StoreError>;

    /// Lists every live joke in a stable iteration order.
    async fn list_all(&self) -> Result<Vec<Joke>, StoreError>;

    /// Jokes whose author matches case-insensitively. Empty when none match.
    async fn list_by_author(&self, author: &str) -> Result<Vec<Joke>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

/// Source of ids for newly created jokes.
pub trait IdGenerator: Send + Sync + 'static {
    fn next_id(&self) -> Uuid;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
