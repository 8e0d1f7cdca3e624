use crate::{
    domain::JokeStore,
    errors::StoreError,
    models::{authors_match, Joke},
};
use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

/// Jokes held in process memory, in insertion order.
///
/// Each operation takes the lock once, so a duplicate check and its insert
/// cannot interleave with another writer.
#[derive(Debug, Default)]
pub struct InMemoryJokeStore {
    jokes: RwLock<Vec<Joke>>,
}

impl InMemoryJokeStore {
    pub fn new() -> Self {
        tracing::info!("Initializing InMemoryJokeStore");
        Self::default()
    }
}

#[async_trait]
impl JokeStore for InMemoryJokeStore {
    async fn insert(&self, joke: &Joke) -> Result<(), StoreError> {
        let mut jokes = self.jokes.write();
        if jokes.iter().any(|existing| existing.id == joke.id) {
            tracing::warn!(joke_id = %joke.id, "Memory: Rejecting insert of duplicate id");
            return Err(StoreError::DuplicateKey(joke.id));
        }
        jokes.push(joke.clone());
        tracing::debug!(joke_id = %joke.id, total = jokes.len(), "Memory: Joke inserted");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut jokes = self.jokes.write();
        let position = jokes
            .iter()
            .position(|joke| joke.id == id)
            .ok_or(StoreError::NotFound(id))?;
        // `remove` keeps the remaining jokes in insertion order.
        jokes.remove(position);
        tracing::debug!(joke_id = %id, total = jokes.len(), "Memory: Joke deleted");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Joke>, StoreError> {
        Ok(self.jokes.read().iter().find(|joke| joke.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Joke>, StoreError> {
        Ok(self.jokes.read().clone())
    }

    async fn list_by_author(&self, author: &str) -> Result<Vec<Joke>, StoreError> {
        Ok(self
            .jokes
            .read()
            .iter()
            .filter(|joke| authors_match(&joke.author, author))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.jokes.read().len())
    }
}
