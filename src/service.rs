use crate::{
    domain::{IdGenerator, JokeStore, UuidV4Generator},
    errors::{JokeError, StoreError},
    models::{Joke, NewJoke},
};
use chrono::Utc;
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Business rules for jokes on top of a [`JokeStore`].
///
/// The random source and the id generator are injected so that random picks
/// and id collisions can be reproduced in tests.
pub struct JokeService {
    store: Arc<dyn JokeStore>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    ids: Arc<dyn IdGenerator>,
}

impl JokeService {
    /// Service with an OS-seeded random source and UUID v4 ids.
    pub fn new(store: Arc<dyn JokeStore>) -> Self {
        Self::with_rng(store, StdRng::from_os_rng())
    }

    pub fn with_seed(store: Arc<dyn JokeStore>, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(store: Arc<dyn JokeStore>, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            store,
            rng: Mutex::new(Box::new(rng)),
            ids: Arc::new(UuidV4Generator),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Validates the draft, assigns a fresh id and timestamp, and stores it.
    #[instrument(skip_all)]
    pub async fn create(&self, draft: Option<NewJoke>) -> Result<Joke, JokeError> {
        let draft = draft.ok_or_else(|| JokeError::InvalidInput("joke is required".to_string()))?;
        let text = required_field("text", draft.text)?;
        let author = required_field("author", draft.author)?;

        if let Some(client_id) = draft.id {
            debug!(%client_id, "Ignoring client-supplied joke id");
        }

        let joke = Joke {
            id: self.ids.next_id(),
            text,
            author,
            created_at: Utc::now(),
        };

        self.store.insert(&joke).await.inspect_err(|e| {
            if let StoreError::DuplicateKey(id) = e {
                warn!(joke_id = %id, "Generated joke id collided with a live joke");
            }
        })?;

        info!(joke_id = %joke.id, "Joke created");
        Ok(joke)
    }

    #[instrument(skip(self), fields(joke_id = %id))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Joke, JokeError> {
        debug!("Getting joke by id");
        self.store
            .get(id)
            .await?
            .ok_or_else(|| JokeError::joke_not_found(id))
    }

    /// An author with no jokes yields an empty list, not an error.
    #[instrument(skip(self))]
    pub async fn get_by_author(&self, author: &str) -> Result<Vec<Joke>, JokeError> {
        let jokes = self.store.list_by_author(author).await?;
        debug!("Found {} jokes by author", jokes.len());
        Ok(jokes)
    }

    /// Not idempotent: deleting an id twice fails the second time.
    #[instrument(skip(self), fields(joke_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<Uuid, JokeError> {
        self.store.delete(id).await?;
        info!("Joke deleted");
        Ok(id)
    }

    pub async fn list_all(&self) -> Result<Vec<Joke>, JokeError> {
        let jokes = self.store.list_all().await?;
        debug!("Listed {} jokes", jokes.len());
        Ok(jokes)
    }

    /// Picks a joke uniformly at random.
    ///
    /// The count is read once and the draw is bounded by it. If the list
    /// shrank between the count and the listing, the out-of-range draw is
    /// reported as not found.
    #[instrument(skip(self))]
    pub async fn random_pick(&self) -> Result<Joke, JokeError> {
        let count = self.store.count().await?;
        if count == 0 {
            return Err(JokeError::NotFound("no jokes available".to_string()));
        }

        let jokes = self.store.list_all().await?;
        let index = self.rng.lock().random_range(0..count);

        match jokes.into_iter().nth(index) {
            Some(joke) => {
                debug!(joke_id = %joke.id, index, count, "Picked random joke");
                Ok(joke)
            }
            None => {
                warn!(index, count, "Random index fell outside the listed jokes");
                Err(JokeError::NotFound("selection out of range".to_string()))
            }
        }
    }
}

fn required_field(name: &str, value: Option<String>) -> Result<String, JokeError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(JokeError::InvalidInput(format!("{} is required", name))),
    }
}
