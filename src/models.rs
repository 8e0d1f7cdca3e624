use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored joke. Never mutated after creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Joke {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a joke.
///
/// Every field is optional so that a missing `text` or `author` is reported
/// as invalid input by the service instead of as a JSON parse failure.
/// A client-supplied `id` is accepted but ignored.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct NewJoke {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl NewJoke {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: None,
            text: Some(text.into()),
            author: Some(author.into()),
        }
    }
}

/// Case-insensitive author comparison.
///
/// Uses the Unicode default lowercase mapping, so the result does not depend
/// on the process locale.
pub fn authors_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
