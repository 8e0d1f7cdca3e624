use crate::{
    domain::JokeStore,
    errors::StoreError,
    models::{authors_match, Joke},
};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    types::{AttributeValue, Select},
    Client as DynamoDbClient,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{self, info};
use uuid::Uuid;

type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone)]
pub struct DynamoDbJokeStore {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoDbJokeStore {
    /// Creates a store backed by the given table. The table must have `id` (S) as hash key.
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        info!(%table_name, "Initializing DynamoDbJokeStore");
        Self { client, table_name }
    }

    /// Scans the whole table, following `LastEvaluatedKey` across pages.
    async fn scan_items(&self) -> Result<Vec<Item>, StoreError> {
        let mut items: Vec<Item> = Vec::new();
        let mut last_evaluated_key: Option<Item> = None;

        loop {
            let resp = self
                .client
                .scan()
                .table_name(&self.table_name)
                .consistent_read(true)
                .set_exclusive_start_key(last_evaluated_key)
                .send()
                .await
                .context(format!("DynamoDB: Failed to scan table '{}'", self.table_name))
                .map_err(StoreError::Backend)?;

            if let Some(page) = resp.items {
                tracing::debug!("DynamoDB Scan (table: {}): Returned {} items", self.table_name, page.len());
                items.extend(page);
            }

            last_evaluated_key = resp.last_evaluated_key;
            if last_evaluated_key.is_none() {
                break;
            }
        }

        Ok(items)
    }

    fn decode_all(&self, items: Vec<Item>) -> Result<Vec<Joke>, StoreError> {
        items
            .iter()
            .map(|item| {
                item_to_joke(item).ok_or_else(|| {
                    let item_id = item.get("id").and_then(|v| v.as_s().ok());
                    tracing::error!(item.id = ?item_id, table_name = %self.table_name, "DynamoDB: Failed to parse item into Joke");
                    StoreError::DataCorruption(format!(
                        "DynamoDB: Failed to parse item {:?} from table '{}'",
                        item_id, self.table_name
                    ))
                })
            })
            .collect()
    }
}

#[async_trait]
impl JokeStore for DynamoDbJokeStore {
    /// PutItem guarded by `attribute_not_exists(id)`, so concurrent inserts of one id cannot both succeed.
    async fn insert(&self, joke: &Joke) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(joke_to_item(joke)))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", "id")
            .send()
            .await
            .map_err(|sdk_err| {
                if sdk_err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception())
                {
                    tracing::warn!(joke_id = %joke.id, table_name = %self.table_name, "DynamoDB: Rejecting insert of duplicate id");
                    return StoreError::DuplicateKey(joke.id);
                }
                StoreError::Backend(anyhow::Error::new(sdk_err).context(format!(
                    "DynamoDB (table: {}): Failed to put joke (id: {})",
                    self.table_name, joke.id
                )))
            })?;

        tracing::debug!(joke_id = %joke.id, table_name = %self.table_name, "DynamoDB: Joke stored");
        Ok(())
    }

    /// DeleteItem guarded by `attribute_exists(id)`; plain DeleteItem would succeed on a missing key.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let id_str = id.to_string();
        tracing::debug!(joke_id = %id_str, table_name = %self.table_name, "DynamoDB: Deleting item");

        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id_str.clone()))
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", "id")
            .send()
            .await
            .map_err(|sdk_err| {
                if sdk_err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception())
                {
                    return StoreError::NotFound(id);
                }
                StoreError::Backend(anyhow::Error::new(sdk_err).context(format!(
                    "DynamoDB (table: {}): Failed to delete joke (id: {})",
                    self.table_name, id_str
                )))
            })?;

        tracing::debug!(joke_id = %id_str, table_name = %self.table_name, "DynamoDB: Joke deleted");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Joke>, StoreError> {
        let id_str = id.to_string();
        let resp = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id_str.clone()))
            .consistent_read(true)
            .send()
            .await
            .context(format!("DynamoDB (table: {}): Failed to get joke (id: {})", self.table_name, id_str))
            .map_err(StoreError::Backend)?;

        match resp.item {
            Some(item) => match item_to_joke(&item) {
                Some(joke) => Ok(Some(joke)),
                None => {
                    tracing::error!(joke_id = %id_str, table_name = %self.table_name, "DynamoDB: Retrieved item but failed to parse into Joke");
                    Err(StoreError::DataCorruption(format!(
                        "Failed to parse joke data retrieved from DynamoDB table '{}' for id {}",
                        self.table_name, id_str
                    )))
                }
            },
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Joke>, StoreError> {
        let items = self.scan_items().await?;
        let mut jokes = self.decode_all(items)?;
        sort_by_insertion(&mut jokes);
        tracing::info!("DynamoDB (table: {}): Successfully listed {} jokes", self.table_name, jokes.len());
        Ok(jokes)
    }

    /// Filters client-side: DynamoDB has no case-insensitive comparison operator.
    async fn list_by_author(&self, author: &str) -> Result<Vec<Joke>, StoreError> {
        let jokes = self.list_all().await?;
        Ok(jokes
            .into_iter()
            .filter(|joke| authors_match(&joke.author, author))
            .collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let mut total: usize = 0;
        let mut last_evaluated_key: Option<Item> = None;

        loop {
            let resp = self
                .client
                .scan()
                .table_name(&self.table_name)
                .select(Select::Count)
                .consistent_read(true)
                .set_exclusive_start_key(last_evaluated_key)
                .send()
                .await
                .context(format!("DynamoDB: Failed to count items in table '{}'", self.table_name))
                .map_err(StoreError::Backend)?;

            total += usize::try_from(resp.count).unwrap_or_default();

            last_evaluated_key = resp.last_evaluated_key;
            if last_evaluated_key.is_none() {
                break;
            }
        }

        tracing::debug!(table_name = %self.table_name, total, "DynamoDB: Counted jokes");
        Ok(total)
    }
}

fn joke_to_item(joke: &Joke) -> Item {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(joke.id.to_string())),
        ("text".to_string(), AttributeValue::S(joke.text.clone())),
        ("author".to_string(), AttributeValue::S(joke.author.clone())),
        ("created_at".to_string(), AttributeValue::S(joke.created_at.to_rfc3339())),
    ])
}

/// Scan order follows hash partitions; creation time (then id) recovers insertion order.
fn sort_by_insertion(jokes: &mut [Joke]) {
    jokes.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
}

fn item_to_joke(item: &Item) -> Option<Joke> {
    let id = item
        .get("id")?
        .as_s()
        .ok()
        .and_then(|s| Uuid::parse_str(s).ok())?;
    let text = item.get("text")?.as_s().ok()?.to_string();
    let author = item.get("author")?.as_s().ok()?.to_string();
    let created_at = item
        .get("created_at")?
        .as_s()
        .ok()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())?
        .with_timezone(&Utc);

    Some(Joke {
        id,
        text,
        author,
        created_at,
    })
}
