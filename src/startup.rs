use crate::{
    aws_clients::{create_dynamodb_client, create_sdk_config},
    config::{Config, StoreBackend},
    domain::JokeStore,
    errors::AppError,
    memory::InMemoryJokeStore,
    models::NewJoke,
    repositories::DynamoDbJokeStore,
    service::JokeService,
    AppState,
};
use aws_sdk_dynamodb::{
    error::SdkError as DynamoSdkError,
    types::{AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType},
    Client as DynamoDbClient,
};
use std::sync::Arc;
use tracing;

const SAMPLE_JOKE_TEXT: &str = "Why don't scientists trust atoms? Because they make up everything!";
const SAMPLE_JOKE_AUTHOR: &str = "Unknown";

/// Creates the DynamoDB table if it doesn't exist.
async fn create_dynamodb_table_if_not_exists(client: &DynamoDbClient, table_name: &str) -> Result<(), AppError> {
    let result = client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("id")
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("id")
                .key_type(KeyType::Hash)
                .build()?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;
    match result {
        Ok(_) => {
            tracing::info!("Startup: Table '{}' created successfully or setup initiated.", table_name);
            Ok(())
        }
        Err(e) => {
            if let DynamoSdkError::ServiceError(service_err) = &e {
                if service_err.err().is_resource_in_use_exception() {
                    tracing::info!("Startup: Table '{}' already exists, no action needed.", table_name);
                    Ok(())
                } else {
                    let context = format!("Startup: Service error creating DynamoDB table '{}'", table_name);
                    tracing::error!("{}: {:?}", context, service_err);
                    Err(AppError::InitError(format!("{}: {}", context, e)))
                }
            } else {
                let context = format!("Startup: SDK error creating DynamoDB table '{}'", table_name);
                tracing::error!("{}: {}", context, e);
                Err(AppError::InitError(format!("{}: {}", context, e)))
            }
        }
    }
}

/// Builds the configured store backend, preparing the table for DynamoDB.
pub async fn init_store(config: &Config) -> Result<Arc<dyn JokeStore>, AppError> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Startup: Using in-memory joke store");
            Ok(Arc::new(InMemoryJokeStore::new()))
        }
        StoreBackend::DynamoDb => {
            tracing::info!("Startup: Initializing AWS DynamoDB client...");
            let sdk_config = create_sdk_config(config).await;
            let client = create_dynamodb_client(&sdk_config);
            create_dynamodb_table_if_not_exists(&client, &config.table_name).await?;
            Ok(Arc::new(DynamoDbJokeStore::new(client, config.table_name.clone())))
        }
    }
}

/// Adds the sample joke when the store starts out empty.
pub async fn seed_sample_joke(service: &JokeService) -> Result<(), AppError> {
    if !service.list_all().await?.is_empty() {
        tracing::debug!("Startup: Store already has jokes, skipping sample joke");
        return Ok(());
    }
    let joke = service
        .create(Some(NewJoke::new(SAMPLE_JOKE_TEXT, SAMPLE_JOKE_AUTHOR)))
        .await?;
    tracing::info!(joke_id = %joke.id, "Startup: Seeded sample joke");
    Ok(())
}

/// Composes store and service into the shared application state.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>, AppError> {
    let store = init_store(config).await?;

    let jokes = match config.random_seed {
        Some(seed) => {
            tracing::info!(seed, "Startup: Using fixed random seed");
            JokeService::with_seed(store, seed)
        }
        None => JokeService::new(store),
    };

    if config.seed_sample_joke {
        seed_sample_joke(&jokes).await?;
    }

    Ok(Arc::new(AppState { jokes }))
}
