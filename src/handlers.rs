use crate::{errors::AppError, models::NewJoke, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing;
use uuid::Uuid;

/// Handler for POST /jokes.
///
/// A JSON `null` body reaches the service as a missing joke and is rejected there.
pub async fn create_joke(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Option<NewJoke>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(draft) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected joke payload");
        AppError::InvalidInput(rejection.body_text())
    })?;

    let joke = state.jokes.create(draft).await?;

    tracing::info!(joke_id = %joke.id, "Joke created successfully via handler");
    let location = format!("/jokes/{}", joke.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(joke)))
}

pub async fn get_joke(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let joke_id = Uuid::parse_str(&id_str)?;
    tracing::debug!(%joke_id, "Fetching joke via handler");
    let joke = state.jokes.get_by_id(joke_id).await?;
    Ok(Json(joke))
}

pub async fn list_jokes(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let jokes = state.jokes.list_all().await?;
    tracing::info!("Handler successfully retrieved {} jokes", jokes.len());
    Ok(Json(jokes))
}

pub async fn list_jokes_by_author(
    State(state): State<Arc<AppState>>,
    Path(author): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::debug!(%author, "Listing jokes by author via handler");
    let jokes = state.jokes.get_by_author(&author).await?;
    Ok(Json(jokes))
}

pub async fn random_joke(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let joke = state.jokes.random_pick().await?;
    Ok(Json(joke))
}

/// Handler for DELETE /jokes/{id}. Responds 200 with the deleted id.
pub async fn delete_joke(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let joke_id = Uuid::parse_str(&id_str)?;
    tracing::debug!(%joke_id, "Deleting joke via handler");

    let deleted = state.jokes.delete(joke_id).await?;

    tracing::info!(%joke_id, "Joke deleted successfully via handler");
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
