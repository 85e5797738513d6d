//! Cart route handlers.
//!
//! The cart ID travels in the path; clients keep it between requests. Cart
//! operations touch the storage medium, so they run on the blocking pool.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;
use vitrina_core::{Cart, CartId, CartLineInput, CartLineUpdateInput};

use crate::error::{AppError, Result};
use crate::state::{AppState, SharedStorage};
use crate::store::Storefront;

/// Body for removing lines.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLinesBody {
    pub line_ids: Vec<String>,
}

/// Run a cart operation off the async runtime.
async fn with_storefront<T, F>(state: AppState, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Storefront<SharedStorage>) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(state.storefront()))
        .await
        .map_err(|e| AppError::Internal(format!("cart task failed: {e}")))
}

/// Create an empty cart.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>) -> Result<(StatusCode, Json<Cart>)> {
    let cart = with_storefront(state, Storefront::create_cart).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// Fetch a cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Cart>> {
    let cart_id = CartId::new(id);
    let lookup_id = cart_id.clone();
    with_storefront(state, move |store| store.get_cart(&lookup_id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("cart {cart_id}")))
}

/// Add lines to a cart.
#[instrument(skip(state, body))]
pub async fn add(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<Vec<CartLineInput>>, JsonRejection>,
) -> Result<Json<Cart>> {
    let Json(lines) = body?;
    let cart_id = CartId::new(id);
    let cart = with_storefront(state, move |store| store.add_to_cart(&cart_id, &lines)).await?;
    Ok(Json(cart))
}

/// Update cart lines.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<Vec<CartLineUpdateInput>>, JsonRejection>,
) -> Result<Json<Cart>> {
    let Json(lines) = body?;
    let cart_id = CartId::new(id);
    let cart = with_storefront(state, move |store| store.update_cart(&cart_id, &lines)).await?;
    Ok(Json(cart))
}

/// Remove lines from a cart.
#[instrument(skip(state, body))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<RemoveLinesBody>, JsonRejection>,
) -> Result<Json<Cart>> {
    let Json(RemoveLinesBody { line_ids }) = body?;
    let cart_id = CartId::new(id);
    let cart =
        with_storefront(state, move |store| store.remove_from_cart(&cart_id, &line_ids)).await?;
    Ok(Json(cart))
}
