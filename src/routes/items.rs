use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{ClothingItem, NewClothingItem},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Free-text description of the piece, e.g. "navy wool overcoat".
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub item_ids: Vec<Uuid>,
}

/// Handler for GET /api/v1/items
///
/// The whole closet in insertion order, laundry included; clients read
/// `available` to tell what is wearable right now.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ClothingItem>>> {
    let items = state.store.items_by_owner(auth.user_id).await?;
    Ok(Json(items))
}

/// Handler for POST /api/v1/items
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ClothingItem>)> {
    let description = request.description.trim();
    if description.is_empty() {
        return Err(AppError::InvalidInput(
            "Item description cannot be empty".to_string(),
        ));
    }

    let item = state
        .store
        .insert_item(NewClothingItem {
            user_id: auth.user_id,
            description: description.to_string(),
        })
        .await?;

    tracing::info!(user_id = %auth.user_id, item_id = %item.id, "Clothing item added");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for POST /api/v1/items/restock
///
/// Explicit restock, the one availability transition outside the rotation
/// cycle: the caller says these pieces are back in the closet (laundry done
/// early, bought a duplicate). Ids that are unknown or belong to someone
/// else are skipped, matching the restoration contract. Returns the items
/// that were actually restocked.
pub async fn restock(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<RestockRequest>,
) -> AppResult<Json<Vec<ClothingItem>>> {
    if request.item_ids.is_empty() {
        return Err(AppError::InvalidInput(
            "item_ids cannot be empty".to_string(),
        ));
    }

    let owned_ids: Vec<Uuid> = state
        .store
        .items_by_ids(&request.item_ids)
        .await?
        .into_iter()
        .filter(|item| item.user_id == auth.user_id)
        .map(|item| item.id)
        .collect();
    state.catalog.mark_available(&owned_ids).await?;

    let items = state.store.items_by_ids(&owned_ids).await?;
    tracing::info!(user_id = %auth.user_id, restocked = items.len(), "Items restocked");

    Ok(Json(items))
}

/// Handler for DELETE /api/v1/items/:id
///
/// Outfits referencing the item keep its id; expansions and restorations
/// simply skip it from then on.
pub async fn remove(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = state.store.delete_item(auth.user_id, item_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!(
            "Clothing item {item_id} not found"
        )));
    }

    tracing::info!(user_id = %auth.user_id, item_id = %item_id, "Clothing item deleted");

    Ok(StatusCode::NO_CONTENT)
}
