use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{OutfitWithItems, RecommendContext, UseOutfitReceipt, User},
    state::AppState,
};

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub context: RecommendContext,
    /// City to resolve current weather for when no explicit weather is
    /// given in the context.
    pub city: Option<String>,
    /// Optional inspiration image forwarded to the generator.
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BuildRequest {
    /// Items every proposed outfit must be built around.
    pub base_item_ids: Vec<Uuid>,
    #[serde(flatten)]
    pub request: GenerateRequest,
}

/// Handler for GET /api/v1/outfits
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OutfitWithItems>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let outfits = state.store.recent_outfits(auth.user_id, limit).await?;
    let expanded = state.recommendations.expand(outfits).await?;

    Ok(Json(expanded))
}

/// Handler for POST /api/v1/outfits/generate
pub async fn generate(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> AppResult<Json<Vec<OutfitWithItems>>> {
    let user = current_user(&state, &auth).await?;
    let context = resolve_context(&state, &request).await;

    tracing::info!(user_id = %user.id, "Generating outfit recommendations");

    let outfits = state
        .recommendations
        .generate_for_user(&user, &context, request.image_url.as_deref())
        .await?;

    Ok(Json(outfits))
}

/// Handler for POST /api/v1/outfits/build
pub async fn build(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<BuildRequest>,
) -> AppResult<Json<Vec<OutfitWithItems>>> {
    if request.base_item_ids.is_empty() {
        return Err(AppError::InvalidInput(
            "base_item_ids cannot be empty".to_string(),
        ));
    }

    let user = current_user(&state, &auth).await?;
    let context = resolve_context(&state, &request.request).await;

    tracing::info!(
        user_id = %user.id,
        base_items = request.base_item_ids.len(),
        "Building outfits around chosen items"
    );

    let outfits = state
        .recommendations
        .build_around_items(
            &user,
            &request.base_item_ids,
            &context,
            request.request.image_url.as_deref(),
        )
        .await?;

    Ok(Json(outfits))
}

/// Handler for POST /api/v1/outfits/:id/use
pub async fn use_outfit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(outfit_id): Path<Uuid>,
) -> AppResult<Json<UseOutfitReceipt>> {
    let receipt = state.rotation.use_outfit(auth.user_id, outfit_id).await?;
    Ok(Json(receipt))
}

/// The caller's stored profile; the token may outlive the account.
async fn current_user(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    state
        .store
        .user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
}

/// Fills in weather from the requested city when none was supplied.
///
/// Weather is a best-effort enrichment: a failed lookup is logged and the
/// recommendation proceeds without it.
async fn resolve_context(state: &AppState, request: &GenerateRequest) -> RecommendContext {
    let mut context = request.context.clone();

    if context.weather.is_none() {
        if let Some(city) = request.city.as_deref() {
            match state.weather.current_for_city(city).await {
                Ok(snapshot) => {
                    context.weather = Some(snapshot.description);
                    context.temperature_c.get_or_insert(snapshot.temperature_c);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        city,
                        "Weather lookup failed, recommending without it"
                    );
                }
            }
        }
    }

    context
}
