use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, services::weather::WeatherSnapshot, state::AppState};

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: String,
}

/// Handler for GET /api/v1/weather
pub async fn current(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<WeatherSnapshot>> {
    let snapshot = state.weather.current_for_city(&query.city).await?;
    Ok(Json(snapshot))
}
