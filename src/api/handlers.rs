use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{EmployerId, Recommendation, RecommendationKey, RecommendationRequest},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchDetailRequest {
    pub company_id: EmployerId,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Computes and stores recommendations for a repository selection
pub async fn create_recommendation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Recommendation>> {
    if request.selected_repositories_id.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "selected_repositories_id must not be empty".to_string(),
        ));
    }

    tracing::info!(
        request_id = %request_id,
        user_id = request.user_id,
        "Recommendation requested"
    );

    let record = state.recommendations.run(request).await?;
    Ok(Json(record))
}

/// Latest stored recommendation for a user and repository selection
pub async fn get_recommendation(
    State(state): State<AppState>,
    Path((user_id, selected_repositories_id)): Path<(i64, String)>,
) -> AppResult<Json<Recommendation>> {
    let key = RecommendationKey::new(user_id, selected_repositories_id);
    let record = state.recommendations.latest(&key).await?;
    Ok(Json(record))
}

/// Records that the user viewed an employer's detail page
pub async fn record_search_detail(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<SearchDetailRequest>,
) -> AppResult<StatusCode> {
    state
        .recommendations
        .record_search_detail(user_id, request.company_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
