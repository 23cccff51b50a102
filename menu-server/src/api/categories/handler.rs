//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::types::MoveRequest;

use crate::core::ServerState;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "category";

/// GET /api/categories - all categories, hidden ones included
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.find_all()?))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = state.categories.find_by_id(id)?.ok_or_else(|| {
        AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
            .with_detail("id", id)
    })?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let category = state.categories.create(payload)?;
    state.bump_catalog(RESOURCE);
    tracing::info!(id = category.id, name = %category.name, "Category created");
    Ok(Json(category))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let category = state.categories.update(id, payload)?;
    state.bump_catalog(RESOURCE);
    Ok(Json(category))
}

/// DELETE /api/categories/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let deleted = state.categories.delete(id)?;
    if deleted {
        state.bump_catalog(RESOURCE);
        tracing::info!(id, "Category deleted");
    }
    Ok(Json(deleted))
}

/// POST /api/categories/{id}/move - swap with the neighbour, returns the new order
pub async fn move_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.categories.move_category(id, payload.direction)?;
    state.bump_catalog(RESOURCE);
    Ok(Json(categories))
}
