//! Featured Block API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::ErrorCode;
use shared::models::{BlockKind, FeaturedBlock, FeaturedBlockCreate, FeaturedBlockUpdate};
use shared::types::MoveRequest;

use crate::core::ServerState;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_price,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "featured_block";

/// Manual blocks need a title; dish blocks need an existing dish
fn validate_block(
    state: &ServerState,
    kind: BlockKind,
    title: &str,
    dish_id: Option<i64>,
) -> AppResult<()> {
    match kind {
        BlockKind::Manual => validate_required_text(title, "title", MAX_NAME_LEN),
        BlockKind::Dish => {
            let dish_id =
                dish_id.ok_or_else(|| AppError::validation("dish_id is required for dish blocks"))?;
            if state.dishes.find_by_id(dish_id)?.is_none() {
                return Err(AppError::with_message(
                    ErrorCode::DishNotFound,
                    format!("Dish {dish_id} not found"),
                )
                .with_detail("id", dish_id));
            }
            Ok(())
        }
    }
}

/// GET /api/featured-blocks
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<FeaturedBlock>>> {
    Ok(Json(state.featured_blocks.find_all()?))
}

/// GET /api/featured-blocks/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<FeaturedBlock>> {
    let block = state.featured_blocks.find_by_id(id)?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::FeaturedBlockNotFound,
            format!("Featured block {id} not found"),
        )
        .with_detail("id", id)
    })?;
    Ok(Json(block))
}

/// POST /api/featured-blocks
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FeaturedBlockCreate>,
) -> AppResult<Json<FeaturedBlock>> {
    validate_block(&state, payload.kind, &payload.title, payload.dish_id)?;
    validate_optional_text(Some(payload.title.as_str()), "title", MAX_NAME_LEN)?;
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(payload.image_url.as_deref(), "image_url", MAX_URL_LEN)?;
    validate_optional_price(payload.manual_price, "manual_price")?;

    let block = state.featured_blocks.create(payload)?;
    state.bump_catalog(RESOURCE);
    tracing::info!(id = block.id, kind = ?block.kind, "Featured block created");
    Ok(Json(block))
}

/// PUT /api/featured-blocks/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<FeaturedBlockUpdate>,
) -> AppResult<Json<FeaturedBlock>> {
    let current = state.featured_blocks.find_by_id(id)?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::FeaturedBlockNotFound,
            format!("Featured block {id} not found"),
        )
        .with_detail("id", id)
    })?;

    let kind = payload.kind.unwrap_or(current.kind);
    let title = payload.title.as_deref().unwrap_or(&current.title);
    validate_block(&state, kind, title, payload.dish_id.or(current.dish_id))?;
    validate_optional_text(payload.title.as_deref(), "title", MAX_NAME_LEN)?;
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(payload.image_url.as_deref(), "image_url", MAX_URL_LEN)?;
    validate_optional_price(payload.manual_price, "manual_price")?;

    let block = state.featured_blocks.update(id, payload)?;
    state.bump_catalog(RESOURCE);
    Ok(Json(block))
}

/// DELETE /api/featured-blocks/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let deleted = state.featured_blocks.delete(id)?;
    if deleted {
        state.bump_catalog(RESOURCE);
    }
    Ok(Json(deleted))
}

/// POST /api/featured-blocks/{id}/move
pub async fn move_block(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<Vec<FeaturedBlock>>> {
    let blocks = state.featured_blocks.move_block(id, payload.direction)?;
    state.bump_catalog(RESOURCE);
    Ok(Json(blocks))
}
