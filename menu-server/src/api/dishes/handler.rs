//! Dish API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Dish, DishCreate, DishUpdate};
use shared::types::MoveRequest;

use crate::core::ServerState;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_price,
    validate_optional_text, validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "dish";

#[derive(Debug, Deserialize)]
pub struct DishFilter {
    /// Only dishes of this category
    pub category_id: Option<i64>,
    /// Only dishes without a category
    #[serde(default)]
    pub uncategorized: bool,
}

fn ensure_category(state: &ServerState, category_id: Option<i64>) -> AppResult<()> {
    if let Some(id) = category_id
        && state.categories.find_by_id(id)?.is_none()
    {
        return Err(
            AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
                .with_detail("id", id),
        );
    }
    Ok(())
}

/// GET /api/dishes - by category then position; `?category_id=` or `?uncategorized=true` filter
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<DishFilter>,
) -> AppResult<Json<Vec<Dish>>> {
    let dishes = if filter.uncategorized {
        state.dishes.find_by_category(None)?
    } else if let Some(id) = filter.category_id {
        state.dishes.find_by_category(Some(id))?
    } else {
        state.dishes.find_all()?
    };
    Ok(Json(dishes))
}

/// GET /api/dishes/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Dish>> {
    let dish = state.dishes.find_by_id(id)?.ok_or_else(|| {
        AppError::with_message(ErrorCode::DishNotFound, format!("Dish {id} not found"))
            .with_detail("id", id)
    })?;
    Ok(Json(dish))
}

/// POST /api/dishes
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DishCreate>,
) -> AppResult<Json<Dish>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(payload.image_url.as_deref(), "image_url", MAX_URL_LEN)?;
    validate_price(payload.price, "price")?;
    ensure_category(&state, payload.category_id)?;

    let dish = state.dishes.create(payload)?;
    state.bump_catalog(RESOURCE);
    tracing::info!(id = dish.id, name = %dish.name, category_id = ?dish.category_id, "Dish created");
    Ok(Json(dish))
}

/// PUT /api/dishes/{id}
///
/// A category change appends the dish at the end of the target category.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(payload.image_url.as_deref(), "image_url", MAX_URL_LEN)?;
    validate_optional_price(payload.price, "price")?;
    if let Some(category_id) = payload.category_id {
        ensure_category(&state, category_id)?;
    }

    let dish = state.dishes.update(id, payload)?;
    state.bump_catalog(RESOURCE);
    Ok(Json(dish))
}

/// DELETE /api/dishes/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let deleted = state.dishes.delete(id)?;
    if deleted {
        state.bump_catalog(RESOURCE);
        tracing::info!(id, "Dish deleted");
    }
    Ok(Json(deleted))
}

/// POST /api/dishes/{id}/move - swap within the dish's category
pub async fn move_dish(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<Vec<Dish>>> {
    let dishes = state.dishes.move_dish(id, payload.direction)?;
    state.bump_catalog(RESOURCE);
    Ok(Json(dishes))
}
