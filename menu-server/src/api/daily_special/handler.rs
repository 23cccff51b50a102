//! Dish of the Day Handlers

use axum::{Json, extract::State};
use shared::error::ErrorCode;
use shared::models::{DailySpecial, DailySpecialUpdate};

use crate::core::ServerState;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_price,
    validate_optional_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/daily-special
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<Option<DailySpecial>>> {
    Ok(Json(state.daily_special.get()?))
}

/// PUT /api/daily-special
pub async fn set(
    State(state): State<ServerState>,
    Json(payload): Json<DailySpecialUpdate>,
) -> AppResult<Json<DailySpecial>> {
    validate_optional_text(payload.manual_title.as_deref(), "manual_title", MAX_NAME_LEN)?;
    validate_optional_text(payload.section_title.as_deref(), "section_title", MAX_NAME_LEN)?;
    validate_optional_text(
        payload.manual_description.as_deref(),
        "manual_description",
        MAX_DESCRIPTION_LEN,
    )?;
    validate_optional_text(payload.manual_image_url.as_deref(), "manual_image_url", MAX_URL_LEN)?;
    validate_optional_price(payload.manual_price, "manual_price")?;

    if let Some(dish_id) = payload.dish_id
        && state.dishes.find_by_id(dish_id)?.is_none()
    {
        return Err(
            AppError::with_message(ErrorCode::DishNotFound, format!("Dish {dish_id} not found"))
                .with_detail("id", dish_id),
        );
    }

    let special = state.daily_special.set(payload)?;
    state.bump_catalog("daily_special");
    Ok(Json(special))
}
