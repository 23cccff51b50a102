//! Customer Menu Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::order::Order;
use shared::util::normalize_table_code;

use super::table_code::{CodeSource, TableQuery, resolve, set_cookie_value};
use crate::core::ServerState;
use crate::menu::{CustomerMenu, compose_menu};
use crate::utils::validation::{MAX_TABLE_CODE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    #[serde(flatten)]
    pub menu: CustomerMenu,
    /// Table the customer is sitting at, when known
    pub table_code: Option<String>,
    /// Bumped on every catalog change
    pub version: u64,
}

#[derive(Debug, Serialize)]
pub struct TableContext {
    pub table_code: Option<String>,
}

/// What a customer may know about their table
#[derive(Debug, Serialize)]
pub struct TableSignals {
    pub table_code: String,
    pub has_open_order: bool,
    pub call_waiter: bool,
    pub request_bill: bool,
}

impl TableSignals {
    fn new(table_code: String, order: Option<&Order>) -> Self {
        Self {
            table_code,
            has_open_order: order.is_some(),
            call_waiter: order.is_some_and(|o| o.call_waiter),
            request_bill: order.is_some_and(|o| o.request_bill),
        }
    }
}

/// Attach the table cookie unless the code already came from it
fn with_table_cookie(body: impl IntoResponse, resolved: Option<&(String, CodeSource)>) -> Response {
    let mut response = body.into_response();
    if let Some((code, source)) = resolved
        && *source != CodeSource::Cookie
        && let Ok(value) = HeaderValue::from_str(&set_cookie_value(code))
    {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

fn path_code(code: &str) -> AppResult<String> {
    validate_required_text(code, "table_code", MAX_TABLE_CODE_LEN)?;
    normalize_table_code(code).ok_or_else(|| AppError::validation("table_code must not be empty"))
}

/// GET /api/menu
pub async fn get_menu(
    State(state): State<ServerState>,
    Query(query): Query<TableQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let menu = compose_menu(
        state.categories.find_all()?,
        state.dishes.find_all()?,
        state.featured_blocks.find_all()?,
        state.daily_special.get()?,
    );

    let resolved = resolve(&query, None, &headers);
    let body = Json(MenuResponse {
        menu,
        table_code: resolved.as_ref().map(|(code, _)| code.clone()),
        version: state.resource_versions.total(),
    });
    Ok(with_table_cookie(body, resolved.as_ref()))
}

/// GET /api/menu/table
pub async fn current_table(Query(query): Query<TableQuery>, headers: HeaderMap) -> Response {
    let resolved = resolve(&query, None, &headers);
    let body = Json(TableContext {
        table_code: resolved.as_ref().map(|(code, _)| code.clone()),
    });
    with_table_cookie(body, resolved.as_ref())
}

/// GET /api/menu/table/{code}
pub async fn table_status(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Response> {
    let code = path_code(&code)?;
    let order = state.orders.find_active_order_for_table(&code)?;
    let body = Json(TableSignals::new(code.clone(), order.as_ref()));
    Ok(with_table_cookie(body, Some(&(code, CodeSource::Path))))
}

/// POST /api/menu/table/{code}/call-waiter
pub async fn call_waiter(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Response> {
    let code = path_code(&code)?;
    let order = state.orders.raise_call_waiter(&code)?;
    tracing::info!(table_code = %code, order_id = order.id, "Customer called the waiter");
    let body = Json(TableSignals::new(code.clone(), Some(&order)));
    Ok(with_table_cookie(body, Some(&(code, CodeSource::Path))))
}

/// POST /api/menu/table/{code}/request-bill
pub async fn request_bill(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Response> {
    let code = path_code(&code)?;
    let order = state.orders.raise_request_bill(&code)?;
    tracing::info!(table_code = %code, order_id = order.id, "Customer requested the bill");
    let body = Json(TableSignals::new(code.clone(), Some(&order)));
    Ok(with_table_cookie(body, Some(&(code, CodeSource::Path))))
}
