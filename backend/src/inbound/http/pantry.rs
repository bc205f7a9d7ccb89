//! Pantry API handlers.
//!
//! ```text
//! POST|GET /api/v1/pantry
//! GET /api/v1/pantry/stats
//! GET /api/v1/pantry/expiring
//! POST /api/v1/pantry/cleanup
//! GET|PUT|DELETE /api/v1/pantry/{id}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::pantry::EXPIRING_SOON_DAYS;
use crate::domain::PantryItemDraft;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Query parameters for the expiring-items endpoint.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringQuery {
    /// Window in days; defaults to the expiring-soon window.
    pub within_days: Option<u32>,
}

/// Add a pantry item.
#[utoipa::path(
    post,
    path = "/api/v1/pantry",
    request_body = PantryItemDraft,
    responses(
        (status = 201, description = "Item added"),
        (status = 400, description = "Invalid item"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["pantry"],
    operation_id = "addPantryItem"
)]
#[post("/pantry")]
pub async fn add_item(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<PantryItemDraft>,
) -> ApiResult<HttpResponse> {
    let item = state
        .pantry
        .add_item(user.user_id(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(item))
}

/// List the user's pantry.
#[utoipa::path(
    get,
    path = "/api/v1/pantry",
    responses(
        (status = 200, description = "Pantry items"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["pantry"],
    operation_id = "listPantryItems"
)]
#[get("/pantry")]
pub async fn list_items(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let items = state.pantry.list_items(user.user_id()).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Aggregate pantry statistics.
#[utoipa::path(
    get,
    path = "/api/v1/pantry/stats",
    responses(
        (status = 200, description = "Pantry statistics"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["pantry"],
    operation_id = "pantryStats"
)]
#[get("/pantry/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let stats = state.pantry.stats(user.user_id()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Items expiring inside the requested window, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/pantry/expiring",
    params(ExpiringQuery),
    responses(
        (status = 200, description = "Expiring items"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["pantry"],
    operation_id = "expiringPantryItems"
)]
#[get("/pantry/expiring")]
pub async fn expiring(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<ExpiringQuery>,
) -> ApiResult<HttpResponse> {
    let within_days = query.into_inner().within_days.unwrap_or(EXPIRING_SOON_DAYS);
    let items = state.pantry.expiring(user.user_id(), within_days).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Remove expired items.
#[utoipa::path(
    post,
    path = "/api/v1/pantry/cleanup",
    responses(
        (status = 200, description = "Expired items removed"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["pantry"],
    operation_id = "cleanupPantry"
)]
#[post("/pantry/cleanup")]
pub async fn cleanup(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let removed = state.pantry.cleanup(user.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "removed": removed })))
}

/// Fetch one pantry item.
#[utoipa::path(
    get,
    path = "/api/v1/pantry/{id}",
    responses(
        (status = 200, description = "Pantry item"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Item not found")
    ),
    tags = ["pantry"],
    operation_id = "getPantryItem"
)]
#[get("/pantry/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let item = state
        .pantry
        .get_item(user.user_id(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(item))
}

/// Replace a pantry item's editable fields.
#[utoipa::path(
    put,
    path = "/api/v1/pantry/{id}",
    request_body = PantryItemDraft,
    responses(
        (status = 200, description = "Updated item"),
        (status = 400, description = "Invalid item"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Item not found")
    ),
    tags = ["pantry"],
    operation_id = "updatePantryItem"
)]
#[put("/pantry/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<PantryItemDraft>,
) -> ApiResult<HttpResponse> {
    let item = state
        .pantry
        .update_item(user.user_id(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(item))
}

/// Delete a pantry item.
#[utoipa::path(
    delete,
    path = "/api/v1/pantry/{id}",
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Item not found")
    ),
    tags = ["pantry"],
    operation_id = "deletePantryItem"
)]
#[delete("/pantry/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .pantry
        .remove_item(user.user_id(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
