//! Book copy endpoints

use axum::{
    extract::State,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::BookInstanceDetails,
        pagination::{PageQuery, PaginatedResponse},
    },
    AppState,
};

use super::extract::{PathParam, QueryParams};

/// List all copies, soonest due first
#[utoipa::path(
    get,
    path = "/book-instances",
    tag = "book_instances",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of copies", body = PaginatedResponse<BookInstanceDetails>),
        (status = 404, description = "No such page")
    )
)]
pub async fn list_book_instances(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstanceDetails>>> {
    let instances = state.services.catalog.list_book_instances(&query).await?;
    Ok(Json(instances))
}

#[utoipa::path(
    get,
    path = "/book-instances/{id}",
    tag = "book_instances",
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy details", body = BookInstanceDetails),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<BookInstanceDetails>> {
    let instance = state.services.catalog.get_book_instance(id).await?;
    Ok(Json(instance))
}
