//! Genre endpoints

use axum::{
    extract::State,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        genre::{Genre, GenreDetails},
        pagination::{PageQuery, PaginatedResponse},
    },
    AppState,
};

use super::extract::{PathParam, QueryParams};

#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of genres", body = PaginatedResponse<Genre>),
        (status = 404, description = "No such page")
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<PaginatedResponse<Genre>>> {
    let genres = state.services.catalog.list_genres(&query).await?;
    Ok(Json(genres))
}

/// Genre with its books
#[utoipa::path(
    get,
    path = "/genres/{id}",
    tag = "genres",
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre details", body = GenreDetails),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<GenreDetails>> {
    let genre = state.services.catalog.get_genre(id).await?;
    Ok(Json(genre))
}
