//! Author endpoints: browsing and librarian record management

use axum::{
    extract::State,
    response::Redirect,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDeleteConfirmation, AuthorDetails},
        forms::{AuthorForm, AuthorFormView},
        pagination::{PageQuery, PaginatedResponse},
    },
    AppState,
};

use super::{
    extract::{FormJson, PathParam, QueryParams},
    CatalogWriter,
};

const AUTHORS_PATH: &str = "/api/v1/authors";

fn author_path(id: i32) -> String {
    format!("{}/{}", AUTHORS_PATH, id)
}

/// List authors, 10 per page
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of authors", body = PaginatedResponse<Author>),
        (status = 404, description = "No such page")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<PaginatedResponse<Author>>> {
    let authors = state.services.catalog.list_authors(&query).await?;
    Ok(Json(authors))
}

/// Author with their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Empty author form with its initial values
#[utoipa::path(
    get,
    path = "/authors/create",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Creation form", body = AuthorFormView),
        (status = 403, description = "Insufficient rights")
    )
)]
pub async fn create_author_form(
    State(state): State<AppState>,
    CatalogWriter(_librarian): CatalogWriter,
) -> AppResult<Json<AuthorFormView>> {
    Ok(Json(state.services.authors.create_form()))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors/create",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorForm,
    responses(
        (status = 303, description = "Created, redirect to the author"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Insufficient rights")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    CatalogWriter(_librarian): CatalogWriter,
    FormJson(form): FormJson<AuthorForm>,
) -> AppResult<Redirect> {
    let author = state.services.authors.create(form).await?;
    Ok(Redirect::to(&author_path(author.id)))
}

/// Author form prefilled with current values
#[utoipa::path(
    get,
    path = "/authors/{id}/update",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Update form", body = AuthorFormView),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    CatalogWriter(_librarian): CatalogWriter,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<AuthorFormView>> {
    let form = state.services.authors.update_form(id).await?;
    Ok(Json(form))
}

/// Update an author
#[utoipa::path(
    post,
    path = "/authors/{id}/update",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body = AuthorForm,
    responses(
        (status = 303, description = "Updated, redirect to the author"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    CatalogWriter(_librarian): CatalogWriter,
    PathParam(id): PathParam<i32>,
    FormJson(form): FormJson<AuthorForm>,
) -> AppResult<Redirect> {
    let author = state.services.authors.update(id, form).await?;
    Ok(Redirect::to(&author_path(author.id)))
}

/// Delete confirmation step
#[utoipa::path(
    get,
    path = "/authors/{id}/delete",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author about to be deleted", body = AuthorDeleteConfirmation),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author_confirmation(
    State(state): State<AppState>,
    CatalogWriter(_librarian): CatalogWriter,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<AuthorDeleteConfirmation>> {
    let confirmation = state.services.authors.delete_confirmation(id).await?;
    Ok(Json(confirmation))
}

/// Delete an author without books
#[utoipa::path(
    post,
    path = "/authors/{id}/delete",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 303, description = "Deleted, redirect to the author list"),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Books still reference the author")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    CatalogWriter(_librarian): CatalogWriter,
    PathParam(id): PathParam<i32>,
) -> AppResult<Redirect> {
    state.services.authors.delete(id).await?;
    Ok(Redirect::to(AUTHORS_PATH))
}
