//! Loan endpoints: the reader's own loans and librarian renewals

use axum::{
    extract::State,
    response::Redirect,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::BookInstanceDetails,
        forms::{today, RenewBookForm, RenewBookFormView},
        pagination::{PageQuery, PaginatedResponse},
    },
    AppState,
};

use super::{
    extract::{FormJson, PathParam, QueryParams},
    AuthenticatedUser, LoanManager,
};

/// Where a successful renewal sends the librarian
pub const ALL_BORROWED_PATH: &str = "/api/v1/book-instances/borrowed";

/// Copies on loan to the current user
#[utoipa::path(
    get,
    path = "/book-instances/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Copies on loan to the caller, soonest due first", body = PaginatedResponse<BookInstanceDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstanceDetails>>> {
    let loans = state
        .services
        .loans
        .borrowed_by(claims.user_id, &query, today())
        .await?;
    Ok(Json(loans))
}

/// Every copy on loan, with its borrower
#[utoipa::path(
    get,
    path = "/book-instances/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All copies on loan, soonest due first", body = PaginatedResponse<BookInstanceDetails>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Permission 'can mark returned' required")
    )
)]
pub async fn all_borrowed(
    State(state): State<AppState>,
    LoanManager(_librarian): LoanManager,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstanceDetails>>> {
    let loans = state.services.loans.all_borrowed(&query, today()).await?;
    Ok(Json(loans))
}

/// Renewal form, proposing a due date three weeks from today
#[utoipa::path(
    get,
    path = "/book-instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewBookFormView),
        (status = 403, description = "Permission 'can mark returned' required"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_form(
    State(state): State<AppState>,
    LoanManager(_librarian): LoanManager,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<RenewBookFormView>> {
    let form = state.services.loans.renewal_form(id, today()).await?;
    Ok(Json(form))
}

/// Renew a loan: set a new due-back date
#[utoipa::path(
    post,
    path = "/book-instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = RenewBookForm,
    responses(
        (status = 303, description = "Renewed, redirect to all borrowed copies"),
        (status = 400, description = "Invalid renewal date", body = crate::error::ErrorResponse),
        (status = 403, description = "Permission 'can mark returned' required"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_book_instance(
    State(state): State<AppState>,
    LoanManager(_librarian): LoanManager,
    PathParam(id): PathParam<Uuid>,
    FormJson(form): FormJson<RenewBookForm>,
) -> AppResult<Redirect> {
    state.services.loans.renew(id, &form, today()).await?;
    Ok(Redirect::to(ALL_BORROWED_PATH))
}
