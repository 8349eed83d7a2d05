//! API handlers for the catalog REST endpoints

pub mod auth;
pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod extract;
pub mod genres;
pub mod health;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Login required".to_string()))?;

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Authenticated user with catalog write rights (author management)
pub struct CatalogWriter(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for CatalogWriter {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        claims.require_write_catalog()?;
        Ok(CatalogWriter(claims))
    }
}

/// Authenticated user holding the "can mark returned" permission.
///
/// Resolved from the request head, so the check happens before the body
/// is read or any record is looked up.
pub struct LoanManager(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for LoanManager {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        claims.require_mark_returned()?;
        Ok(LoanManager(claims))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Dashboard
        .route("/catalog", get(catalog::dashboard))
        // Books
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route(
            "/authors/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/authors/:id", get(authors::get_author))
        .route(
            "/authors/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        .route(
            "/authors/:id/delete",
            get(authors::delete_author_confirmation).post(authors::delete_author),
        )
        // Genres
        .route("/genres", get(genres::list_genres))
        .route("/genres/:id", get(genres::get_genre))
        // Copies and loans
        .route("/book-instances", get(book_instances::list_book_instances))
        .route("/book-instances/mine", get(loans::my_borrowed))
        .route("/book-instances/borrowed", get(loans::all_borrowed))
        .route("/book-instances/:id", get(book_instances::get_book_instance))
        .route(
            "/book-instances/:id/renew",
            get(loans::renew_form).post(loans::renew_book_instance),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
