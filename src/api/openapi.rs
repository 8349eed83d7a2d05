//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, book_instances, books, catalog, genres, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Local library catalog: books, authors, genres, copies and loan renewals"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Dashboard
        catalog::dashboard,
        // Books
        books::list_books,
        books::get_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author_form,
        authors::create_author,
        authors::update_author_form,
        authors::update_author,
        authors::delete_author_confirmation,
        authors::delete_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        // Copies
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        // Loans
        loans::my_borrowed,
        loans::all_borrowed,
        loans::renew_form,
        loans::renew_book_instance,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::AccountType,
            crate::models::user::UserShort,
            // Catalog
            crate::models::dashboard::CatalogCounts,
            crate::models::dashboard::Dashboard,
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookDetails,
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::AuthorDeleteConfirmation,
            crate::models::genre::Genre,
            crate::models::genre::GenreDetails,
            crate::models::book_instance::LoanStatus,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceShort,
            crate::models::book_instance::BookInstanceDetails,
            crate::models::pagination::PageQuery,
            // Forms
            crate::models::forms::RenewBookForm,
            crate::models::forms::RenewBookFormView,
            crate::models::forms::AuthorForm,
            crate::models::forms::AuthorValues,
            crate::models::forms::AuthorFormView,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "catalog", description = "Catalog dashboard"),
        (name = "books", description = "Books"),
        (name = "authors", description = "Authors and their management"),
        (name = "genres", description = "Genres"),
        (name = "book_instances", description = "Physical copies"),
        (name = "loans", description = "Borrowed copies and renewals")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
