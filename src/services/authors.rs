//! Author record management for librarians

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDeleteConfirmation},
        forms::{AuthorForm, AuthorFormView, AuthorValues},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Empty creation form with its initial values
    pub fn create_form(&self) -> AuthorFormView {
        AuthorFormView {
            author_id: None,
            initial: AuthorValues::create_initial(),
        }
    }

    pub async fn create(&self, form: AuthorForm) -> AppResult<Author> {
        form.validate()?;
        let author = self.repository.authors.create(&form.into_create_values()).await?;
        tracing::info!("Author {} created: {}", author.id, author.display_name());
        Ok(author)
    }

    /// Update form prefilled with the author's current values
    pub async fn update_form(&self, id: i32) -> AppResult<AuthorFormView> {
        let author = self.repository.authors.get_by_id(id).await?;
        Ok(AuthorFormView {
            author_id: Some(author.id),
            initial: AuthorValues::from(&author),
        })
    }

    pub async fn update(&self, id: i32, form: AuthorForm) -> AppResult<Author> {
        // 404 takes precedence over form errors
        self.repository.authors.get_by_id(id).await?;
        form.validate()?;
        let author = self
            .repository
            .authors
            .update(id, &form.into_update_values())
            .await?;
        tracing::info!("Author {} updated", id);
        Ok(author)
    }

    pub async fn delete_confirmation(&self, id: i32) -> AppResult<AuthorDeleteConfirmation> {
        let author = self.repository.authors.get_by_id(id).await?;
        let book_count = self.repository.books.count_by_author(id).await?;
        Ok(AuthorDeleteConfirmation { author, book_count })
    }

    /// Delete an author that no book references
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let author = self.repository.authors.get_by_id(id).await?;
        let book_count = self.repository.books.count_by_author(id).await?;
        if book_count > 0 {
            return Err(AppError::Conflict(format!(
                "Author {} still has {} book(s) in the catalog",
                author.display_name(),
                book_count
            )));
        }

        self.repository.authors.delete(id).await?;
        tracing::info!("Author {} deleted: {}", id, author.display_name());
        Ok(())
    }
}
