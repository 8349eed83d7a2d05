//! Catalog browsing service: dashboard counts, lists and details

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetails},
        book::{BookDetails, BookSummary},
        book_instance::{BookInstanceDetails, LoanStatus},
        dashboard::{CatalogCounts, WILD_TITLE_FRAGMENT},
        forms::today,
        genre::{Genre, GenreDetails},
        pagination::{PageQuery, PaginatedResponse},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    /// Record counts shown on the home page
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        Ok(CatalogCounts {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.book_instances.count().await?,
            num_instances_available: self
                .repository
                .book_instances
                .count_by_status(LoanStatus::Available)
                .await?,
            num_authors: self.repository.authors.count().await?,
            num_genre: self.repository.genres.count().await?,
            num_wild_books: self
                .repository
                .books
                .count_title_containing(WILD_TITLE_FRAGMENT)
                .await?,
        })
    }

    pub async fn list_books(&self, query: &PageQuery) -> AppResult<PaginatedResponse<BookSummary>> {
        let total = self.repository.books.count().await?;
        let page = query.resolve(total)?;
        let books = self.repository.books.list(&page).await?;
        Ok(PaginatedResponse::new(books, total, page))
    }

    /// Book with author, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let genres = self.repository.genres.list_for_book(id).await?;
        let instances = self.repository.book_instances.list_for_book(id).await?;

        Ok(BookDetails {
            book,
            author,
            genres,
            instances,
        })
    }

    pub async fn list_authors(&self, query: &PageQuery) -> AppResult<PaginatedResponse<Author>> {
        let total = self.repository.authors.count().await?;
        let page = query.resolve(total)?;
        let authors = self.repository.authors.list(&page).await?;
        Ok(PaginatedResponse::new(authors, total, page))
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }

    pub async fn list_genres(&self, query: &PageQuery) -> AppResult<PaginatedResponse<Genre>> {
        let total = self.repository.genres.count().await?;
        let page = query.resolve(total)?;
        let genres = self.repository.genres.list(&page).await?;
        Ok(PaginatedResponse::new(genres, total, page))
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<GenreDetails> {
        let genre = self.repository.genres.get_by_id(id).await?;
        let books = self.repository.books.list_by_genre(id).await?;
        Ok(GenreDetails { genre, books })
    }

    pub async fn list_book_instances(
        &self,
        query: &PageQuery,
    ) -> AppResult<PaginatedResponse<BookInstanceDetails>> {
        let total = self.repository.book_instances.count().await?;
        let page = query.resolve(total)?;
        let instances = self.repository.book_instances.list(&page, today()).await?;
        Ok(PaginatedResponse::new(instances, total, page))
    }

    pub async fn get_book_instance(&self, id: Uuid) -> AppResult<BookInstanceDetails> {
        self.repository.book_instances.get_details(id, today()).await
    }
}
