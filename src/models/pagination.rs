//! Page-number pagination shared by all list views

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Records per page on every list view
pub const PAGE_SIZE: i64 = 10;

/// `?page=N` query parameter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    /// Page number, starting at 1 (default: 1)
    pub page: Option<i64>,
}

/// A validated page within a result set of known size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
    pub num_pages: i64,
}

/// Number of pages for `total` records; an empty list still has one page
pub fn num_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    }
}

impl PageQuery {
    /// Resolve the requested page against `total` records.
    /// Pages outside `1..=num_pages` do not exist.
    pub fn resolve(&self, total: i64) -> AppResult<PageRequest> {
        let page = self.page.unwrap_or(1);
        let num_pages = num_pages(total, PAGE_SIZE);

        if page < 1 || page > num_pages {
            return Err(AppError::NotFound(format!("Invalid page ({})", page)));
        }

        Ok(PageRequest {
            page,
            per_page: PAGE_SIZE,
            num_pages,
        })
    }
}

impl PageRequest {
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records on this page
    pub items: Vec<T>,
    /// Total number of records
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub per_page: i64,
    /// Number of pages
    pub num_pages: i64,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            num_pages: request.num_pages,
        }
    }
}
