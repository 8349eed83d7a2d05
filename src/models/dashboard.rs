//! Home page aggregates

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Title fragment counted on the dashboard
pub const WILD_TITLE_FRAGMENT: &str = "wild";

/// Catalog-wide record counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genre: i64,
    /// Books whose title contains "wild" (case-sensitive)
    pub num_wild_books: i64,
}

/// Dashboard response: counts plus the caller's earlier visits this session
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Dashboard {
    #[serde(flatten)]
    pub counts: CatalogCounts,
    pub num_visits: i64,
}
