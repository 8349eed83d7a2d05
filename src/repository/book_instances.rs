//! Book copies repository: availability, loans and due-back dates

use chrono::NaiveDate;
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{is_overdue, BookInstance, BookInstanceDetails, BookInstanceShort, LoanStatus},
        pagination::PageRequest,
        user::UserShort,
    },
};

const SELECT_WITH_BORROWER: &str = r#"
    SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.due_back,
           bi.status, bi.borrower_id,
           u.login AS borrower_login,
           u.first_name AS borrower_first_name,
           u.last_name AS borrower_last_name
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
    LEFT JOIN users u ON u.id = bi.borrower_id
"#;

/// Internal row structure: copy, book title and optional borrower
#[derive(Debug, Clone, FromRow)]
struct InstanceRow {
    id: Uuid,
    book_id: i32,
    book_title: String,
    imprint: String,
    due_back: Option<NaiveDate>,
    status: LoanStatus,
    borrower_id: Option<i32>,
    borrower_login: Option<String>,
    borrower_first_name: Option<String>,
    borrower_last_name: Option<String>,
}

impl InstanceRow {
    fn into_details(self, today: NaiveDate) -> BookInstanceDetails {
        let borrower = match (self.borrower_id, self.borrower_login) {
            (Some(id), Some(login)) => Some(UserShort {
                id,
                login,
                first_name: self.borrower_first_name.unwrap_or_default(),
                last_name: self.borrower_last_name.unwrap_or_default(),
            }),
            _ => None,
        };

        let is_overdue = is_overdue(self.status, self.due_back, today);

        BookInstanceDetails {
            instance: BookInstanceShort {
                id: self.id,
                book_id: self.book_id,
                book_title: self.book_title,
                imprint: self.imprint,
                due_back: self.due_back,
                status: self.status,
                borrower_id: self.borrower_id,
            },
            borrower,
            is_overdue,
        }
    }
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a copy with its book title and borrower
    pub async fn get_details(&self, id: Uuid, today: NaiveDate) -> AppResult<BookInstanceDetails> {
        sqlx::query_as::<_, InstanceRow>(&format!("{} WHERE bi.id = $1", SELECT_WITH_BORROWER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.into_details(today))
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// One page of all copies, soonest due first
    pub async fn list(&self, page: &PageRequest, today: NaiveDate) -> AppResult<Vec<BookInstanceDetails>> {
        let rows = sqlx::query_as::<_, InstanceRow>(&format!(
            "{} ORDER BY bi.due_back ASC NULLS LAST, bi.id LIMIT $1 OFFSET $2",
            SELECT_WITH_BORROWER
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_details(today)).collect())
    }

    /// All copies of one book
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT id, book_id, imprint, due_back, status, borrower_id
            FROM book_instances
            WHERE book_id = $1
            ORDER BY due_back ASC NULLS LAST, id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(instances)
    }

    /// One page of the copies `borrower_id` has on loan, soonest due first
    pub async fn list_on_loan_to(
        &self,
        borrower_id: i32,
        page: &PageRequest,
        today: NaiveDate,
    ) -> AppResult<Vec<BookInstanceDetails>> {
        let rows = sqlx::query_as::<_, InstanceRow>(&format!(
            "{} WHERE bi.borrower_id = $1 AND bi.status = $2 \
             ORDER BY bi.due_back ASC NULLS LAST, bi.id LIMIT $3 OFFSET $4",
            SELECT_WITH_BORROWER
        ))
        .bind(borrower_id)
        .bind(LoanStatus::OnLoan)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_details(today)).collect())
    }

    pub async fn count_on_loan_to(&self, borrower_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE borrower_id = $1 AND status = $2",
        )
        .bind(borrower_id)
        .bind(LoanStatus::OnLoan)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// One page of every copy on loan, soonest due first
    pub async fn list_on_loan(&self, page: &PageRequest, today: NaiveDate) -> AppResult<Vec<BookInstanceDetails>> {
        let rows = sqlx::query_as::<_, InstanceRow>(&format!(
            "{} WHERE bi.status = $1 ORDER BY bi.due_back ASC NULLS LAST, bi.id LIMIT $2 OFFSET $3",
            SELECT_WITH_BORROWER
        ))
        .bind(LoanStatus::OnLoan)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_details(today)).collect())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Set a new due-back date on a copy
    pub async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: LoanStatus, due_back: Option<NaiveDate>, borrower: Option<(i32, &str)>) -> InstanceRow {
        InstanceRow {
            id: Uuid::new_v4(),
            book_id: 3,
            book_title: "The Call of the Wild".to_string(),
            imprint: "Macmillan, 1903".to_string(),
            due_back,
            status,
            borrower_id: borrower.map(|(id, _)| id),
            borrower_login: borrower.map(|(_, login)| login.to_string()),
            borrower_first_name: borrower.map(|_| "Ada".to_string()),
            borrower_last_name: None,
        }
    }

    #[test]
    fn test_into_details_with_borrower() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        let details = row(LoanStatus::OnLoan, Some(due), Some((5, "ada"))).into_details(today);
        let borrower = details.borrower.unwrap();
        assert_eq!(borrower.id, 5);
        assert_eq!(borrower.login, "ada");
        assert_eq!(borrower.last_name, "");
        assert!(details.is_overdue);
    }

    #[test]
    fn test_into_details_available_copy() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let details = row(LoanStatus::Available, None, None).into_details(today);
        assert!(details.borrower.is_none());
        assert!(!details.is_overdue);
        assert_eq!(details.instance.book_title, "The Call of the Wild");
    }
}
