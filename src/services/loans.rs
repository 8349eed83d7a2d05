//! Loan service: borrowed copies and librarian renewals

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstanceDetails, LoanStatus},
        forms::{proposed_renewal_date, RenewBookForm, RenewBookFormView},
        pagination::{PageQuery, PaginatedResponse},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies on loan to one user, soonest due first
    pub async fn borrowed_by(
        &self,
        user_id: i32,
        query: &PageQuery,
        today: NaiveDate,
    ) -> AppResult<PaginatedResponse<BookInstanceDetails>> {
        let total = self.repository.book_instances.count_on_loan_to(user_id).await?;
        let page = query.resolve(total)?;
        let instances = self
            .repository
            .book_instances
            .list_on_loan_to(user_id, &page, today)
            .await?;
        Ok(PaginatedResponse::new(instances, total, page))
    }

    /// Every copy currently on loan, soonest due first
    pub async fn all_borrowed(
        &self,
        query: &PageQuery,
        today: NaiveDate,
    ) -> AppResult<PaginatedResponse<BookInstanceDetails>> {
        let total = self
            .repository
            .book_instances
            .count_by_status(LoanStatus::OnLoan)
            .await?;
        let page = query.resolve(total)?;
        let instances = self.repository.book_instances.list_on_loan(&page, today).await?;
        Ok(PaginatedResponse::new(instances, total, page))
    }

    /// Renewal form for a copy, proposing three weeks from today
    pub async fn renewal_form(&self, id: Uuid, today: NaiveDate) -> AppResult<RenewBookFormView> {
        let book_instance = self.repository.book_instances.get_details(id, today).await?;
        Ok(RenewBookFormView {
            book_instance,
            renewal_date: Some(proposed_renewal_date(today)),
        })
    }

    /// Validate a submitted renewal and move the copy's due-back date.
    /// Nothing is written when validation fails.
    pub async fn renew(&self, id: Uuid, form: &RenewBookForm, today: NaiveDate) -> AppResult<NaiveDate> {
        let book_instance = self.repository.book_instances.get_details(id, today).await?;

        let renewal_date = form.validate_on(today)?;

        if book_instance.instance.status != LoanStatus::OnLoan {
            tracing::warn!(
                "Renewing book instance {} which is not on loan ({})",
                id,
                book_instance.instance.status
            );
        }

        self.repository
            .book_instances
            .update_due_back(id, renewal_date)
            .await?;

        tracing::info!(
            "Book instance {} renewed: due back {} (was {:?})",
            id,
            renewal_date,
            book_instance.instance.due_back
        );

        Ok(renewal_date)
    }
}
