//! Submitted forms: loan renewal and author records

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{author::Author, book_instance::BookInstanceDetails};

/// Days ahead proposed when a librarian opens the renewal form
pub const RENEWAL_PROPOSAL_DAYS: i64 = 21;

/// Furthest a loan can be renewed, in days from today
pub const RENEWAL_MAX_DAYS: i64 = 28;

/// Initial value of the death date on the author creation form
pub const AUTHOR_DEATH_DATE_INITIAL: NaiveDate = match NaiveDate::from_ymd_opt(1916, 12, 10) {
    Some(date) => date,
    None => panic!("invalid initial death date"),
};

/// The server's current calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Renewal
// ---------------------------------------------------------------------------

/// Why a renewal date was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalDateError {
    InPast,
    TooFarAhead,
}

impl RenewalDateError {
    pub fn message(&self) -> &'static str {
        match self {
            RenewalDateError::InPast => "Invalid date - renewal in past",
            RenewalDateError::TooFarAhead => "Invalid date - renewal more than 4 weeks ahead",
        }
    }
}

impl From<RenewalDateError> for ValidationError {
    fn from(err: RenewalDateError) -> Self {
        let code = match err {
            RenewalDateError::InPast => "renewal_in_past",
            RenewalDateError::TooFarAhead => "renewal_too_far_ahead",
        };
        let mut error = ValidationError::new(code);
        error.message = Some(err.message().into());
        error
    }
}

/// A renewal date is valid from `today` through `today + 28 days`, inclusive
pub fn check_renewal_date(date: NaiveDate, today: NaiveDate) -> Result<(), RenewalDateError> {
    if date < today {
        return Err(RenewalDateError::InPast);
    }
    if date > today + Duration::days(RENEWAL_MAX_DAYS) {
        return Err(RenewalDateError::TooFarAhead);
    }
    Ok(())
}

/// Date proposed on the renewal form
pub fn proposed_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(RENEWAL_PROPOSAL_DAYS)
}

/// Renewal form submission
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RenewBookForm {
    /// New due-back date (YYYY-MM-DD), between today and 4 weeks ahead
    pub renewal_date: Option<NaiveDate>,
}

impl RenewBookForm {
    /// Validate against an explicit `today`
    pub fn validate_on(&self, today: NaiveDate) -> Result<NaiveDate, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match self.renewal_date {
            None => {
                let mut err = ValidationError::new("required");
                err.message = Some("This field is required.".into());
                errors.add("renewal_date", err);
            }
            Some(date) => match check_renewal_date(date, today) {
                Ok(()) => return Ok(date),
                Err(e) => errors.add("renewal_date", e.into()),
            },
        }

        Err(errors)
    }
}

/// Renewal form as shown to the librarian
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewBookFormView {
    pub book_instance: BookInstanceDetails,
    /// Proposed (or re-submitted) renewal date
    pub renewal_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

/// Author create/update submission.
///
/// `date_of_death` distinguishes a missing key (form initial left untouched)
/// from an explicit `null` (field cleared).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "First name is required (at most 100 characters)"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Last name is required (at most 100 characters)"))]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub date_of_death: Option<Option<NaiveDate>>,
}

/// Field values written to an author record, also used as form initial data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorValues {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorValues {
    /// Initial data of an empty creation form
    pub fn create_initial() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: None,
            date_of_death: Some(AUTHOR_DEATH_DATE_INITIAL),
        }
    }
}

impl From<&Author> for AuthorValues {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        }
    }
}

impl AuthorForm {
    /// Values for a new author: an absent death date keeps the form initial
    pub fn into_create_values(self) -> AuthorValues {
        let date_of_death = match self.date_of_death {
            None => Some(AUTHOR_DEATH_DATE_INITIAL),
            Some(submitted) => submitted,
        };
        AuthorValues {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth: self.date_of_birth,
            date_of_death,
        }
    }

    /// Values for an existing author: absent and null both mean no date
    pub fn into_update_values(self) -> AuthorValues {
        AuthorValues {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death.flatten(),
        }
    }
}

/// Author form as shown before submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorFormView {
    /// Record being edited, absent on creation
    pub author_id: Option<i32>,
    pub initial: AuthorValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_renewal_boundaries() {
        for today in [date(2024, 1, 1), date(2024, 2, 15), date(2023, 12, 31), date(2024, 2, 29)] {
            assert_eq!(check_renewal_date(today, today), Ok(()));
            assert_eq!(
                check_renewal_date(today - Duration::days(1), today),
                Err(RenewalDateError::InPast)
            );
            assert_eq!(check_renewal_date(today + Duration::days(28), today), Ok(()));
            assert_eq!(
                check_renewal_date(today + Duration::days(29), today),
                Err(RenewalDateError::TooFarAhead)
            );
        }
    }

    #[test]
    fn test_proposed_date_is_three_weeks_and_valid() {
        let today = date(2024, 3, 1);
        let proposed = proposed_renewal_date(today);
        assert_eq!(proposed, date(2024, 3, 22));
        assert!(check_renewal_date(proposed, today).is_ok());
    }

    #[test]
    fn test_renew_form_field_errors() {
        let today = date(2024, 6, 1);

        let form = RenewBookForm { renewal_date: Some(date(2024, 5, 31)) };
        let errors = form.validate_on(today).unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["renewal_date"][0].code, "renewal_in_past");

        let form = RenewBookForm { renewal_date: None };
        let errors = form.validate_on(today).unwrap_err();
        assert_eq!(errors.field_errors()["renewal_date"][0].code, "required");

        let form = RenewBookForm { renewal_date: Some(date(2024, 6, 29)) };
        assert_eq!(form.validate_on(today).unwrap(), date(2024, 6, 29));
    }

    #[test]
    fn test_create_initial_death_date() {
        let initial = AuthorValues::create_initial();
        assert_eq!(initial.date_of_death, Some(date(1916, 12, 10)));
    }

    #[test]
    fn test_absent_death_date_keeps_initial_on_create() {
        let form: AuthorForm = serde_json::from_value(serde_json::json!({
            "first_name": "Jane",
            "last_name": "Austen",
            "date_of_birth": "1775-12-16"
        }))
        .unwrap();
        assert!(form.validate().is_ok());

        let values = form.into_create_values();
        assert_eq!(values.date_of_birth, Some(date(1775, 12, 16)));
        assert_eq!(values.date_of_death, Some(AUTHOR_DEATH_DATE_INITIAL));
    }

    #[test]
    fn test_null_death_date_clears_it() {
        let form: AuthorForm = serde_json::from_value(serde_json::json!({
            "first_name": "Jane",
            "last_name": "Austen",
            "date_of_death": null
        }))
        .unwrap();
        assert_eq!(form.clone().into_create_values().date_of_death, None);
        assert_eq!(form.into_update_values().date_of_death, None);
    }

    #[test]
    fn test_update_ignores_create_initial() {
        let form: AuthorForm = serde_json::from_value(serde_json::json!({
            "first_name": "Jane",
            "last_name": "Austen"
        }))
        .unwrap();
        assert_eq!(form.into_update_values().date_of_death, None);
    }

    #[test]
    fn test_missing_names_are_field_errors() {
        let form: AuthorForm = serde_json::from_value(serde_json::json!({})).unwrap();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
    }
}
