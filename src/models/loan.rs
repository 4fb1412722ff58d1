//! Loan model and related types

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use super::Timestamp;

/// Loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

#[derive(Debug, Error)]
#[error("unknown loan status '{0}'")]
pub struct UnknownLoanStatus(String);

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
        }
    }
}

impl TryFrom<String> for LoanStatus {
    type Error = UnknownLoanStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(UnknownLoanStatus(value)),
        }
    }
}

/// Optional borrower e-mail.
///
/// Read back through `COALESCE(borrower_email, '')`; the empty string is
/// absent. Serialized as a plain string or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BorrowerEmail(pub Option<String>);

impl BorrowerEmail {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Option<String>> for BorrowerEmail {
    fn from(value: Option<String>) -> Self {
        Self(value.filter(|email| !email.is_empty()))
    }
}

impl TryFrom<String> for BorrowerEmail {
    type Error = Infallible;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Some(value).into())
    }
}

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    pub borrower_name: String,
    #[sqlx(try_from = "String")]
    #[schema(value_type = Option<String>)]
    pub borrower_email: BorrowerEmail,
    #[sqlx(try_from = "String")]
    #[schema(value_type = String, example = "2024-05-01 10:00:00")]
    pub start_date: Timestamp,
    #[sqlx(try_from = "String")]
    #[schema(value_type = String, example = "2024-05-04 10:00:00")]
    pub due_date: Timestamp,
    #[sqlx(try_from = "String")]
    pub status: LoanStatus,
}

/// Loan joined with the borrowed book's title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub loan: Loan,
    pub book_title: String,
}

/// Loan row about to be inserted
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub book_id: i64,
    pub borrower_name: String,
    pub borrower_email: Option<String>,
    pub start_date: Timestamp,
    pub due_date: Timestamp,
}

/// Create loan request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoan {
    #[validate(required, length(min = 1))]
    pub borrower_name: Option<String>,
    #[validate(email)]
    pub borrower_email: Option<String>,
    /// Loan duration in calendar days
    #[validate(required, range(min = 1))]
    pub days: Option<i64>,
}

impl CreateLoan {
    /// Blank e-mails are treated as absent
    pub fn normalized(mut self) -> Self {
        self.borrower_email = self.borrower_email.filter(|email| !email.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [LoanStatus::Active, LoanStatus::Returned] {
            assert_eq!(LoanStatus::try_from(status.as_str().to_string()).unwrap(), status);
        }
        assert!(LoanStatus::try_from("activo".to_string()).is_err());
    }

    #[test]
    fn test_request_validation() {
        let ok: CreateLoan =
            serde_json::from_str(r#"{"borrowerName":"Pili","borrowerEmail":"","days":3}"#).unwrap();
        let ok = ok.normalized();
        assert!(ok.validate().is_ok());
        assert!(ok.borrower_email.is_none());

        let zero_days: CreateLoan = serde_json::from_str(r#"{"borrowerName":"Pili","days":0}"#).unwrap();
        assert!(zero_days.validate().is_err());

        let no_name: CreateLoan = serde_json::from_str(r#"{"days":3}"#).unwrap();
        assert!(no_name.validate().is_err());

        let bad_email: CreateLoan =
            serde_json::from_str(r#"{"borrowerName":"Pili","borrowerEmail":"nope","days":3}"#).unwrap();
        assert!(bad_email.normalized().validate().is_err());
    }

    #[test]
    fn test_details_serialize_flat() {
        let details = LoanDetails {
            loan: Loan {
                id: 7,
                book_id: 1,
                borrower_name: "Pili".into(),
                borrower_email: BorrowerEmail::default(),
                start_date: "2024-05-01 10:00:00".parse().unwrap(),
                due_date: "2024-05-04 10:00:00".parse().unwrap(),
                status: LoanStatus::Active,
            },
            book_title: "Clean Code".into(),
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["status"], "active");
        assert_eq!(json["book_title"], "Clean Code");
        assert_eq!(json["due_date"], "2024-05-04 10:00:00");
        assert!(json["borrower_email"].is_null());
    }

    #[test]
    fn test_email_column_decoding() {
        assert!(BorrowerEmail::try_from(String::new()).unwrap().is_none());
        let email = BorrowerEmail::try_from("pili@example.com".to_string()).unwrap();
        assert_eq!(email.as_deref(), Some("pili@example.com"));
        assert_eq!(serde_json::to_value(&email).unwrap(), "pili@example.com");
    }
}
