use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::{LoanId, MemberId};

/// failures raised by a persistence collaborator
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid amount: {amount}, {message}")]
    InvalidAmount {
        amount: Money,
        message: String,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidRate {
        rate: Rate,
    },

    #[error("invalid period '{input}': {reason}")]
    InvalidPeriod {
        input: String,
        reason: String,
    },

    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("member not found: {id}")]
    MemberNotFound {
        id: MemberId,
    },

    #[error("loan {loan_id} not found for member {member_id}")]
    LoanNotFound {
        member_id: MemberId,
        loan_id: LoanId,
    },

    #[error("interest of {due} must be paid before the principal")]
    UnpaidInterest {
        due: Money,
    },

    #[error("loan principal already paid")]
    AlreadyPaid,

    #[error("loan already closed")]
    AlreadyClosed,

    #[error("no interest has accrued since the last settlement")]
    NoInterestDue,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// how a caller should treat an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    BusinessRule,
    Storage,
}

impl ErrorClass {
    /// http status equivalent
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorClass::Validation | ErrorClass::BusinessRule => 400,
            ErrorClass::NotFound => 404,
            ErrorClass::Storage => 500,
        }
    }
}

impl LedgerError {
    /// machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount { .. } => "INVALID_AMOUNT",
            LedgerError::InvalidRate { .. } => "INVALID_RATE",
            LedgerError::InvalidPeriod { .. } => "INVALID_PERIOD",
            LedgerError::InvalidInput { .. } => "INVALID_INPUT",
            LedgerError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            LedgerError::MemberNotFound { .. } => "MEMBER_NOT_FOUND",
            LedgerError::LoanNotFound { .. } => "LOAN_NOT_FOUND",
            LedgerError::UnpaidInterest { .. } => "UNPAID_INTEREST",
            LedgerError::AlreadyPaid => "ALREADY_PAID",
            LedgerError::AlreadyClosed => "ALREADY_CLOSED",
            LedgerError::NoInterestDue => "NO_INTEREST_DUE",
            LedgerError::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            LedgerError::InvalidAmount { .. }
            | LedgerError::InvalidRate { .. }
            | LedgerError::InvalidPeriod { .. }
            | LedgerError::InvalidInput { .. }
            | LedgerError::InvalidConfiguration { .. } => ErrorClass::Validation,
            LedgerError::MemberNotFound { .. } | LedgerError::LoanNotFound { .. } => {
                ErrorClass::NotFound
            }
            LedgerError::UnpaidInterest { .. }
            | LedgerError::AlreadyPaid
            | LedgerError::AlreadyClosed
            | LedgerError::NoInterestDue => ErrorClass::BusinessRule,
            LedgerError::Storage(_) => ErrorClass::Storage,
        }
    }

    pub(crate) fn invalid_period(input: &str, reason: impl Into<String>) -> Self {
        LedgerError::InvalidPeriod {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rules_map_to_400() {
        let err = LedgerError::UnpaidInterest { due: Money::from_minor(48_333) };
        assert_eq!(err.code(), "UNPAID_INTEREST");
        assert_eq!(err.class(), ErrorClass::BusinessRule);
        assert_eq!(err.class().status_code(), 400);
        assert_eq!(err.to_string(), "interest of 483.33 must be paid before the principal");
    }

    #[test]
    fn test_storage_errors_are_500() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: LedgerError = StorageError::from(io).into();
        assert_eq!(err.code(), "STORAGE_ERROR");
        assert_eq!(err.class().status_code(), 500);
    }

    #[test]
    fn test_not_found_is_404() {
        let err = LedgerError::MemberNotFound { id: uuid::Uuid::new_v4() };
        assert_eq!(err.class().status_code(), 404);
    }
}
