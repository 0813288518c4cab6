use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a member
pub type MemberId = Uuid;

/// unique identifier for a loan, stable within its member
pub type LoanId = Uuid;

/// unique identifier for an expense
pub type ExpenseId = Uuid;

/// member role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
        }
    }
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// principal unpaid
    Active,
    /// principal paid, interest may still be outstanding
    PrincipalPaid,
    /// principal and all interest through closure settled
    Closed,
}
