use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::loan::Loan;
use crate::payments::Payment;
use crate::types::{ExpenseId, LoanId, MemberId, Role};

/// circle member; owns its dues payments and loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub contact_number: String,
    pub address: String,
    /// fixed recurring due per period
    pub monthly_amount: Money,
    pub role: Role,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub loans: Vec<Loan>,
}

impl Member {
    pub fn new(
        name: impl Into<String>,
        contact_number: impl Into<String>,
        address: impl Into<String>,
        monthly_amount: Money,
        role: Role,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidInput {
                message: "member name must not be empty".to_string(),
            });
        }
        if monthly_amount.is_negative() || monthly_amount.exceeds_max() {
            return Err(LedgerError::InvalidAmount {
                amount: monthly_amount,
                message: format!("monthly due must be between 0 and {}", Money::MAX),
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            contact_number: contact_number.into(),
            address: address.into(),
            monthly_amount,
            role,
            payments: Vec::new(),
            loans: Vec::new(),
        })
    }

    pub fn loan_mut(&mut self, loan_id: LoanId) -> Result<&mut Loan> {
        let member_id = self.id;
        self.loans
            .iter_mut()
            .find(|l| l.id == loan_id)
            .ok_or(LedgerError::LoanNotFound { member_id, loan_id })
    }

    pub fn total_interest_paid(&self) -> Money {
        self.loans.iter().map(Loan::total_interest_paid).sum()
    }
}

/// recorded circle expense, owned by the expense bookkeeping collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Money,
    pub date: DateTime<Utc>,
}

impl Expense {
    pub fn new(description: impl Into<String>, amount: Money, date: DateTime<Utc>) -> Result<Self> {
        if amount.is_negative() || amount.exceeds_max() {
            return Err(LedgerError::InvalidAmount {
                amount,
                message: format!("expense must be between 0 and {}", Money::MAX),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            date,
        })
    }
}
