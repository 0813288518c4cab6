//! Serializable read models handed to the outer layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::loan::{InterestPayment, Loan};
use crate::member::Member;
use crate::payments::Payment;
use crate::period::Period;
use crate::types::{LoanId, LoanStatus, MemberId, Role};

/// loan annotated with figures as of `as_of`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub status: LoanStatus,
    pub principal: Money,
    pub monthly_rate: Rate,
    pub taken_date: DateTime<Utc>,
    pub principal_paid: bool,
    pub principal_paid_date: Option<DateTime<Utc>>,
    pub closed: bool,
    pub closed_date: Option<DateTime<Utc>>,
    pub interest_payments: Vec<InterestPayment>,
    pub interest_accrual_start: DateTime<Utc>,
    pub days_outstanding: u32,
    pub current_interest_due: Money,
    pub total_interest_paid: Money,
    pub total_amount_owed: Money,
    pub as_of: DateTime<Utc>,
}

impl LoanView {
    pub fn from_loan(loan: &Loan, as_of: DateTime<Utc>) -> Self {
        LoanView {
            id: loan.id,
            status: loan.status(),
            principal: loan.principal,
            monthly_rate: loan.monthly_rate,
            taken_date: loan.taken_date,
            principal_paid: loan.principal_paid,
            principal_paid_date: loan.principal_paid_date,
            closed: loan.closed,
            closed_date: loan.closed_date,
            interest_payments: loan.interest_payments.clone(),
            interest_accrual_start: loan.next_interest_start(),
            days_outstanding: loan.days_outstanding(as_of),
            current_interest_due: loan.current_interest_due(as_of),
            total_interest_paid: loan.total_interest_paid(),
            total_amount_owed: loan.total_amount_owed(as_of),
            as_of,
        }
    }
}

/// member profile with dues history and annotated loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: MemberId,
    pub name: String,
    pub contact_number: String,
    pub address: String,
    pub role: Role,
    pub monthly_amount: Money,
    pub current_period: Period,
    pub current_period_paid: bool,
    pub payments: Vec<Payment>,
    pub loans: Vec<LoanView>,
    pub total_owed: Money,
}

impl MemberView {
    pub fn from_member(member: &Member, as_of: DateTime<Utc>) -> Self {
        let current_period = Period::current(as_of);
        let loans: Vec<LoanView> = member.loans.iter().map(|l| LoanView::from_loan(l, as_of)).collect();
        let total_owed = loans.iter().map(|l| l.total_amount_owed).sum();

        MemberView {
            id: member.id,
            name: member.name.clone(),
            contact_number: member.contact_number.clone(),
            address: member.address.clone(),
            role: member.role,
            monthly_amount: member.monthly_amount,
            current_period,
            current_period_paid: crate::payments::payment_for(member, current_period)
                .map(|p| p.paid)
                .unwrap_or(false),
            payments: crate::payments::payment_history(member),
            loans,
            total_owed,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// circle-wide totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub period: Period,
    pub period_range: String,
    pub members_counted: usize,
    pub members_paid: usize,
    /// dues collected for `period`
    pub dues_collected: Money,
    /// all interest ever settled
    pub interest_collected: Money,
    /// all recorded expenses
    pub expenses: Money,
    pub net_balance: Money,
    pub outstanding_principal: Money,
}

impl CollectionSummary {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
