use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::interest::{InterestCalculation, InterestCalculator, SimpleDailyInterest};
use crate::types::{LoanId, LoanStatus};

const CALCULATOR: SimpleDailyInterest = SimpleDailyInterest;

/// settled interest covering `[period_start, period_end]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestPayment {
    pub amount: Money,
    pub paid_date: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

/// short-term loan accruing simple daily interest until closed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub principal: Money,
    pub monthly_rate: Rate,
    pub taken_date: DateTime<Utc>,

    // one-way latches
    pub principal_paid: bool,
    pub principal_paid_date: Option<DateTime<Utc>>,
    pub closed: bool,
    pub closed_date: Option<DateTime<Utc>>,

    // append-only, contiguous from taken_date
    pub interest_payments: Vec<InterestPayment>,
}

impl Loan {
    /// grant a new active loan taken at `now`
    pub fn grant(principal: Money, monthly_rate: Rate, now: DateTime<Utc>) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LedgerError::InvalidAmount {
                amount: principal,
                message: "principal must be greater than zero".to_string(),
            });
        }
        if principal.exceeds_max() {
            return Err(LedgerError::InvalidAmount {
                amount: principal,
                message: format!("principal must not exceed {}", Money::MAX),
            });
        }
        if monthly_rate.is_out_of_range() {
            return Err(LedgerError::InvalidRate { rate: monthly_rate });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            principal,
            monthly_rate,
            taken_date: now,
            principal_paid: false,
            principal_paid_date: None,
            closed: false,
            closed_date: None,
            interest_payments: Vec::new(),
        })
    }

    pub fn status(&self) -> LoanStatus {
        match (self.principal_paid, self.closed) {
            (_, true) => LoanStatus::Closed,
            (true, false) => LoanStatus::PrincipalPaid,
            (false, false) => LoanStatus::Active,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// where the next interest interval begins
    pub fn next_interest_start(&self) -> DateTime<Utc> {
        self.interest_payments
            .last()
            .map(|p| p.period_end)
            .unwrap_or(self.taken_date)
    }

    /// interest accrued on the unsettled interval ending at `now`
    pub fn outstanding_interest(&self, now: DateTime<Utc>) -> InterestCalculation {
        CALCULATOR.calculate_interest(self.principal, self.monthly_rate, self.next_interest_start(), now)
    }

    /// grace-adjusted days accrued since the last settlement
    pub fn days_outstanding(&self, now: DateTime<Utc>) -> u32 {
        if self.closed {
            return 0;
        }
        self.outstanding_interest(now).days
    }

    pub fn current_interest_due(&self, now: DateTime<Utc>) -> Money {
        if self.closed {
            return Money::ZERO;
        }
        self.outstanding_interest(now).interest_amount
    }

    pub fn total_interest_paid(&self) -> Money {
        self.interest_payments.iter().map(|p| p.amount).sum()
    }

    /// principal plus unsettled interest, zero once the principal is paid
    pub fn total_amount_owed(&self, now: DateTime<Utc>) -> Money {
        if self.principal_paid {
            return Money::ZERO;
        }
        self.principal + self.current_interest_due(now)
    }

    /// settle interest accrued through `now`.
    ///
    /// closes the loan when the principal was already paid.
    pub fn pay_interest(&mut self, now: DateTime<Utc>) -> Result<InterestPayment> {
        if self.closed {
            return Err(LedgerError::AlreadyClosed);
        }

        let calculation = self.outstanding_interest(now);
        if calculation.is_nothing_due() {
            return Err(LedgerError::NoInterestDue);
        }

        let payment = InterestPayment {
            amount: calculation.interest_amount,
            paid_date: now,
            period_start: calculation.period_start,
            period_end: now,
        };
        self.interest_payments.push(payment.clone());

        if self.principal_paid {
            self.close(now);
        }

        Ok(payment)
    }

    /// record the principal as repaid.
    ///
    /// refused while any interest is due; closes the loan when interest is
    /// already settled through `now`.
    pub fn mark_principal_paid(&mut self, now: DateTime<Utc>) -> Result<LoanStatus> {
        if self.principal_paid {
            return Err(LedgerError::AlreadyPaid);
        }

        let due = self.current_interest_due(now);
        if due.is_positive() {
            return Err(LedgerError::UnpaidInterest { due });
        }

        self.principal_paid = true;
        self.principal_paid_date = Some(now);

        let settled_through_now = self
            .interest_payments
            .last()
            .map(|p| p.period_end >= now)
            .unwrap_or(false);
        if settled_through_now {
            self.close(now);
        }

        Ok(self.status())
    }

    fn close(&mut self, now: DateTime<Utc>) {
        self.closed = true;
        self.closed_date = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal::Decimal;

    fn jan_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn ten_thousand(now: DateTime<Utc>) -> Loan {
        Loan::grant(Money::from_major(10_000), Rate::from_percentage(5), now).unwrap()
    }

    #[test]
    fn test_grant_rejects_non_positive_principal() {
        let err = Loan::grant(Money::ZERO, Rate::from_percentage(5), jan_first()).unwrap_err();
        assert_eq!(err.code(), "INVALID_AMOUNT");

        let err = Loan::grant(Money::from_major(-10), Rate::from_percentage(5), jan_first()).unwrap_err();
        assert_eq!(err.code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_grant_starts_active() {
        let loan = ten_thousand(jan_first());
        assert_eq!(loan.status(), LoanStatus::Active);
        assert_eq!(loan.taken_date, jan_first());
        assert!(loan.interest_payments.is_empty());
        assert_eq!(loan.next_interest_start(), jan_first());
    }

    #[test]
    fn test_pay_interest_then_principal_closes() {
        let time = SafeTimeProvider::new(TimeSource::Test(jan_first()));
        let control = time.test_control().unwrap();

        let mut loan = ten_thousand(time.now());
        control.advance(Duration::days(30));

        let payment = loan.pay_interest(time.now()).unwrap();
        assert_eq!(payment.amount, Money::from_minor(48_333));
        assert_eq!(payment.period_start, jan_first());
        assert_eq!(payment.period_end, time.now());
        assert_eq!(loan.interest_payments.len(), 1);
        assert_eq!(loan.status(), LoanStatus::Active);

        let status = loan.mark_principal_paid(time.now()).unwrap();
        assert_eq!(status, LoanStatus::Closed);
        assert_eq!(loan.closed_date, Some(time.now()));
        assert_eq!(loan.principal_paid_date, Some(time.now()));
    }

    #[test]
    fn test_principal_refused_while_interest_due() {
        let start = jan_first();
        let mut loan = ten_thousand(start);
        let before = loan.clone();

        let err = loan.mark_principal_paid(start + Duration::days(30)).unwrap_err();
        match err {
            LedgerError::UnpaidInterest { due } => assert_eq!(due, Money::from_minor(48_333)),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(loan, before);
    }

    #[test]
    fn test_no_interest_inside_grace_day() {
        let start = jan_first();
        let mut loan = ten_thousand(start);

        let err = loan.pay_interest(start + Duration::hours(23)).unwrap_err();
        assert_eq!(err.code(), "NO_INTEREST_DUE");
        assert!(loan.interest_payments.is_empty());
    }

    #[test]
    fn test_interest_intervals_are_contiguous() {
        let start = jan_first();
        let mut loan = ten_thousand(start);

        let first = loan.pay_interest(start + Duration::days(10)).unwrap();
        let second = loan.pay_interest(start + Duration::days(25)).unwrap();

        assert_eq!(first.period_start, start);
        assert_eq!(second.period_start, first.period_end);
        // 9 days then 14 days
        assert_eq!(first.amount, Money::from_minor(15_000));
        assert_eq!(second.amount, Money::from_minor(23_333));
        assert_eq!(loan.total_interest_paid(), Money::from_minor(38_333));
    }

    #[test]
    fn test_principal_paid_without_settlement_waits_for_interest() {
        let start = jan_first();
        let mut loan = ten_thousand(start);

        // inside the grace day nothing is due, but no interest has been settled either
        let status = loan.mark_principal_paid(start + Duration::hours(12)).unwrap();
        assert_eq!(status, LoanStatus::PrincipalPaid);
        assert_eq!(loan.total_amount_owed(start + Duration::days(5)), Money::ZERO);

        let err = loan.mark_principal_paid(start + Duration::days(1)).unwrap_err();
        assert_eq!(err.code(), "ALREADY_PAID");

        let payment = loan.pay_interest(start + Duration::days(3)).unwrap();
        assert_eq!(payment.amount, Money::from_minor(3_333));
        assert_eq!(loan.status(), LoanStatus::Closed);
    }

    #[test]
    fn test_closed_loan_rejects_interest_and_owes_nothing() {
        let start = jan_first();
        let mut loan = ten_thousand(start);
        let paid_at = start + Duration::days(30);
        loan.pay_interest(paid_at).unwrap();
        loan.mark_principal_paid(paid_at).unwrap();

        let later = paid_at + Duration::days(10);
        assert_eq!(loan.pay_interest(later).unwrap_err().code(), "ALREADY_CLOSED");
        assert_eq!(loan.current_interest_due(later), Money::ZERO);
        assert_eq!(loan.total_amount_owed(later), Money::ZERO);
        assert_eq!(loan.days_outstanding(later), 0);
    }

    #[test]
    fn test_total_amount_owed_includes_interest() {
        let start = jan_first();
        let loan = ten_thousand(start);
        let now = start + Duration::days(30);

        assert_eq!(loan.current_interest_due(now), Money::from_minor(48_333));
        assert_eq!(loan.total_amount_owed(now), Money::from_minor(1_048_333));
        assert_eq!(loan.days_outstanding(now), 29);
    }

    #[test]
    fn test_grant_rejects_out_of_range_terms() {
        let huge = Money::from_decimal(Decimal::from_str_exact("10000000000000000000000000000").unwrap());
        let err = Loan::grant(huge, Rate::from_percentage(5), jan_first()).unwrap_err();
        assert_eq!(err.code(), "INVALID_AMOUNT");

        let err = Loan::grant(Money::from_major(100), Rate::from_percentage(500), jan_first()).unwrap_err();
        assert_eq!(err.code(), "INVALID_RATE");
    }

    #[test]
    fn test_largest_loan_accrues_without_overflow() {
        let start = jan_first();
        let loan = Loan::grant(Money::MAX, Rate::MAX_MONTHLY, start).unwrap();
        let now = start + Duration::days(400);

        // 1e12 * 1.00 * 399 / 30
        assert_eq!(loan.current_interest_due(now), Money::from_str_exact("13300000000000").unwrap());
        assert_eq!(loan.total_amount_owed(now), Money::from_str_exact("14300000000000").unwrap());
    }

    #[test]
    fn test_interest_never_goes_backward() {
        let start = jan_first();
        let mut loan = ten_thousand(start);
        let paid_at = start + Duration::days(10);
        loan.pay_interest(paid_at).unwrap();
        let before = loan.clone();

        // clock stepped back behind the last settlement
        let err = loan.pay_interest(paid_at - Duration::days(3)).unwrap_err();
        assert!(matches!(err, LedgerError::NoInterestDue));
        assert_eq!(loan.interest_payments.len(), 1);
        assert_eq!(loan.next_interest_start(), paid_at);
        assert_eq!(loan, before);
        assert_eq!(loan.current_interest_due(paid_at - Duration::days(3)), Money::ZERO);
    }

    #[test]
    fn test_stored_rate_is_a_percentage() {
        let loan = ten_thousand(jan_first());
        let value = serde_json::to_value(&loan).unwrap();
        assert_eq!(value["monthly_rate"], "5");

        let mut raw = value.clone();
        raw["monthly_rate"] = serde_json::json!(5);
        let back: Loan = serde_json::from_value(raw).unwrap();
        assert_eq!(back.monthly_rate, Rate::from_percentage(5));
        assert_eq!(
            back.current_interest_due(jan_first() + Duration::days(30)),
            Money::from_minor(48_333)
        );
    }

    #[test]
    fn test_json_round_trip_keeps_latches() {
        let start = jan_first();
        let mut loan = ten_thousand(start);
        loan.pay_interest(start + Duration::days(30)).unwrap();

        let json = serde_json::to_string(&loan).unwrap();
        let back: Loan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, loan);
    }
}
