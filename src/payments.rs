//! Dues payments bucketed by billing period.
//!
//! Each member has at most one [`Payment`] per period. Records are created the
//! first time a period is queried or marked and are never removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::member::Member;
use crate::period::{parse_period, Period};

/// dues payment for one billing period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub period: Period,
    pub paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn unpaid(period: Period) -> Self {
        Self {
            period,
            paid: false,
            paid_date: None,
        }
    }

    /// set the paid flag; the date follows the flag
    pub fn set_paid(&mut self, paid: bool, now: DateTime<Utc>) {
        self.paid = paid;
        self.paid_date = if paid { Some(now) } else { None };
    }
}

/// find the payment for `period`, creating an unpaid one if absent.
///
/// returns the record and whether it was created.
pub fn get_or_create(payments: &mut Vec<Payment>, period: Period) -> (&mut Payment, bool) {
    let existing = payments.iter().position(|p| p.period == period);
    match existing {
        Some(index) => (&mut payments[index], false),
        None => {
            payments.push(Payment::unpaid(period));
            let last = payments.len() - 1;
            (&mut payments[last], true)
        }
    }
}

/// read-only lookup, never creates
pub fn payment_for(member: &Member, period: Period) -> Option<&Payment> {
    member.payments.iter().find(|p| p.period == period)
}

/// mark the member's payment for `period_input` as paid or unpaid
pub fn mark_paid<'a>(
    member: &'a mut Member,
    period_input: &str,
    paid: bool,
    now: DateTime<Utc>,
) -> Result<&'a Payment> {
    let period = parse_period(period_input)?;
    let (payment, _) = get_or_create(&mut member.payments, period);
    payment.set_paid(paid, now);
    Ok(&*payment)
}

/// the member's payment for the period containing `now`, created if absent
pub fn current_period_payment(member: &mut Member, now: DateTime<Utc>) -> (&Payment, bool) {
    let (payment, created) = get_or_create(&mut member.payments, Period::current(now));
    (&*payment, created)
}

/// periods the member has paid
pub fn paid_periods(member: &Member) -> impl Iterator<Item = Period> + '_ {
    member.payments.iter().filter(|p| p.paid).map(|p| p.period)
}

/// all payments ordered by period
pub fn payment_history(member: &Member) -> Vec<Payment> {
    let mut history = member.payments.clone();
    history.sort_by_key(|p| p.period);
    history
}
