use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::decimal::{round2, Money, Rate};
use crate::interest::{InterestCalculation, InterestCalculator};

/// every month counts as 30 days when converting the monthly rate to a daily one
pub const DAYS_PER_MONTH: u32 = 30;

/// leading days of each interval that accrue nothing
pub const GRACE_DAYS: i64 = 1;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// whole days of accrual between two instants.
///
/// partial days round up, then the grace day is dropped; never negative.
pub fn days_elapsed(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    let whole_days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u32::try_from((whole_days - GRACE_DAYS).max(0)).unwrap_or(u32::MAX)
}

/// simple daily interest on `principal` between two instants, rounded half-up to cents
pub fn interest_due(
    principal: Money,
    monthly_rate: Rate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Money {
    accrue(principal, monthly_rate, days_elapsed(start, end))
}

fn accrue(principal: Money, monthly_rate: Rate, days: u32) -> Money {
    if days == 0 {
        return Money::ZERO;
    }
    // multiply first so the only rounding is the final one
    let numerator = principal.as_decimal() * monthly_rate.as_decimal() * Decimal::from(days);
    Money::from_decimal(round2(numerator / Decimal::from(DAYS_PER_MONTH)))
}

/// simple (non-compounding) interest on a 30-day month with one grace day per interval
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleDailyInterest;

impl SimpleDailyInterest {
    pub fn new() -> Self {
        Self
    }
}

impl InterestCalculator for SimpleDailyInterest {
    fn calculate_interest(
        &self,
        principal: Money,
        monthly_rate: Rate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> InterestCalculation {
        let days = days_elapsed(start, end);

        InterestCalculation {
            interest_amount: accrue(principal, monthly_rate, days),
            daily_rate: self.get_daily_rate(monthly_rate),
            days,
            principal_base: principal,
            period_start: start,
            period_end: end,
        }
    }

    fn get_daily_rate(&self, monthly_rate: Rate) -> Rate {
        Rate::from_decimal(monthly_rate.as_decimal() / Decimal::from(DAYS_PER_MONTH))
    }
}
