pub mod accrual;

use chrono::{DateTime, Utc};

use crate::decimal::{Money, Rate};

pub use accrual::{days_elapsed, interest_due, SimpleDailyInterest, DAYS_PER_MONTH, GRACE_DAYS};

/// interest calculation result
#[derive(Debug, Clone, PartialEq)]
pub struct InterestCalculation {
    pub interest_amount: Money,
    pub daily_rate: Rate,
    pub days: u32,
    pub principal_base: Money,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

impl InterestCalculation {
    /// true when nothing has accrued over the interval
    pub fn is_nothing_due(&self) -> bool {
        self.days == 0
    }
}

/// trait for interest calculations
pub trait InterestCalculator {
    fn calculate_interest(
        &self,
        principal: Money,
        monthly_rate: Rate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> InterestCalculation;

    fn get_daily_rate(&self, monthly_rate: Rate) -> Rate;
}
