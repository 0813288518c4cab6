pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod loan;
pub mod member;
pub mod payments;
pub mod period;
pub mod service;
pub mod store;
pub mod types;
pub mod views;

// re-export key types
pub use config::LedgerConfig;
pub use decimal::{Money, Rate};
pub use errors::{ErrorClass, LedgerError, Result, StorageError};
pub use events::{Event, EventStore};
pub use interest::{
    days_elapsed, interest_due, InterestCalculation, InterestCalculator, SimpleDailyInterest,
    DAYS_PER_MONTH, GRACE_DAYS,
};
pub use loan::{InterestPayment, Loan};
pub use member::{Expense, Member};
pub use payments::Payment;
pub use period::{parse_period, parse_period_label, period_label, period_range_label, Period};
pub use service::LedgerService;
pub use store::{InMemoryStore, JsonFileStore, MemberStore, StorageResult};
pub use types::{ExpenseId, LoanId, LoanStatus, MemberId, Role};
pub use views::{CollectionSummary, LoanView, MemberView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
