use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::period::Period;
use crate::types::{LoanId, MemberId, Role};

/// all events recorded by ledger operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // member events
    MemberRegistered {
        member_id: MemberId,
        role: Role,
        monthly_amount: Money,
        timestamp: DateTime<Utc>,
    },

    // dues events
    PaymentCreated {
        member_id: MemberId,
        period: Period,
        timestamp: DateTime<Utc>,
    },
    PaymentMarked {
        member_id: MemberId,
        period: Period,
        paid: bool,
        timestamp: DateTime<Utc>,
    },

    // loan events
    LoanGranted {
        member_id: MemberId,
        loan_id: LoanId,
        principal: Money,
        monthly_rate: Rate,
        timestamp: DateTime<Utc>,
    },
    InterestPaid {
        member_id: MemberId,
        loan_id: LoanId,
        amount: Money,
        days: u32,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    },
    PrincipalPaid {
        member_id: MemberId,
        loan_id: LoanId,
        principal: Money,
        timestamp: DateTime<Utc>,
    },
    LoanClosed {
        member_id: MemberId,
        loan_id: LoanId,
        total_interest_paid: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
