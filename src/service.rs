//! Ledger operations exposed to the outer (http) layer.
//!
//! Every mutating operation is one load, an in-memory change through the loan
//! lifecycle or payment ledger, and one save. Nothing is saved when the change
//! is rejected. "now" is read once per operation from the injected time
//! provider and handed to the core explicitly.

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::instrument;

use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{ErrorClass, LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::interest::days_elapsed;
use crate::loan::{InterestPayment, Loan};
use crate::member::Member;
use crate::payments::{self, Payment};
use crate::period::{parse_period, Period};
use crate::store::MemberStore;
use crate::types::{LoanId, MemberId, Role};
use crate::views::{CollectionSummary, LoanView, MemberView};

pub struct LedgerService<'t, S: MemberStore> {
    store: S,
    config: LedgerConfig,
    time: &'t SafeTimeProvider,
    events: EventStore,
}

impl<'t, S: MemberStore> LedgerService<'t, S> {
    pub fn new(store: S, config: LedgerConfig, time: &'t SafeTimeProvider) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            time,
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn now(&self) -> DateTime<Utc> {
        self.time.now()
    }

    fn load(&self, member_id: MemberId) -> Result<Member> {
        self.store
            .load_member(member_id)?
            .ok_or(LedgerError::MemberNotFound { id: member_id })
    }

    #[instrument(skip(self, contact_number, address))]
    pub fn register_member(
        &mut self,
        name: &str,
        contact_number: &str,
        address: &str,
        monthly_amount: Money,
        role: Role,
    ) -> Result<Member> {
        let now = self.now();
        let member = Member::new(name, contact_number, address, monthly_amount, role)?;
        self.store.save_member(&member)?;

        self.events.emit(Event::MemberRegistered {
            member_id: member.id,
            role,
            monthly_amount,
            timestamp: now,
        });
        tracing::info!(member_id = %member.id, %role, "member registered");
        Ok(member)
    }

    /// mark dues for `period_input` (short label, range label or iso date)
    #[instrument(skip(self))]
    pub fn mark_payment(&mut self, member_id: MemberId, period_input: &str, paid: bool) -> Result<Payment> {
        let now = self.now();
        let mut member = self.load(member_id)?;
        let payment = payments::mark_paid(&mut member, period_input, paid, now)?.clone();
        self.store.save_member(&member)?;

        self.events.emit(Event::PaymentMarked {
            member_id,
            period: payment.period,
            paid,
            timestamp: now,
        });
        tracing::info!(%member_id, period = %payment.period, paid, "dues payment marked");
        Ok(payment)
    }

    /// payment for the current period, created on first query
    pub fn current_payment(&mut self, member_id: MemberId) -> Result<Payment> {
        let period = Period::current(self.now());
        self.payment_in(member_id, period)
    }

    /// payment for `period_input`, created on first query
    pub fn payment_status(&mut self, member_id: MemberId, period_input: &str) -> Result<Payment> {
        let period = parse_period(period_input)?;
        self.payment_in(member_id, period)
    }

    fn payment_in(&mut self, member_id: MemberId, period: Period) -> Result<Payment> {
        let now = self.now();
        let mut member = self.load(member_id)?;
        let (payment, created) = payments::get_or_create(&mut member.payments, period);
        let payment = payment.clone();

        if created {
            self.store.save_member(&member)?;
            self.events.emit(Event::PaymentCreated {
                member_id,
                period,
                timestamp: now,
            });
            tracing::debug!(%member_id, %period, "dues payment record created");
        }
        Ok(payment)
    }

    /// grant a loan at the configured default rate
    pub fn grant_loan(&mut self, member_id: MemberId, principal: Money) -> Result<Loan> {
        let rate = self.config.default_monthly_rate;
        self.grant_loan_with_rate(member_id, principal, rate)
    }

    #[instrument(skip(self))]
    pub fn grant_loan_with_rate(&mut self, member_id: MemberId, principal: Money, monthly_rate: Rate) -> Result<Loan> {
        let now = self.now();
        let mut member = self.load(member_id)?;
        let loan = Loan::grant(principal, monthly_rate, now).map_err(|e| rejected(e, member_id, None))?;
        member.loans.push(loan.clone());
        self.store.save_member(&member)?;

        self.events.emit(Event::LoanGranted {
            member_id,
            loan_id: loan.id,
            principal,
            monthly_rate,
            timestamp: now,
        });
        tracing::info!(%member_id, loan_id = %loan.id, %principal, %monthly_rate, "loan granted");
        Ok(loan)
    }

    /// settle interest accrued on the loan through now
    #[instrument(skip(self))]
    pub fn pay_loan_interest(&mut self, member_id: MemberId, loan_id: LoanId) -> Result<InterestPayment> {
        let now = self.now();
        let mut member = self.load(member_id)?;
        let loan = member.loan_mut(loan_id)?;
        let payment = loan.pay_interest(now).map_err(|e| rejected(e, member_id, Some(loan_id)))?;
        let closed = loan.is_closed();
        let total_interest_paid = loan.total_interest_paid();
        self.store.save_member(&member)?;

        self.events.emit(Event::InterestPaid {
            member_id,
            loan_id,
            amount: payment.amount,
            days: days_elapsed(payment.period_start, payment.period_end),
            period_start: payment.period_start,
            period_end: payment.period_end,
        });
        tracing::info!(%member_id, %loan_id, amount = %payment.amount, "loan interest paid");

        if closed {
            self.emit_closed(member_id, loan_id, total_interest_paid, now);
        }
        Ok(payment)
    }

    /// record the loan's principal as repaid; refused while interest is due
    #[instrument(skip(self))]
    pub fn mark_loan_principal_paid(&mut self, member_id: MemberId, loan_id: LoanId) -> Result<LoanView> {
        let now = self.now();
        let mut member = self.load(member_id)?;
        let loan = member.loan_mut(loan_id)?;
        loan.mark_principal_paid(now).map_err(|e| rejected(e, member_id, Some(loan_id)))?;
        let view = LoanView::from_loan(loan, now);
        self.store.save_member(&member)?;

        self.events.emit(Event::PrincipalPaid {
            member_id,
            loan_id,
            principal: view.principal,
            timestamp: now,
        });
        tracing::info!(%member_id, %loan_id, principal = %view.principal, "loan principal paid");

        if view.closed {
            self.emit_closed(member_id, loan_id, view.total_interest_paid, now);
        }
        Ok(view)
    }

    fn emit_closed(&mut self, member_id: MemberId, loan_id: LoanId, total_interest_paid: Money, now: DateTime<Utc>) {
        self.events.emit(Event::LoanClosed {
            member_id,
            loan_id,
            total_interest_paid,
            timestamp: now,
        });
        tracing::info!(%member_id, %loan_id, %total_interest_paid, "loan closed");
    }

    /// member's loans annotated with interest due and amount owed as of now
    pub fn get_loans(&self, member_id: MemberId) -> Result<Vec<LoanView>> {
        let now = self.now();
        let member = self.load(member_id)?;
        Ok(member.loans.iter().map(|l| LoanView::from_loan(l, now)).collect())
    }

    pub fn member_view(&self, member_id: MemberId) -> Result<MemberView> {
        let member = self.load(member_id)?;
        Ok(MemberView::from_member(&member, self.now()))
    }

    /// dues for the current period plus all settled interest, less all expenses.
    ///
    /// dues count only members with `config.dues_role`, which is
    /// `Some(Role::Member)` by default, so admins' dues are left out unless
    /// the config sets `dues_role` to null.
    pub fn get_collection_summary(&self) -> Result<CollectionSummary> {
        self.summarize(Period::current(self.now()))
    }

    pub fn get_collection_summary_for(&self, period_input: &str) -> Result<CollectionSummary> {
        self.summarize(parse_period(period_input)?)
    }

    fn summarize(&self, period: Period) -> Result<CollectionSummary> {
        let everyone = self.store.list_members(None)?;
        let expenses: Money = self.store.list_expenses()?.iter().map(|e| e.amount).sum();

        let dues_payers: Vec<&Member> = everyone
            .iter()
            .filter(|m| self.config.dues_role.map_or(true, |r| m.role == r))
            .collect();
        let paying: Vec<&&Member> = dues_payers
            .iter()
            .filter(|m| payments::payment_for(m, period).map(|p| p.paid).unwrap_or(false))
            .collect();

        let dues_collected: Money = paying.iter().map(|m| m.monthly_amount).sum();
        let interest_collected: Money = everyone.iter().map(Member::total_interest_paid).sum();
        let outstanding_principal: Money = everyone
            .iter()
            .flat_map(|m| m.loans.iter())
            .filter(|l| !l.principal_paid)
            .map(|l| l.principal)
            .sum();

        let summary = CollectionSummary {
            period,
            period_range: period.range_label(),
            members_counted: dues_payers.len(),
            members_paid: paying.len(),
            dues_collected,
            interest_collected,
            expenses,
            net_balance: dues_collected + interest_collected - expenses,
            outstanding_principal,
        };
        tracing::debug!(%period, net = %summary.net_balance, "collection summary computed");
        Ok(summary)
    }
}

/// log business-rule rejections; everything else passes through untouched
fn rejected(err: LedgerError, member_id: MemberId, loan_id: Option<LoanId>) -> LedgerError {
    if err.class() == ErrorClass::BusinessRule || err.class() == ErrorClass::Validation {
        tracing::warn!(%member_id, loan_id = ?loan_id, code = err.code(), "{}", err);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::LoanStatus;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::TimeSource;

    fn clock(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()))
    }

    #[test]
    fn test_unknown_member_is_not_found() {
        let time = clock(2025, 1, 1);
        let store = InMemoryStore::new();
        let mut service = LedgerService::new(&store, LedgerConfig::standard(), &time).unwrap();

        let err = service.grant_loan(uuid::Uuid::new_v4(), Money::from_major(100)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
        assert!(service.take_events().is_empty());
    }

    #[test]
    fn test_loan_scenario_through_service() {
        let time = clock(2025, 1, 1);
        let control = time.test_control().unwrap();
        let store = InMemoryStore::new();
        let mut service = LedgerService::new(&store, LedgerConfig::standard(), &time).unwrap();

        let member = service
            .register_member("Ada", "555", "street", Money::from_major(100), Role::Member)
            .unwrap();
        let loan = service.grant_loan(member.id, Money::from_major(10_000)).unwrap();
        assert_eq!(loan.monthly_rate, Rate::from_percentage(5));

        control.advance(Duration::days(30));
        let payment = service.pay_loan_interest(member.id, loan.id).unwrap();
        assert_eq!(payment.amount, Money::from_minor(48_333));

        let view = service.mark_loan_principal_paid(member.id, loan.id).unwrap();
        assert_eq!(view.status, LoanStatus::Closed);

        let stored = store.load_member(member.id).unwrap().unwrap();
        assert!(stored.loans[0].closed);

        let events = service.take_events();
        assert!(matches!(events.last(), Some(Event::LoanClosed { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::InterestPaid { days: 29, .. })));
    }

    #[test]
    fn test_rejected_principal_is_not_saved() {
        let time = clock(2025, 1, 1);
        let control = time.test_control().unwrap();
        let store = InMemoryStore::new();
        let mut service = LedgerService::new(&store, LedgerConfig::standard(), &time).unwrap();

        let member = service
            .register_member("Bo", "555", "street", Money::from_major(100), Role::Member)
            .unwrap();
        let loan = service.grant_loan(member.id, Money::from_major(1_000)).unwrap();
        let before = store.load_member(member.id).unwrap().unwrap();
        service.take_events();

        control.advance(Duration::days(30));
        let err = service.mark_loan_principal_paid(member.id, loan.id).unwrap_err();
        assert!(matches!(err, LedgerError::UnpaidInterest { due } if due == Money::from_minor(4_833)));

        assert_eq!(store.load_member(member.id).unwrap().unwrap(), before);
        assert!(service.take_events().is_empty());
    }

    #[test]
    fn test_payment_status_creates_once() {
        let time = clock(2025, 7, 20);
        let store = InMemoryStore::new();
        let mut service = LedgerService::new(&store, LedgerConfig::standard(), &time).unwrap();
        let member = service
            .register_member("Cy", "555", "street", Money::from_major(100), Role::Member)
            .unwrap();
        service.take_events();

        let current = service.current_payment(member.id).unwrap();
        assert_eq!(current.period.short_label(), "2025-07");
        let again = service.payment_status(member.id, "2025-07-15 to 2025-08-15").unwrap();
        assert_eq!(again, current);

        assert_eq!(store.load_member(member.id).unwrap().unwrap().payments.len(), 1);
        assert_eq!(service.take_events().len(), 1);
    }
}
