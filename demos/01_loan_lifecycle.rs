/// loan lifecycle - grant, accrue, settle interest, repay principal
use chrono::{Duration, TimeZone, Utc};
use circle_ledger::{InMemoryStore, LedgerConfig, LedgerError, LedgerService, Money, Role, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== loan lifecycle example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
    let controller = time.test_control().unwrap();

    let store = InMemoryStore::new();
    let mut ledger = LedgerService::new(&store, LedgerConfig::standard(), &time)?;
    let member = ledger.register_member("Kofi", "555-0102", "4 Harbour St", Money::from_major(100), Role::Member)?;

    let loan = ledger.grant_loan(member.id, Money::from_major(10_000))?;
    println!("granted ${} at {} per month on {}", loan.principal, loan.monthly_rate, time.now().format("%Y-%m-%d"));

    controller.advance(Duration::days(30));
    println!("\nadvanced to: {}", time.now().format("%Y-%m-%d"));

    for view in ledger.get_loans(member.id)? {
        println!("days outstanding: {}", view.days_outstanding);
        println!("interest due: ${}", view.current_interest_due);
        println!("total owed: ${}", view.total_amount_owed);
    }

    // principal is refused while interest is outstanding
    match ledger.mark_loan_principal_paid(member.id, loan.id) {
        Err(LedgerError::UnpaidInterest { due }) => println!("\nprincipal refused, ${} interest due", due),
        other => println!("\nunexpected: {:?}", other),
    }

    let paid = ledger.pay_loan_interest(member.id, loan.id)?;
    println!("interest paid: ${}", paid.amount);

    let closed = ledger.mark_loan_principal_paid(member.id, loan.id)?;
    println!("status: {:?}", closed.status);

    println!("\nevents:");
    for event in ledger.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
