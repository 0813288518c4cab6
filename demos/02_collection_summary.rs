/// collection summary - dues, interest and expenses for a period
use chrono::{Duration, TimeZone, Utc};
use circle_ledger::{
    Expense, InMemoryStore, LedgerConfig, LedgerService, MemberStore, Money, Role, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== collection summary example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2025, 7, 20, 9, 0, 0).unwrap()));
    let controller = time.test_control().unwrap();

    let store = InMemoryStore::new();
    let mut ledger = LedgerService::new(&store, LedgerConfig::standard(), &time)?;

    let mut ids = Vec::new();
    for (name, dues) in [("Ama", 100), ("Yaw", 150), ("Esi", 200)] {
        ids.push(ledger.register_member(name, "555", "Accra", Money::from_major(dues), Role::Member)?.id);
    }
    ledger.register_member("Treasurer", "555", "Accra", Money::ZERO, Role::Admin)?;

    // two of three members pay this period
    ledger.mark_payment(ids[0], "2025-07", true)?;
    ledger.mark_payment(ids[1], "2025-07-15 to 2025-08-15", true)?;

    let loan = ledger.grant_loan(ids[2], Money::from_major(1_000))?;
    controller.advance(Duration::days(10));
    ledger.pay_loan_interest(ids[2], loan.id)?;

    store.record_expense(&Expense::new("hall rental", Money::from_major(40), time.now())?)?;

    let summary = ledger.get_collection_summary()?;
    println!("{}", summary.to_json_pretty()?);

    // previous period: nobody has paid
    let earlier = ledger.get_collection_summary_for("2025-06")?;
    println!("\n{}: {} of {} paid", earlier.period_range, earlier.members_paid, earlier.members_counted);

    Ok(())
}
