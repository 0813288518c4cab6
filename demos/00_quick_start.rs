/// quick start - register a member, mark dues, print the member
use circle_ledger::{InMemoryStore, LedgerConfig, LedgerService, Money, Role, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // production: system time
    let time = SafeTimeProvider::new(TimeSource::System);
    let store = InMemoryStore::new();
    let mut ledger = LedgerService::new(&store, LedgerConfig::standard(), &time)?;

    let member = ledger.register_member("Amara", "555-0101", "12 Palm Road", Money::from_major(100), Role::Member)?;

    // dues for the current period
    let payment = ledger.current_payment(member.id)?;
    ledger.mark_payment(member.id, &payment.period.short_label(), true)?;

    println!("{}", ledger.member_view(member.id)?.to_json_pretty()?);

    Ok(())
}
