/// json store - persist the ledger to a file and read it back
use circle_ledger::{JsonFileStore, LedgerConfig, LedgerService, MemberStore, Money, Role, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== json store example ===\n");

    let path = std::env::temp_dir().join("circle-ledger-demo.json");
    let time = SafeTimeProvider::new(TimeSource::System);

    // rate override from a config document
    let config = LedgerConfig::from_json_str(r#"{ "default_monthly_rate": 4 }"#)?;

    let member_id = {
        let mut ledger = LedgerService::new(JsonFileStore::open(&path), config, &time)?;
        let member = ledger.register_member("Nana", "555-0199", "7 Market Lane", Money::from_major(80), Role::Member)?;
        ledger.grant_loan(member.id, Money::from_major(500))?;
        member.id
    };

    let reopened = JsonFileStore::open(&path);
    println!("stored at {}", reopened.path().display());
    if let Some(member) = reopened.load_member(member_id)? {
        println!("{} has {} loan(s) at {}", member.name, member.loans.len(), member.loans[0].monthly_rate);
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
