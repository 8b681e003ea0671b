/// time control - watch arrears build up month by month
use profit_accrual_rs::{
    ArrearsScanner, InvestmentRecord, InvestmentStatus, Investor, InvestorId, MemoryLedger,
    SafeTimeProvider, Settings, TimeSource,
};
use profit_accrual_rs::chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let mut ledger = MemoryLedger::new();
    ledger.add_investor(Investor::new("1", "Ali"));
    ledger.add_investment(InvestmentRecord::new(
        "1",
        10_000_000,
        "2024-01-10",
        InvestmentStatus::Active,
    ))?;

    // 2% a month, nothing ever paid
    let scanner = ArrearsScanner::from_settings(&Settings::monthly(dec!(2)))?;
    let investor = InvestorId::new("1");

    for _ in 0..10 {
        let result = scanner.scan_investor(&ledger, &investor, &time)?;
        println!(
            "{}: current {} | arrears {} over {} period(s)",
            result.current_period,
            result.current_period_profit,
            result.accumulated_past_profit,
            result.unpaid_period_count,
        );
        controller.advance(Duration::days(31));
    }

    println!("\narrears stop growing after six months of lookback");

    Ok(())
}
