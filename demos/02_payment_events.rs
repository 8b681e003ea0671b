/// payment events - record a payout and let the monitor re-check the investor
use profit_accrual_rs::{
    ArrearsMonitor, CancellationToken, InvestmentRecord, InvestmentStatus, Investor, InvestorId,
    MemoryLedger, OperationRecord, SafeTimeProvider, Settings, TimeSource,
};
use profit_accrual_rs::chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    ));

    let mut ledger = MemoryLedger::new();
    ledger.add_investor(Investor::new("1", "Ali"));
    ledger.add_investment(InvestmentRecord::new(
        "1",
        10_000_000,
        "2024-02-01",
        InvestmentStatus::Active,
    ))?;
    ledger.take_events();

    let mut monitor = ArrearsMonitor::from_settings(&Settings::monthly(dec!(2)))?;
    monitor.refresh(&ledger, &time, &CancellationToken::new())?;
    println!("notifications after refresh: {}", monitor.notifications.len());

    // pay this month's profit
    ledger.record_operation(OperationRecord::profit("1", 200_000, "2024-06-15"))?;
    let events = ledger.take_events();
    let rescanned = monitor.handle_events(&ledger, &events, &time);
    println!("re-scanned {} investor(s)", rescanned);

    if let Some(result) = monitor.result_for(&InvestorId::new("1")) {
        println!("current due: {}", result.current_period_profit);
        println!("arrears: {} ({} periods)", result.accumulated_past_profit, result.unpaid_period_count);
    }

    for notification in monitor.notifications.iter() {
        println!("{:?} {} {}", notification.bucket, notification.period, notification.amount);
    }

    Ok(())
}
