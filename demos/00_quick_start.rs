/// quick start - load a backup document and list what each investor is owed
use profit_accrual_rs::{
    ArrearsScanner, BackupDocument, CancellationToken, InvestorDirectory, MemoryLedger,
    SafeTimeProvider, ScanReportView, TimeSource,
};
use profit_accrual_rs::chrono::{TimeZone, Utc};

const BACKUP: &str = r#"{
    "investors": [{"id": "1", "name": "Ali"}, {"id": "2", "name": "Sara"}],
    "investments": [
        {"investorId": "1", "amount": 10000000, "date": "2023-10-01", "status": "active"},
        {"investorId": "2", "amount": "2,500,000", "date": "2024-04-20", "status": "active"}
    ],
    "operations": [
        {"investorId": "2", "type": "profit", "amount": 50000, "date": "2024-05-25", "status": "active"}
    ],
    "settings": {"interestRate": 2, "profitDistributionDay": 5}
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let backup = BackupDocument::from_json(BACKUP)?;
    let settings = backup.settings.clone().unwrap_or_default();
    let ledger = MemoryLedger::from_backup(backup);

    let scanner = ArrearsScanner::from_settings(&settings)?;
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    ));

    let report = scanner.scan_all(&ledger, &time, &CancellationToken::new())?;
    let view = ScanReportView::from_report(&report, &ledger.investors()?)?;

    println!("{}", view.to_json()?);

    Ok(())
}
