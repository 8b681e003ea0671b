pub mod arrears;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod monitor;
pub mod notifications;
pub mod records;
pub mod report;
pub mod types;

// re-export key types
pub use arrears::{
    month_end, month_start, months_between, shift_month, ArrearsResult, ArrearsScanner,
    CancellationToken, InvestorOutcome, PaymentMatcher, Period, ProfitCalculation,
    ProfitCalculator, ScanReport, MAX_LOOKBACK_PERIODS,
};
pub use config::{RateBasis, Settings};
pub use decimal::{Money, Rate};
pub use errors::{AccrualError, Result};
pub use events::{Event, EventStore};
pub use ledger::{
    BackupDocument, InvestmentLedger, InvestorDirectory, Ledger, MemoryLedger, OperationLedger,
};
pub use monitor::ArrearsMonitor;
pub use notifications::{Notification, NotificationId, NotificationStore};
pub use records::{InvestmentRecord, OperationRecord};
pub use report::{ArrearsView, ScanReportView};
pub use types::{
    Investment, InvestmentStatus, Investor, InvestorId, Operation, OperationStatus,
    OperationType, ProfitBucket,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
