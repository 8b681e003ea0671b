pub mod matcher;
pub mod period;
pub mod profit;
pub mod scanner;

pub use matcher::{PaymentMatcher, ProfitPayment, ProfitPayments};
pub use period::{month_end, month_start, months_between, shift_month, Period};
pub use profit::{ProfitCalculation, ProfitCalculator};
pub use scanner::{
    ArrearsResult, ArrearsScanner, CancellationToken, InvestorOutcome, ScanReport,
    MAX_LOOKBACK_PERIODS,
};
