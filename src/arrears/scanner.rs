use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::arrears::matcher::{PaymentMatcher, ProfitPayments};
use crate::arrears::period::{months_between, Period};
use crate::arrears::profit::{ProfitCalculation, ProfitCalculator};
use crate::config::Settings;
use crate::decimal::Money;
use crate::errors::{AccrualError, Result};
use crate::ledger::{InvestmentLedger, Ledger, OperationLedger};
use crate::records::InvestmentRecord;
use crate::types::{Investment, InvestorId, ProfitBucket};

/// past periods scanned for arrears; older unpaid months are never surfaced
pub const MAX_LOOKBACK_PERIODS: u32 = 6;

/// profit owed to one investor at scan time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrearsResult {
    pub investor_id: InvestorId,
    pub current_period: Period,
    /// one period's profit per matured investment, zero once this month is paid
    pub current_period_profit: Money,
    pub accumulated_past_profit: Money,
    /// unpaid (investment, period) pairs inside the lookback window
    pub unpaid_period_count: u32,
    /// distinct unpaid past periods, most recent first
    pub unpaid_periods: Vec<Period>,
    pub distribution_date: NaiveDate,
}

impl ArrearsResult {
    fn empty(investor_id: InvestorId, current_period: Period, distribution_date: NaiveDate) -> Self {
        Self {
            investor_id,
            current_period,
            current_period_profit: Money::ZERO,
            accumulated_past_profit: Money::ZERO,
            unpaid_period_count: 0,
            unpaid_periods: Vec::new(),
            distribution_date,
        }
    }

    pub fn amount_for(&self, bucket: ProfitBucket) -> Money {
        match bucket {
            ProfitBucket::CurrentPeriod => self.current_period_profit,
            ProfitBucket::PastPeriods => self.accumulated_past_profit,
        }
    }

    /// buckets with something owed; zero buckets must not be notified
    pub fn due_buckets(&self) -> Vec<ProfitBucket> {
        [ProfitBucket::CurrentPeriod, ProfitBucket::PastPeriods]
            .into_iter()
            .filter(|b| self.amount_for(*b).is_positive())
            .collect()
    }

    pub fn is_reportable(&self) -> bool {
        !self.due_buckets().is_empty()
    }

    /// the scanner only returns results whose two buckets add up without overflow
    pub fn total_due(&self) -> Money {
        self.current_period_profit + self.accumulated_past_profit
    }
}

fn accumulate(total: Money, amount: Money, investor_id: &InvestorId) -> Result<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| AccrualError::CalculationError {
            message: format!("profit owed to investor {} overflows", investor_id),
        })
}

/// per-investor result of a full scan
#[derive(Debug)]
pub enum InvestorOutcome {
    Scanned(ArrearsResult),
    Failed {
        investor_id: InvestorId,
        error: AccrualError,
    },
}

impl InvestorOutcome {
    pub fn investor_id(&self) -> &InvestorId {
        match self {
            InvestorOutcome::Scanned(result) => &result.investor_id,
            InvestorOutcome::Failed { investor_id, .. } => investor_id,
        }
    }

    pub fn result(&self) -> Option<&ArrearsResult> {
        match self {
            InvestorOutcome::Scanned(result) => Some(result),
            InvestorOutcome::Failed { .. } => None,
        }
    }
}

/// output of a full scan
#[derive(Debug)]
pub struct ScanReport {
    pub scanned_at: DateTime<Utc>,
    pub outcomes: Vec<InvestorOutcome>,
    /// stopped early; investors after the last outcome were not scanned
    pub cancelled: bool,
}

impl ScanReport {
    pub fn results(&self) -> impl Iterator<Item = &ArrearsResult> {
        self.outcomes.iter().filter_map(InvestorOutcome::result)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&InvestorId, &AccrualError)> {
        self.outcomes.iter().filter_map(|o| match o {
            InvestorOutcome::Failed { investor_id, error } => Some((investor_id, error)),
            InvestorOutcome::Scanned(_) => None,
        })
    }

    /// results with at least one non-zero bucket
    pub fn reportable(&self) -> impl Iterator<Item = &ArrearsResult> {
        self.results().filter(|r| r.is_reportable())
    }

    pub fn result_for(&self, investor_id: &InvestorId) -> Option<&ArrearsResult> {
        self.results().find(|r| &r.investor_id == investor_id)
    }

    pub fn total_due(&self) -> Result<Money> {
        self.results().try_fold(Money::ZERO, |acc, r| {
            acc.checked_add(r.total_due())
                .ok_or_else(|| AccrualError::CalculationError {
                    message: "total profit due overflows".to_string(),
                })
        })
    }
}

/// coarse-grained cancellation, checked between investors
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// engine computing current-period profit and past arrears per investor
///
/// stateless: every call recomputes from the ledgers it is given, so running
/// it twice over the same snapshot yields the same results.
#[derive(Debug, Clone)]
pub struct ArrearsScanner<C = ProfitCalculator> {
    calculator: C,
    matcher: PaymentMatcher,
    distribution_day: u32,
}

impl ArrearsScanner<ProfitCalculator> {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Self::new(ProfitCalculator::from_settings(settings)?, settings.distribution_day()?)
    }
}

impl<C: ProfitCalculation> ArrearsScanner<C> {
    pub fn new(calculator: C, distribution_day: u32) -> Result<Self> {
        if !(1..=31).contains(&distribution_day) {
            return Err(AccrualError::InvalidConfiguration {
                message: format!("profit distribution day {} outside 1..=31", distribution_day),
            });
        }
        Ok(Self {
            calculator,
            matcher: PaymentMatcher::new(),
            distribution_day,
        })
    }

    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    /// scan every investor in the directory
    ///
    /// fails only when the directory itself is unavailable; a failure on one
    /// investor's data is recorded in that investor's outcome.
    pub fn scan_all<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        time_provider: &SafeTimeProvider,
        cancellation: &CancellationToken,
    ) -> Result<ScanReport> {
        self.scan_all_at(ledger, time_provider.now(), cancellation)
    }

    pub fn scan_all_at<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        today: DateTime<Utc>,
        cancellation: &CancellationToken,
    ) -> Result<ScanReport> {
        let investors = ledger.investors()?;
        let mut report = ScanReport {
            scanned_at: today,
            outcomes: Vec::with_capacity(investors.len()),
            cancelled: false,
        };

        for investor in investors {
            if cancellation.is_cancelled() {
                info!(scanned = report.outcomes.len(), "arrears scan cancelled");
                report.cancelled = true;
                break;
            }

            let outcome = match self.scan_investor_at(ledger, &investor.id, today) {
                Ok(result) => InvestorOutcome::Scanned(result),
                Err(error) => {
                    warn!(investor = %investor.id, error = %error, "arrears scan failed for investor");
                    InvestorOutcome::Failed {
                        investor_id: investor.id,
                        error,
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        debug!(
            investors = report.outcomes.len(),
            reportable = report.reportable().count(),
            "arrears scan finished"
        );
        Ok(report)
    }

    pub fn scan_investor<L>(
        &self,
        ledger: &L,
        investor_id: &InvestorId,
        time_provider: &SafeTimeProvider,
    ) -> Result<ArrearsResult>
    where
        L: InvestmentLedger + OperationLedger + ?Sized,
    {
        self.scan_investor_at(ledger, investor_id, time_provider.now())
    }

    pub fn scan_investor_at<L>(
        &self,
        ledger: &L,
        investor_id: &InvestorId,
        today: DateTime<Utc>,
    ) -> Result<ArrearsResult>
    where
        L: InvestmentLedger + OperationLedger + ?Sized,
    {
        let investments = ledger.investments_for(investor_id)?;
        let payments = self.matcher.load(ledger, investor_id);
        self.compute(investor_id, &investments, &payments, today)
    }

    /// the arrears algorithm over one investor's records
    pub fn compute(
        &self,
        investor_id: &InvestorId,
        investments: &[InvestmentRecord],
        payments: &ProfitPayments,
        today: DateTime<Utc>,
    ) -> Result<ArrearsResult> {
        let current_period = Period::containing(today)?;
        let mut result = ArrearsResult::empty(
            investor_id.clone(),
            current_period,
            current_period.day_clamped(self.distribution_day),
        );

        // only active investments are validated; a bad closed record owes nothing
        let active = investments
            .iter()
            .filter(|r| &r.investor_id == investor_id && r.is_active())
            .map(InvestmentRecord::validate)
            .collect::<Result<Vec<Investment>>>()?;

        if active.is_empty() {
            return Ok(result);
        }

        let mut current_month_profit = Money::ZERO;
        let mut unpaid = BTreeSet::new();

        for investment in &active {
            let total_months = months_between(investment.date, today);
            if total_months < 1 {
                continue;
            }

            let monthly_profit = self.calculator.monthly_profit(investment.amount)?;
            current_month_profit = accumulate(current_month_profit, monthly_profit, investor_id)?;

            let months_to_check = (total_months - 1).min(MAX_LOOKBACK_PERIODS as i32);
            for i in 1..=months_to_check {
                let period = current_period.shifted(-i)?;
                if investment.date >= period.start() {
                    continue;
                }

                if !payments.paid_in(&period) {
                    result.accumulated_past_profit =
                        accumulate(result.accumulated_past_profit, monthly_profit, investor_id)?;
                    result.unpaid_period_count += 1;
                    unpaid.insert(period);
                }
            }
        }

        if current_month_profit.is_positive() && !payments.paid_in(&current_period) {
            result.current_period_profit = current_month_profit;
        }
        accumulate(result.current_period_profit, result.accumulated_past_profit, investor_id)?;
        result.unpaid_periods = unpaid.into_iter().rev().collect();

        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::CancelAfterFirst;
    use super::*;
    use crate::ledger::{BackupDocument, MemoryLedger};
    use crate::records::OperationRecord;
    use crate::types::{InvestmentStatus, Investor, OperationStatus, OperationType};
    use chrono::{Duration, TimeZone};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn scanner() -> ArrearsScanner {
        ArrearsScanner::from_settings(&Settings::monthly(dec!(2))).unwrap()
    }

    fn june_15() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()))
    }

    fn ledger_with(investor: &str, amount: i64, date: &str) -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        ledger.add_investor(Investor::new(investor, "test"));
        ledger
            .add_investment(InvestmentRecord::new(investor, amount, date, InvestmentStatus::Active))
            .unwrap();
        ledger
    }

    // bypasses validation on insert so malformed records reach the scanner
    fn ledger_from(investors: Vec<Investor>, investments: Vec<InvestmentRecord>) -> MemoryLedger {
        MemoryLedger::from_backup(BackupDocument {
            investors: Some(investors),
            investments: Some(investments),
            operations: Some(Vec::new()),
            settings: None,
        })
    }

    fn id(s: &str) -> InvestorId {
        InvestorId::new(s)
    }

    #[test]
    fn test_investment_from_this_month_owes_nothing() {
        let ledger = ledger_with("a", 10_000_000, "2024-06-01");
        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();

        assert_eq!(result.current_period_profit, Money::ZERO);
        assert_eq!(result.accumulated_past_profit, Money::ZERO);
        assert_eq!(result.unpaid_period_count, 0);
        assert!(!result.is_reportable());
    }

    #[test]
    fn test_one_month_old_owes_current_only() {
        let ledger = ledger_with("a", 10_000_000, "2024-05-20");
        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();

        assert_eq!(result.current_period_profit, Money::from_major(200_000));
        assert_eq!(result.accumulated_past_profit, Money::ZERO);
        assert_eq!(result.unpaid_period_count, 0);
        assert_eq!(result.due_buckets(), vec![ProfitBucket::CurrentPeriod]);
    }

    #[test]
    fn test_eight_months_unpaid_caps_at_six_periods() {
        let ledger = ledger_with("a", 10_000_000, "2023-10-01");
        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();

        assert_eq!(result.current_period_profit, Money::from_major(200_000));
        assert_eq!(result.accumulated_past_profit, Money::from_major(1_200_000));
        assert_eq!(result.unpaid_period_count, 6);
        assert_eq!(result.total_due(), Money::from_major(1_400_000));

        let labels: Vec<String> = result.unpaid_periods.iter().map(|p| p.to_string()).collect();
        assert_eq!(labels, vec!["2024-05", "2024-04", "2024-03", "2024-02", "2024-01", "2023-12"]);
    }

    #[test]
    fn test_short_history_limits_lookback() {
        let ledger = ledger_with("a", 1_000_000, "2024-03-10");
        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();

        // three months old: current plus april and may
        assert_eq!(result.unpaid_period_count, 2);
        assert_eq!(result.accumulated_past_profit, Money::from_major(40_000));
        assert_eq!(result.current_period_profit, Money::from_major(20_000));
    }

    #[test]
    fn test_paid_period_is_not_arrears() {
        let mut ledger = ledger_with("a", 10_000_000, "2023-10-01");
        ledger
            .record_operation(OperationRecord::profit("a", 200_000, "2024-03-05"))
            .unwrap();

        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();

        assert_eq!(result.unpaid_period_count, 5);
        assert_eq!(result.accumulated_past_profit, Money::from_major(1_000_000));
        assert!(!result.unpaid_periods.contains(&Period::new(2024, 2).unwrap()));
        assert_eq!(result.current_period_profit, Money::from_major(200_000));
    }

    #[test]
    fn test_reversed_payment_still_unpaid() {
        let mut ledger = ledger_with("a", 10_000_000, "2023-10-01");
        ledger
            .record_operation(OperationRecord::new(
                "a",
                OperationType::Profit,
                200_000,
                "2024-03-05",
                OperationStatus::Reversed,
            ))
            .unwrap();

        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();
        assert_eq!(result.unpaid_period_count, 6);
        assert_eq!(result.accumulated_past_profit, Money::from_major(1_200_000));
    }

    #[test]
    fn test_current_month_payment_clears_current_bucket() {
        let mut ledger = ledger_with("a", 10_000_000, "2023-10-01");
        ledger
            .record_operation(OperationRecord::profit("a", 200_000, "2024-06-02"))
            .unwrap();

        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();
        assert_eq!(result.current_period_profit, Money::ZERO);
        assert_eq!(result.accumulated_past_profit, Money::from_major(1_200_000));
        assert_eq!(result.due_buckets(), vec![ProfitBucket::PastPeriods]);
    }

    #[test]
    fn test_multiple_investments_sum_per_period() {
        let mut ledger = ledger_with("a", 10_000_000, "2023-10-01");
        ledger
            .add_investment(InvestmentRecord::new("a", 5_000_000, "2024-04-10", InvestmentStatus::Active))
            .unwrap();
        ledger
            .add_investment(InvestmentRecord::new("a", 50_000_000, "2023-01-10", InvestmentStatus::Closed))
            .unwrap();

        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();

        // second investment: two months old, owes current plus may
        assert_eq!(result.current_period_profit, Money::from_major(300_000));
        assert_eq!(result.accumulated_past_profit, Money::from_major(1_300_000));
        assert_eq!(result.unpaid_period_count, 7);
        assert_eq!(result.unpaid_periods.len(), 6);
    }

    #[test]
    fn test_no_active_investments_yields_zero() {
        let mut ledger = MemoryLedger::new();
        ledger.add_investor(Investor::new("a", "closed only"));
        ledger
            .add_investment(InvestmentRecord::new("a", 10_000_000, "2023-01-01", InvestmentStatus::Closed))
            .unwrap();

        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();
        assert_eq!(result.current_period_profit, Money::ZERO);
        assert_eq!(result.accumulated_past_profit, Money::ZERO);
        assert_eq!(result.unpaid_period_count, 0);
        assert!(result.due_buckets().is_empty());
    }

    #[test]
    fn test_future_dated_investment_is_skipped() {
        let ledger = ledger_with("a", 10_000_000, "2024-09-01");
        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();
        assert!(!result.is_reportable());
    }

    #[test]
    fn test_scan_is_idempotent() {
        let mut ledger = ledger_with("a", 10_000_000, "2023-10-01");
        ledger.add_investor(Investor::new("b", "second"));
        ledger
            .add_investment(InvestmentRecord::new("b", 3_000_000, "2024-01-01", InvestmentStatus::Active))
            .unwrap();

        let token = CancellationToken::new();
        let first = scanner().scan_all(&ledger, &june_15(), &token).unwrap();
        let second = scanner().scan_all(&ledger, &june_15(), &token).unwrap();

        let a: Vec<&ArrearsResult> = first.results().collect();
        let b: Vec<&ArrearsResult> = second.results().collect();
        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_failure_is_isolated_per_investor() {
        let ledger = ledger_from(
            vec![Investor::new("bad", "broken"), Investor::new("good", "fine")],
            vec![
                InvestmentRecord::new("bad", 1_000, "someday", InvestmentStatus::Active),
                InvestmentRecord::new("good", 10_000_000, "2023-10-01", InvestmentStatus::Active),
            ],
        );

        let report = scanner().scan_all(&ledger, &june_15(), &CancellationToken::new()).unwrap();

        assert_eq!(report.outcomes.len(), 2);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, &id("bad"));
        assert!(matches!(failures[0].1, AccrualError::InvalidDate { .. }));

        let good = report.result_for(&id("good")).unwrap();
        assert_eq!(good.accumulated_past_profit, Money::from_major(1_200_000));
    }

    #[test]
    fn test_malformed_closed_investment_is_ignored() {
        let ledger = ledger_from(
            vec![Investor::new("a", "x")],
            vec![
                InvestmentRecord::new("a", "n/a", "n/a", InvestmentStatus::Closed),
                InvestmentRecord::new("a", 10_000_000, "2024-05-01", InvestmentStatus::Active),
            ],
        );

        let result = scanner().scan_investor(&ledger, &id("a"), &june_15()).unwrap();
        assert_eq!(result.current_period_profit, Money::from_major(200_000));
    }

    #[test]
    fn test_directory_unavailable_vs_empty() {
        let token = CancellationToken::new();
        let err = scanner()
            .scan_all(&MemoryLedger::unavailable(), &june_15(), &token)
            .unwrap_err();
        assert!(matches!(err, AccrualError::DataUnavailable { collection: "investors" }));

        let report = scanner().scan_all(&MemoryLedger::new(), &june_15(), &token).unwrap();
        assert!(report.outcomes.is_empty());
        assert!(!report.cancelled);
    }

    #[test]
    fn test_cancelled_scan_stops_between_investors() {
        let ledger = ledger_with("a", 10_000_000, "2023-10-01");
        let token = CancellationToken::new();
        token.cancel();

        let report = scanner().scan_all(&ledger, &june_15(), &token).unwrap();
        assert!(report.cancelled);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_cancel_mid_scan_keeps_partial_report() {
        let mut ledger = ledger_with("a", 10_000_000, "2023-10-01");
        ledger.add_investor(Investor::new("b", "second"));
        let token = CancellationToken::new();
        let cancelling = CancelAfterFirst {
            inner: &ledger,
            token: token.clone(),
        };

        let report = scanner().scan_all(&cancelling, &june_15(), &token).unwrap();
        assert!(report.cancelled);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].investor_id(), &id("a"));
        assert_eq!(
            report.result_for(&id("a")).unwrap().accumulated_past_profit,
            Money::from_major(1_200_000)
        );
    }

    #[test]
    fn test_overflowing_profit_fails_only_that_investor() {
        let scanner = ArrearsScanner::from_settings(&Settings::monthly(dec!(100))).unwrap();
        let huge = "79228162514264337593543950335";
        let ledger = ledger_from(
            vec![Investor::new("huge", "overflow"), Investor::new("good", "fine")],
            vec![
                InvestmentRecord::new("huge", huge, "2024-05-01", InvestmentStatus::Active),
                InvestmentRecord::new("huge", huge, "2024-05-02", InvestmentStatus::Active),
                InvestmentRecord::new("good", 1_000_000, "2024-05-01", InvestmentStatus::Active),
            ],
        );

        let report = scanner.scan_all(&ledger, &june_15(), &CancellationToken::new()).unwrap();

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, &id("huge"));
        assert!(matches!(failures[0].1, AccrualError::CalculationError { .. }));

        let good = report.result_for(&id("good")).unwrap();
        assert_eq!(good.current_period_profit, Money::from_major(1_000_000));
        assert_eq!(report.total_due().unwrap(), Money::from_major(1_000_000));
    }

    #[test]
    fn test_malformed_backup_records_are_isolated() {
        let backup = BackupDocument::from_json(
            r#"{
                "investors": [{"id": "a", "name": "Ali"}, {"id": null, "name": "nobody"}, {"id": "b", "name": "Sara"}],
                "investments": [
                    {"investorId": "a", "amount": 10000000, "date": "2023-10-01", "status": "active"},
                    {"investorId": null, "amount": 5000000, "date": "2023-10-01", "status": "active"},
                    {"investorId": "b", "amount": 5000000, "date": "2023-10-01", "status": 1},
                    "not a record"
                ],
                "operations": [
                    {"investorId": "a", "type": true, "amount": 200000, "date": "2024-05-03", "status": "active"},
                    {"investorId": "a", "type": "profit", "amount": 200000, "date": "2024-04-03", "status": 1},
                    {"investorId": "a", "type": "profit", "amount": 200000, "date": "2024-03-03", "status": "active"}
                ]
            }"#,
        )
        .unwrap();
        let ledger = MemoryLedger::from_backup(backup);

        let report = scanner().scan_all(&ledger, &june_15(), &CancellationToken::new()).unwrap();
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.failures().count(), 0);

        // only the well-formed march payment counts
        let a = report.result_for(&id("a")).unwrap();
        assert_eq!(a.unpaid_period_count, 5);
        assert!(!a.unpaid_periods.contains(&Period::new(2024, 2).unwrap()));

        // an unreadable status is not active
        assert!(!report.result_for(&id("b")).unwrap().is_reportable());
    }

    #[test]
    fn test_missing_rate_fails_scanner_construction() {
        let err = ArrearsScanner::from_settings(&Settings::default()).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_distribution_date_clamped() {
        let settings = Settings::monthly(dec!(2)).with_distribution_day(31);
        let scanner = ArrearsScanner::from_settings(&settings).unwrap();
        let ledger = ledger_with("a", 1_000, "2024-01-01");

        let result = scanner.scan_investor(&ledger, &id("a"), &june_15()).unwrap();
        assert_eq!(result.distribution_date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }

    #[test]
    fn test_advancing_time_moves_the_window() {
        let ledger = ledger_with("a", 10_000_000, "2024-05-10");
        let time = june_15();
        let control = time.test_control().unwrap();

        let before = scanner().scan_investor(&ledger, &id("a"), &time).unwrap();
        assert_eq!(before.unpaid_period_count, 0);

        // into july: june becomes a past period
        control.advance(Duration::days(20));
        let after = scanner().scan_investor(&ledger, &id("a"), &time).unwrap();
        assert_eq!(after.unpaid_period_count, 1);
        assert_eq!(after.unpaid_periods, vec![Period::new(2024, 5).unwrap()]);
        assert_eq!(after.current_period.to_string(), "2024-07");
    }
}
