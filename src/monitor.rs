use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info};

use crate::arrears::{
    ArrearsResult, ArrearsScanner, CancellationToken, InvestorOutcome, ProfitCalculation,
    ProfitCalculator, ScanReport,
};
use crate::config::Settings;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::ledger::{InvestmentLedger, Ledger, OperationLedger};
use crate::notifications::NotificationStore;
use crate::types::{InvestorId, ProfitBucket};

/// keeps the latest arrears per investor and turns them into notifications
///
/// a full `refresh` runs on a timer or at start-up; ledger events between
/// refreshes re-scan only the investors they touch.
pub struct ArrearsMonitor<C = ProfitCalculator> {
    scanner: ArrearsScanner<C>,
    results: BTreeMap<InvestorId, ArrearsResult>,
    failures: BTreeMap<InvestorId, String>,
    pub notifications: NotificationStore,
    pub events: EventStore,
}

impl ArrearsMonitor<ProfitCalculator> {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            ArrearsScanner::from_settings(settings)?,
            NotificationStore::from_settings(settings)?,
        ))
    }
}

impl<C: ProfitCalculation> ArrearsMonitor<C> {
    pub fn new(scanner: ArrearsScanner<C>, notifications: NotificationStore) -> Self {
        Self {
            scanner,
            results: BTreeMap::new(),
            failures: BTreeMap::new(),
            notifications,
            events: EventStore::new(),
        }
    }

    /// full re-scan of every investor
    pub fn refresh<L: Ledger + ?Sized>(
        &mut self,
        ledger: &L,
        time_provider: &SafeTimeProvider,
        cancellation: &CancellationToken,
    ) -> Result<ScanReport> {
        let now = time_provider.now();
        let report = self.scanner.scan_all_at(ledger, now, cancellation)?;

        if !report.cancelled {
            // investors removed from the directory drop out
            self.results.clear();
            self.failures.clear();
        }

        for outcome in &report.outcomes {
            match outcome {
                InvestorOutcome::Scanned(result) => self.apply(result.clone(), now),
                InvestorOutcome::Failed { investor_id, error } => {
                    self.record_failure(investor_id.clone(), error.to_string(), now)
                }
            }
        }

        let failures = report.failures().count();
        self.events.emit(Event::ScanCompleted {
            investors_scanned: report.outcomes.len(),
            failures,
            cancelled: report.cancelled,
            timestamp: now,
        });
        info!(
            investors = report.outcomes.len(),
            failures,
            cancelled = report.cancelled,
            "arrears refreshed"
        );

        Ok(report)
    }

    /// re-scan the investors touched by ledger events
    ///
    /// returns how many investors were re-scanned.
    pub fn handle_events<L>(
        &mut self,
        ledger: &L,
        events: &[Event],
        time_provider: &SafeTimeProvider,
    ) -> usize
    where
        L: InvestmentLedger + OperationLedger + ?Sized,
    {
        let affected: BTreeSet<&InvestorId> = events
            .iter()
            .filter(|e| e.changes_arrears())
            .filter_map(Event::investor_id)
            .collect();

        let now = time_provider.now();
        for investor_id in &affected {
            debug!(investor = %investor_id, "re-scanning after ledger change");
            match self.scanner.scan_investor_at(ledger, investor_id, now) {
                Ok(result) => self.apply(result, now),
                Err(e) => self.record_failure((*investor_id).clone(), e.to_string(), now),
            }
        }

        affected.len()
    }

    fn apply(&mut self, result: ArrearsResult, now: DateTime<Utc>) {
        self.failures.remove(&result.investor_id);

        for bucket in [ProfitBucket::CurrentPeriod, ProfitBucket::PastPeriods] {
            if result.amount_for(bucket).is_zero() {
                self.notifications.resolve(&result.investor_id, bucket);
            }
        }

        for notification in self.notifications.publish(&result, now) {
            let event = match notification.bucket {
                ProfitBucket::CurrentPeriod => Event::CurrentProfitDue {
                    investor_id: notification.investor_id,
                    period: notification.period,
                    amount: notification.amount,
                    timestamp: now,
                },
                ProfitBucket::PastPeriods => Event::ArrearsDetected {
                    investor_id: notification.investor_id,
                    unpaid_periods: notification.unpaid_periods,
                    amount: notification.amount,
                    timestamp: now,
                },
            };
            self.events.emit(event);
        }

        self.results.insert(result.investor_id.clone(), result);
    }

    fn record_failure(&mut self, investor_id: InvestorId, reason: String, now: DateTime<Utc>) {
        self.results.remove(&investor_id);
        self.events.emit(Event::InvestorScanFailed {
            investor_id: investor_id.clone(),
            reason: reason.clone(),
            timestamp: now,
        });
        self.failures.insert(investor_id, reason);
    }

    pub fn result_for(&self, investor_id: &InvestorId) -> Option<&ArrearsResult> {
        self.results.get(investor_id)
    }

    pub fn results(&self) -> impl Iterator<Item = &ArrearsResult> {
        self.results.values()
    }

    pub fn failure_for(&self, investor_id: &InvestorId) -> Option<&str> {
        self.failures.get(investor_id).map(String::as_str)
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
