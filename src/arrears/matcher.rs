use chrono::{DateTime, Utc};
use tracing::warn;

use crate::arrears::period::Period;
use crate::decimal::Money;
use crate::ledger::OperationLedger;
use crate::records::OperationRecord;
use crate::types::{InvestorId, OperationStatus, OperationType};

/// decides whether an investor already received profit within a period
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentMatcher;

impl PaymentMatcher {
    pub fn new() -> Self {
        Self
    }

    /// true iff an active profit operation for the investor is dated inside the period
    pub fn has_profit_payment(
        &self,
        investor_id: &InvestorId,
        period: &Period,
        operations: &[OperationRecord],
    ) -> bool {
        self.collect(investor_id, operations).paid_in(period)
    }

    /// validated profit disbursements of one investor
    ///
    /// records that fail validation are skipped, which leaves the period unpaid.
    pub fn collect(&self, investor_id: &InvestorId, operations: &[OperationRecord]) -> ProfitPayments {
        let mut payments = Vec::new();

        for record in operations {
            if &record.investor_id != investor_id
                || record.operation_type != Some(OperationType::Profit)
                || record.status != Some(OperationStatus::Active)
            {
                continue;
            }

            match record.validate() {
                Ok(op) => payments.push(ProfitPayment {
                    amount: op.amount,
                    date: op.date,
                }),
                Err(e) => warn!(investor = %investor_id, error = %e, "skipping malformed profit operation"),
            }
        }

        ProfitPayments { payments }
    }

    /// read the investor's operations, treating an unavailable ledger as empty
    pub fn load<L: OperationLedger + ?Sized>(&self, ledger: &L, investor_id: &InvestorId) -> ProfitPayments {
        match ledger.operations_for(investor_id) {
            Ok(records) => self.collect(investor_id, &records),
            Err(e) => {
                warn!(investor = %investor_id, error = %e, "operation ledger unavailable, assuming no payments");
                ProfitPayments::default()
            }
        }
    }
}

/// one matched disbursement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitPayment {
    pub amount: Money,
    pub date: DateTime<Utc>,
}

/// an investor's profit disbursements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfitPayments {
    payments: Vec<ProfitPayment>,
}

impl ProfitPayments {
    pub fn paid_in(&self, period: &Period) -> bool {
        self.payments.iter().any(|p| period.contains(p.date))
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AccrualError, Result};
    use serde_json::json;

    fn may_2024() -> Period {
        Period::new(2024, 4).unwrap()
    }

    #[test]
    fn test_matches_active_profit_in_period() {
        let investor = InvestorId::new("a");
        let ops = vec![OperationRecord::profit("a", 200_000, "2024-05-10")];
        assert!(PaymentMatcher::new().has_profit_payment(&investor, &may_2024(), &ops));
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let investor = InvestorId::new("a");
        let matcher = PaymentMatcher::new();

        let first = vec![OperationRecord::profit("a", 1, "2024-05-01T00:00:00Z")];
        assert!(matcher.has_profit_payment(&investor, &may_2024(), &first));

        let last = vec![OperationRecord::profit("a", 1, "2024-05-31T23:59:59Z")];
        assert!(matcher.has_profit_payment(&investor, &may_2024(), &last));

        let after = vec![OperationRecord::profit("a", 1, "2024-06-01T00:00:00Z")];
        assert!(!matcher.has_profit_payment(&investor, &may_2024(), &after));
    }

    #[test]
    fn test_ignores_reversed_other_types_and_other_investors() {
        let investor = InvestorId::new("a");
        let ops = vec![
            OperationRecord::new("a", OperationType::Profit, 1, "2024-05-10", OperationStatus::Reversed),
            OperationRecord::new("a", OperationType::Deposit, 1, "2024-05-10", OperationStatus::Active),
            OperationRecord::new("a", OperationType::Withdrawal, 1, "2024-05-10", OperationStatus::Active),
            OperationRecord::profit("b", 1, "2024-05-10"),
        ];
        assert!(!PaymentMatcher::new().has_profit_payment(&investor, &may_2024(), &ops));
    }

    #[test]
    fn test_malformed_operation_counts_as_unpaid() {
        let investor = InvestorId::new("a");
        let ops = vec![
            OperationRecord::profit("a", 1, "yesterday"),
            OperationRecord::profit("a", json!(null), "2024-05-10"),
        ];
        let payments = PaymentMatcher::new().collect(&investor, &ops);
        assert!(payments.is_empty());
        assert!(!payments.paid_in(&may_2024()));
    }

    #[test]
    fn test_several_payments_in_one_period() {
        let investor = InvestorId::new("a");
        let ops = vec![
            OperationRecord::profit("a", 100, "2024-05-01"),
            OperationRecord::profit("a", 150, "2024-05-20"),
            OperationRecord::profit("a", 999, "2024-03-20"),
        ];
        let payments = PaymentMatcher::new().collect(&investor, &ops);
        assert_eq!(payments.len(), 3);
        assert!(payments.paid_in(&may_2024()));
        assert!(!payments.paid_in(&Period::new(2024, 3).unwrap()));
    }

    struct BrokenLedger;

    impl OperationLedger for BrokenLedger {
        fn operations_for(&self, _investor_id: &InvestorId) -> Result<Vec<OperationRecord>> {
            Err(AccrualError::DataUnavailable { collection: "operations" })
        }
    }

    #[test]
    fn test_unavailable_ledger_fails_open() {
        let payments = PaymentMatcher::new().load(&BrokenLedger, &InvestorId::new("a"));
        assert!(!payments.paid_in(&may_2024()));
    }
}
