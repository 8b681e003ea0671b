use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::Settings;
use crate::errors::{AccrualError, Result};
use crate::events::{Event, EventStore};
use crate::records::{InvestmentRecord, OperationRecord};
use crate::types::{Investor, InvestorId, OperationStatus};

/// read access to the investor directory
pub trait InvestorDirectory {
    /// every investor; `DataUnavailable` when the directory itself is missing
    fn investors(&self) -> Result<Vec<Investor>>;

    fn investor(&self, id: &InvestorId) -> Result<Investor> {
        self.investors()?
            .into_iter()
            .find(|inv| &inv.id == id)
            .ok_or_else(|| AccrualError::InvestorNotFound { id: id.clone() })
    }
}

/// read access to the investment ledger
pub trait InvestmentLedger {
    fn investments_for(&self, investor_id: &InvestorId) -> Result<Vec<InvestmentRecord>>;
}

/// read access to the operation ledger
pub trait OperationLedger {
    fn operations_for(&self, investor_id: &InvestorId) -> Result<Vec<OperationRecord>>;
}

/// everything a scan reads
pub trait Ledger: InvestorDirectory + InvestmentLedger + OperationLedger {}

impl<T: InvestorDirectory + InvestmentLedger + OperationLedger> Ledger for T {}

/// the application's backup document
///
/// entries that cannot be read at all (no owner, not an object) are dropped
/// with a warning; a collection that is not a list is left unavailable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default, deserialize_with = "readable_entries")]
    pub investors: Option<Vec<Investor>>,
    #[serde(default, deserialize_with = "readable_entries")]
    pub investments: Option<Vec<InvestmentRecord>>,
    #[serde(default, deserialize_with = "readable_entries")]
    pub operations: Option<Vec<OperationRecord>>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

impl BackupDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn readable_entries<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        Value::Null => return Ok(None),
        other => {
            warn!(value = %other, "backup collection is not a list, treating it as unavailable");
            return Ok(None);
        }
    };

    let mut readable = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(record) => readable.push(record),
            Err(e) => warn!(index, error = %e, "skipping unreadable backup entry"),
        }
    }
    Ok(Some(readable))
}

/// in-memory snapshot of the three ledgers
///
/// a collection that was never loaded is reported as unavailable, which is
/// different from a loaded but empty collection.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    investors: Option<Vec<Investor>>,
    investments: Option<Vec<InvestmentRecord>>,
    operations: Option<Vec<OperationRecord>>,
    pub events: EventStore,
}

impl MemoryLedger {
    /// empty but loaded ledgers
    pub fn new() -> Self {
        Self {
            investors: Some(Vec::new()),
            investments: Some(Vec::new()),
            operations: Some(Vec::new()),
            events: EventStore::new(),
        }
    }

    /// ledgers with nothing loaded
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn from_backup(backup: BackupDocument) -> Self {
        Self {
            investors: backup.investors,
            investments: backup.investments,
            operations: backup.operations,
            events: EventStore::new(),
        }
    }

    pub fn add_investor(&mut self, investor: Investor) {
        self.investors.get_or_insert_with(Vec::new).push(investor);
    }

    pub fn add_investment(&mut self, record: InvestmentRecord) -> Result<()> {
        let investment = record.validate()?;
        self.events.emit(Event::InvestmentAdded {
            investor_id: investment.investor_id,
            amount: investment.amount,
            date: investment.date,
        });
        self.investments.get_or_insert_with(Vec::new).push(record);
        Ok(())
    }

    /// append an operation, announcing profit payments to subscribers
    pub fn record_operation(&mut self, record: OperationRecord) -> Result<()> {
        let op = record.validate()?;

        if op.is_profit_disbursement() {
            self.events.emit(Event::ProfitPaymentRecorded {
                investor_id: op.investor_id,
                amount: op.amount,
                date: op.date,
            });
        } else {
            self.events.emit(Event::OperationRecorded {
                investor_id: op.investor_id,
                operation_type: op.operation_type,
                amount: op.amount,
                date: op.date,
            });
        }

        self.operations.get_or_insert_with(Vec::new).push(record);
        Ok(())
    }

    /// mark an operation reversed so it no longer counts as a payment
    pub fn reverse_operation(&mut self, operation_id: &str) -> Result<()> {
        let record = self
            .operations
            .iter_mut()
            .flatten()
            .find(|r| r.id.as_deref() == Some(operation_id))
            .ok_or_else(|| AccrualError::InvalidRecord {
                message: format!("operation {} not found", operation_id),
            })?;

        record.status = Some(OperationStatus::Reversed);

        self.events.emit(Event::OperationReversed {
            investor_id: record.investor_id.clone(),
            operation_id: operation_id.to_string(),
        });
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

impl InvestorDirectory for MemoryLedger {
    fn investors(&self) -> Result<Vec<Investor>> {
        self.investors
            .clone()
            .ok_or(AccrualError::DataUnavailable { collection: "investors" })
    }
}

impl InvestmentLedger for MemoryLedger {
    fn investments_for(&self, investor_id: &InvestorId) -> Result<Vec<InvestmentRecord>> {
        let all = self
            .investments
            .as_ref()
            .ok_or(AccrualError::DataUnavailable { collection: "investments" })?;
        Ok(all.iter().filter(|r| &r.investor_id == investor_id).cloned().collect())
    }
}

impl OperationLedger for MemoryLedger {
    fn operations_for(&self, investor_id: &InvestorId) -> Result<Vec<OperationRecord>> {
        let all = self
            .operations
            .as_ref()
            .ok_or(AccrualError::DataUnavailable { collection: "operations" })?;
        Ok(all.iter().filter(|r| &r.investor_id == investor_id).cloned().collect())
    }
}
