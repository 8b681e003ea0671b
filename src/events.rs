use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::arrears::period::Period;
use crate::decimal::Money;
use crate::types::{InvestorId, OperationType};

/// all events emitted by the ledger and the arrears monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // ledger events
    InvestmentAdded {
        investor_id: InvestorId,
        amount: Money,
        date: DateTime<Utc>,
    },
    ProfitPaymentRecorded {
        investor_id: InvestorId,
        amount: Money,
        date: DateTime<Utc>,
    },
    OperationRecorded {
        investor_id: InvestorId,
        operation_type: OperationType,
        amount: Money,
        date: DateTime<Utc>,
    },
    OperationReversed {
        investor_id: InvestorId,
        operation_id: String,
    },

    // arrears events
    CurrentProfitDue {
        investor_id: InvestorId,
        period: Period,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    ArrearsDetected {
        investor_id: InvestorId,
        unpaid_periods: u32,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    InvestorScanFailed {
        investor_id: InvestorId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    ScanCompleted {
        investors_scanned: usize,
        failures: usize,
        cancelled: bool,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    /// the investor the event is about, if any
    pub fn investor_id(&self) -> Option<&InvestorId> {
        match self {
            Event::InvestmentAdded { investor_id, .. }
            | Event::ProfitPaymentRecorded { investor_id, .. }
            | Event::OperationRecorded { investor_id, .. }
            | Event::OperationReversed { investor_id, .. }
            | Event::CurrentProfitDue { investor_id, .. }
            | Event::ArrearsDetected { investor_id, .. }
            | Event::InvestorScanFailed { investor_id, .. } => Some(investor_id),
            Event::ScanCompleted { .. } => None,
        }
    }

    /// ledger changes that can move an investor's arrears
    pub fn changes_arrears(&self) -> bool {
        matches!(
            self,
            Event::InvestmentAdded { .. }
                | Event::ProfitPaymentRecorded { .. }
                | Event::OperationReversed { .. }
        )
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
