use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::Money;

/// unique identifier for an investor, as assigned by the investor directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestorId(String);

impl InvestorId {
    pub fn new(id: impl Into<String>) -> Self {
        InvestorId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvestorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InvestorId {
    fn from(s: &str) -> Self {
        InvestorId::new(s)
    }
}

/// investor as exposed by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investor {
    #[serde(deserialize_with = "crate::records::lenient_investor_id")]
    pub id: InvestorId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Investor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: InvestorId::new(id),
            name: name.into(),
            phone: None,
        }
    }
}

/// investment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    /// capital deposited and accruing profit
    Active,
    /// closed by the investor
    Closed,
    /// capital withdrawn
    Withdrawn,
    #[serde(other)]
    Other,
}

/// operation type in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Profit,
    Deposit,
    Withdrawal,
    #[serde(other)]
    Other,
}

/// operation status in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Active,
    /// undone after the fact, no longer counts
    Reversed,
    #[serde(other)]
    Other,
}

/// validated investment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Option<String>,
    pub investor_id: InvestorId,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub status: InvestmentStatus,
}

impl Investment {
    pub fn is_active(&self) -> bool {
        self.status == InvestmentStatus::Active
    }
}

/// validated ledger operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: Option<String>,
    pub investor_id: InvestorId,
    pub operation_type: OperationType,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub status: OperationStatus,
}

impl Operation {
    /// only active profit operations count as disbursements
    pub fn is_profit_disbursement(&self) -> bool {
        self.operation_type == OperationType::Profit && self.status == OperationStatus::Active
    }
}

/// the two buckets an arrears result reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitBucket {
    /// profit due for the current month
    CurrentPeriod,
    /// unpaid profit from past months
    PastPeriods,
}
