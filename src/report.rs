use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::arrears::{ArrearsResult, ScanReport};
use crate::decimal::Money;
use crate::errors::{AccrualError, Result};
use crate::types::{Investor, InvestorId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrearsView {
    pub investor_id: InvestorId,
    pub investor_name: Option<String>,
    pub period: String,
    pub current_period_profit: Money,
    pub accumulated_past_profit: Money,
    pub unpaid_period_count: u32,
    pub unpaid_periods: Vec<String>,
    pub distribution_date: NaiveDate,
    pub total_due: Money,
}

impl ArrearsView {
    pub fn from_result(result: &ArrearsResult, investor_name: Option<String>) -> Self {
        ArrearsView {
            investor_id: result.investor_id.clone(),
            investor_name,
            period: result.current_period.to_string(),
            current_period_profit: result.current_period_profit,
            accumulated_past_profit: result.accumulated_past_profit,
            unpaid_period_count: result.unpaid_period_count,
            unpaid_periods: result.unpaid_periods.iter().map(|p| p.to_string()).collect(),
            distribution_date: result.distribution_date,
            total_due: result.total_due(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Data,
    Config,
    Other,
}

impl From<&AccrualError> for FailureKind {
    fn from(error: &AccrualError) -> Self {
        if error.is_data_error() {
            FailureKind::Data
        } else if error.is_config_error() {
            FailureKind::Config
        } else {
            FailureKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureView {
    pub investor_id: InvestorId,
    pub kind: FailureKind,
    pub message: String,
}

/// serializable view of a full scan for the ui layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReportView {
    pub scanned_at: DateTime<Utc>,
    pub cancelled: bool,
    pub investors_scanned: usize,
    pub total_due: Money,
    /// only investors with something owed
    pub due: Vec<ArrearsView>,
    pub failures: Vec<FailureView>,
}

impl ScanReportView {
    /// build the view, naming investors from the directory listing
    pub fn from_report(report: &ScanReport, investors: &[Investor]) -> Result<Self> {
        let name_of = |id: &InvestorId| {
            investors
                .iter()
                .find(|inv| &inv.id == id)
                .map(|inv| inv.name.clone())
        };

        Ok(ScanReportView {
            scanned_at: report.scanned_at,
            cancelled: report.cancelled,
            investors_scanned: report.outcomes.len(),
            total_due: report.total_due()?,
            due: report
                .reportable()
                .map(|r| ArrearsView::from_result(r, name_of(&r.investor_id)))
                .collect(),
            failures: report
                .failures()
                .map(|(id, error)| FailureView {
                    investor_id: id.clone(),
                    kind: FailureKind::from(error),
                    message: error.to_string(),
                })
                .collect(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
