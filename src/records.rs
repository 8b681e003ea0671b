use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::decimal::Money;
use crate::errors::{AccrualError, Result};
use crate::types::{
    Investment, InvestmentStatus, InvestorId, Operation, OperationStatus, OperationType,
};

/// investment as stored by the investment ledger, fields kept loose until `validate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    #[serde(default, deserialize_with = "lenient_optional_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_investor_id")]
    pub investor_id: InvestorId,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub date: Value,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub status: Option<InvestmentStatus>,
}

impl InvestmentRecord {
    pub fn new(
        investor_id: impl Into<String>,
        amount: impl Into<Value>,
        date: impl Into<Value>,
        status: InvestmentStatus,
    ) -> Self {
        Self {
            id: None,
            investor_id: InvestorId::new(investor_id),
            amount: amount.into(),
            date: date.into(),
            status: Some(status),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == Some(InvestmentStatus::Active)
    }

    fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("investment {}", id),
            None => format!("investment of investor {}", self.investor_id),
        }
    }

    /// validate amount and date into a typed investment
    pub fn validate(&self) -> Result<Investment> {
        let label = self.label();
        Ok(Investment {
            id: self.id.clone(),
            investor_id: self.investor_id.clone(),
            amount: parse_amount(&self.amount, &label)?,
            date: parse_timestamp(&self.date, &label)?,
            status: self.status.unwrap_or(InvestmentStatus::Other),
        })
    }
}

/// operation as stored by the operation ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    #[serde(default, deserialize_with = "lenient_optional_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_investor_id")]
    pub investor_id: InvestorId,
    #[serde(rename = "type", default, deserialize_with = "lenient_enum")]
    pub operation_type: Option<OperationType>,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub date: Value,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub status: Option<OperationStatus>,
}

impl OperationRecord {
    pub fn new(
        investor_id: impl Into<String>,
        operation_type: OperationType,
        amount: impl Into<Value>,
        date: impl Into<Value>,
        status: OperationStatus,
    ) -> Self {
        Self {
            id: None,
            investor_id: InvestorId::new(investor_id),
            operation_type: Some(operation_type),
            amount: amount.into(),
            date: date.into(),
            status: Some(status),
        }
    }

    /// profit payment with active status
    pub fn profit(investor_id: impl Into<String>, amount: impl Into<Value>, date: impl Into<Value>) -> Self {
        Self::new(investor_id, OperationType::Profit, amount, date, OperationStatus::Active)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("operation {}", id),
            None => format!("operation of investor {}", self.investor_id),
        }
    }

    pub fn validate(&self) -> Result<Operation> {
        let label = self.label();
        Ok(Operation {
            id: self.id.clone(),
            investor_id: self.investor_id.clone(),
            operation_type: self.operation_type.unwrap_or(OperationType::Other),
            amount: parse_amount(&self.amount, &label)?,
            date: parse_timestamp(&self.date, &label)?,
            status: self.status.unwrap_or(OperationStatus::Other),
        })
    }
}

/// parse an amount stored as a number or a numeric string
pub fn parse_amount(value: &Value, record: &str) -> Result<Money> {
    let invalid = |message: String| AccrualError::InvalidAmount {
        record: record.to_string(),
        message,
    };

    let decimal = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(f) = n.as_f64() {
                Decimal::try_from(f).map_err(|e| invalid(e.to_string()))?
            } else {
                return Err(invalid(format!("unrepresentable number {}", n)));
            }
        }
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
            if cleaned.is_empty() {
                return Err(invalid("empty amount".to_string()));
            }
            cleaned
                .parse::<Decimal>()
                .map_err(|e| invalid(format!("{:?}: {}", s, e)))?
        }
        Value::Null => return Err(invalid("missing amount".to_string())),
        other => return Err(invalid(format!("unexpected value {}", other))),
    };

    if decimal < Decimal::ZERO {
        return Err(invalid(format!("negative amount {}", decimal)));
    }

    Ok(Money::from_decimal(decimal))
}

/// parse a timestamp stored as iso-8601 text, a plain date or epoch milliseconds
pub fn parse_timestamp(value: &Value, record: &str) -> Result<DateTime<Utc>> {
    let invalid = |message: String| AccrualError::InvalidDate {
        record: record.to_string(),
        message,
    };

    match value {
        Value::String(s) => parse_date_text(s.trim()).ok_or_else(|| invalid(format!("unrecognised date {:?}", s))),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(|| invalid(format!("timestamp out of range {}", n))),
        Value::Null => Err(invalid("missing date".to_string())),
        other => Err(invalid(format!("unexpected value {}", other))),
    }
}

fn parse_date_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ids are written as strings or numbers depending on which screen created the record
fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(id_from_value(Value::deserialize(deserializer)?))
}

// a status or type that is not a known string reads as absent
fn lenient_enum<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

pub(crate) fn lenient_investor_id<'de, D>(deserializer: D) -> std::result::Result<InvestorId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(value)
        .map(InvestorId::new)
        .ok_or_else(|| serde::de::Error::custom("investorId must be a non-empty string or number"))
}
