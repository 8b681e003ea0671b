use thiserror::Error;

use crate::decimal::Rate;
use crate::types::InvestorId;

#[derive(Error, Debug)]
pub enum AccrualError {
    #[error("invalid date on {record}: {message}")]
    InvalidDate {
        record: String,
        message: String,
    },

    #[error("invalid amount on {record}: {message}")]
    InvalidAmount {
        record: String,
        message: String,
    },

    #[error("invalid record: {message}")]
    InvalidRecord {
        message: String,
    },

    #[error("{collection} unavailable")]
    DataUnavailable {
        collection: &'static str,
    },

    #[error("investor not found: {id}")]
    InvestorNotFound {
        id: InvestorId,
    },

    #[error("missing configuration: {setting}")]
    MissingConfiguration {
        setting: &'static str,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid profit rate: {rate}")]
    InvalidProfitRate {
        rate: Rate,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AccrualError {
    /// true for errors caused by a bad ledger record or missing ledger data
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            AccrualError::InvalidDate { .. }
                | AccrualError::InvalidAmount { .. }
                | AccrualError::InvalidRecord { .. }
                | AccrualError::DataUnavailable { .. }
                | AccrualError::InvestorNotFound { .. }
        )
    }

    /// true for errors caused by settings
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AccrualError::MissingConfiguration { .. }
                | AccrualError::InvalidConfiguration { .. }
                | AccrualError::InvalidProfitRate { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AccrualError>;
