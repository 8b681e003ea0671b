use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{AccrualError, Result};

/// distribution day used when the settings do not name one
pub const DEFAULT_DISTRIBUTION_DAY: u32 = 1;

/// notifications kept by the notification store
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 100;

/// how the configured profit rate is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RateBasis {
    /// percent of principal paid each month
    #[default]
    Monthly,
    /// percent of principal per year, paid in twelve equal parts
    Annual,
}

/// application settings consumed by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// profit rate in percent (e.g. 2 for 2%)
    #[serde(default)]
    pub interest_rate: Option<Decimal>,
    #[serde(default)]
    pub rate_basis: RateBasis,
    /// day of the month profits are paid out (1..=31)
    #[serde(default = "default_distribution_day")]
    pub profit_distribution_day: u32,
    #[serde(default = "default_notification_limit")]
    pub notification_limit: usize,
}

fn default_distribution_day() -> u32 {
    DEFAULT_DISTRIBUTION_DAY
}

fn default_notification_limit() -> usize {
    DEFAULT_NOTIFICATION_LIMIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interest_rate: None,
            rate_basis: RateBasis::Monthly,
            profit_distribution_day: DEFAULT_DISTRIBUTION_DAY,
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
        }
    }
}

impl Settings {
    /// monthly profit rate in percent
    pub fn monthly(percent: Decimal) -> Self {
        Self {
            interest_rate: Some(percent),
            ..Self::default()
        }
    }

    /// annual profit rate in percent
    pub fn annual(percent: Decimal) -> Self {
        Self {
            interest_rate: Some(percent),
            rate_basis: RateBasis::Annual,
            ..Self::default()
        }
    }

    pub fn with_distribution_day(mut self, day: u32) -> Self {
        self.profit_distribution_day = day;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// check every setting the engine depends on
    pub fn validate(&self) -> Result<()> {
        self.monthly_profit_rate()?;
        self.distribution_day()?;
        if self.notification_limit == 0 {
            return Err(AccrualError::InvalidConfiguration {
                message: "notification limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// the per-month profit rate, converted from the configured basis
    pub fn monthly_profit_rate(&self) -> Result<Rate> {
        let percent = self.interest_rate.ok_or(AccrualError::MissingConfiguration {
            setting: "interestRate",
        })?;

        let rate = Rate::from_percent_decimal(percent);
        if rate.is_negative() {
            return Err(AccrualError::InvalidProfitRate { rate });
        }

        Ok(match self.rate_basis {
            RateBasis::Monthly => rate,
            RateBasis::Annual => rate.monthly_rate(),
        })
    }

    pub fn distribution_day(&self) -> Result<u32> {
        match self.profit_distribution_day {
            1..=31 => Ok(self.profit_distribution_day),
            day => Err(AccrualError::InvalidConfiguration {
                message: format!("profit distribution day {} outside 1..=31", day),
            }),
        }
    }
}
