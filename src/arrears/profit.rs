use crate::config::Settings;
use crate::decimal::{Money, Rate};
use crate::errors::{AccrualError, Result};

/// trait for per-period profit policies
pub trait ProfitCalculation {
    /// profit owed on `principal` for one period
    fn monthly_profit(&self, principal: Money) -> Result<Money>;

    fn monthly_rate(&self) -> Rate;
}

/// flat monthly profit: principal times the configured monthly rate
///
/// the same principal always yields the same figure, whichever period is
/// being evaluated. nothing compounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitCalculator {
    monthly_rate: Rate,
}

impl ProfitCalculator {
    pub fn new(monthly_rate: Rate) -> Result<Self> {
        if monthly_rate.is_negative() {
            return Err(AccrualError::InvalidProfitRate { rate: monthly_rate });
        }
        Ok(Self { monthly_rate })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.monthly_profit_rate()?)
    }
}

impl ProfitCalculation for ProfitCalculator {
    fn monthly_profit(&self, principal: Money) -> Result<Money> {
        principal
            .checked_apply_rate(self.monthly_rate)
            .ok_or_else(|| AccrualError::CalculationError {
                message: format!("profit on {} at {} overflows", principal, self.monthly_rate),
            })
    }

    fn monthly_rate(&self) -> Rate {
        self.monthly_rate
    }
}
