use std::collections::{BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::arrears::{ArrearsResult, Period};
use crate::config::Settings;
use crate::decimal::Money;
use crate::errors::{AccrualError, Result};
use crate::types::{InvestorId, ProfitBucket};

/// unique identifier for a notification
pub type NotificationId = Uuid;

/// a profit-due notice for the ui layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub investor_id: InvestorId,
    pub bucket: ProfitBucket,
    /// month the notice was raised in
    pub period: Period,
    pub amount: Money,
    pub unpaid_periods: u32,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

type RaisedKey = (InvestorId, Period, ProfitBucket);

impl Notification {
    fn is_for(&self, investor_id: &InvestorId, period: Period, bucket: ProfitBucket) -> bool {
        &self.investor_id == investor_id && self.period == period && self.bucket == bucket
    }
}

/// bounded notification queue, newest first
///
/// a notice is raised at most once per (investor, month, bucket), even after
/// it has been dropped from the queue. the oldest entries are dropped past the
/// limit.
#[derive(Debug, Clone)]
pub struct NotificationStore {
    limit: usize,
    queue: VecDeque<Notification>,
    raised: BTreeSet<RaisedKey>,
}

impl NotificationStore {
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(AccrualError::InvalidConfiguration {
                message: "notification limit must be at least 1".to_string(),
            });
        }
        Ok(Self {
            limit,
            queue: VecDeque::with_capacity(limit),
            raised: BTreeSet::new(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.notification_limit)
    }

    /// raise notices for the due buckets of a result, skipping ones already raised
    ///
    /// a notice still in the queue takes the latest figures. returns the newly
    /// created notifications.
    pub fn publish(&mut self, result: &ArrearsResult, now: DateTime<Utc>) -> Vec<Notification> {
        let period = result.current_period;
        // keys from earlier months can never match again
        self.raised.retain(|(_, raised_in, _)| *raised_in >= period);

        let mut created = Vec::new();
        for bucket in result.due_buckets() {
            let amount = result.amount_for(bucket);
            let unpaid_periods = match bucket {
                ProfitBucket::CurrentPeriod => 1,
                ProfitBucket::PastPeriods => result.unpaid_period_count,
            };

            let key = (result.investor_id.clone(), period, bucket);
            if self.raised.contains(&key) {
                self.refresh_figures(&key, amount, unpaid_periods);
                continue;
            }

            let notification = Notification {
                id: Uuid::new_v4(),
                investor_id: result.investor_id.clone(),
                bucket,
                period,
                amount,
                unpaid_periods,
                created_at: now,
                read: false,
            };
            self.raised.insert(key);
            created.push(notification.clone());
            self.push(notification);
        }

        created
    }

    fn refresh_figures(&mut self, key: &RaisedKey, amount: Money, unpaid_periods: u32) {
        let (investor_id, period, bucket) = key;
        if let Some(n) = self.queue.iter_mut().find(|n| n.is_for(investor_id, *period, *bucket)) {
            if n.amount != amount || n.unpaid_periods != unpaid_periods {
                debug!(investor = %investor_id, amount = %amount, "updating notification figures");
                n.amount = amount;
                n.unpaid_periods = unpaid_periods;
            }
        }
    }

    fn push(&mut self, notification: Notification) {
        self.queue.push_front(notification);
        self.queue.truncate(self.limit);
    }

    /// drop unread notices of a bucket that is no longer owed
    ///
    /// the bucket may be raised again if it falls due later in the month.
    pub fn resolve(&mut self, investor_id: &InvestorId, bucket: ProfitBucket) -> usize {
        self.raised
            .retain(|(raised_for, _, raised_bucket)| !(raised_for == investor_id && *raised_bucket == bucket));

        let before = self.queue.len();
        self.queue
            .retain(|n| !(n.investor_id == *investor_id && n.bucket == bucket && !n.read));
        before - self.queue.len()
    }

    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        match self.queue.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        self.queue.iter_mut().for_each(|n| n.read = true);
    }

    pub fn unread_count(&self) -> usize {
        self.queue.iter().filter(|n| !n.read).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn for_investor<'a>(&'a self, investor_id: &'a InvestorId) -> impl Iterator<Item = &'a Notification> {
        self.queue.iter().filter(move |n| &n.investor_id == investor_id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
