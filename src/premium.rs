//! # Premium Status Store
//!
//! Holds the subscription state that gates the advanced recipe-card features.
//!
//! # Expiry
//!
//! Every `read()` checks `expires_at` against the clock:
//!
//! - expired with a subscription id: downgraded in place (`is_premium = false`,
//!   status `expired`), plan and subscription id are kept for history
//! - expired without a subscription id: the record is cleared
//!
//! Cancelling stops renewal only; access lasts until the expiry date.

use crate::clock::Clock;
use crate::storage::{keys, read_json, write_json, KeyValueStore};
use crate::storage_errors::StorageError;
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Subscription lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    Expired,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Canceled => write!(f, "canceled"),
            SubscriptionStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Billing period offered at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PremiumPlan {
    Monthly,
    Yearly,
}

impl PremiumPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            PremiumPlan::Monthly => "monthly",
            PremiumPlan::Yearly => "yearly",
        }
    }

    /// Length of one billing period in calendar months
    pub fn months(&self) -> u32 {
        match self {
            PremiumPlan::Monthly => 1,
            PremiumPlan::Yearly => 12,
        }
    }

    /// Expiry of a period starting at `start`
    pub fn expiry_from(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start
            .checked_add_months(Months::new(self.months()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl fmt::Display for PremiumPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PremiumPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Ok(PremiumPlan::Monthly),
            "yearly" | "year" | "annual" => Ok(PremiumPlan::Yearly),
            other => Err(format!("Unknown premium plan: {}", other)),
        }
    }
}

/// Stored subscription state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumStatus {
    pub is_premium: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<SubscriptionStatus>,
}

impl PremiumStatus {
    /// Whether `expires_at` lies before `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at < now)
    }
}

/// Persists [`PremiumStatus`] in the key-value store
pub struct PremiumStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl PremiumStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current status with the expiry rules applied
    pub fn read(&self) -> Result<PremiumStatus, StorageError> {
        let Some(mut status) = read_json::<PremiumStatus>(&*self.store, keys::PREMIUM_STATUS)?
        else {
            return Ok(PremiumStatus::default());
        };

        let now = self.clock.now();
        if !status.is_expired_at(now) {
            return Ok(status);
        }

        if status.subscription_id.is_some() {
            if status.is_premium || status.subscription_status != Some(SubscriptionStatus::Expired)
            {
                info!(
                    "Premium subscription {:?} expired at {:?}, downgrading",
                    status.subscription_id, status.expires_at
                );
                status.is_premium = false;
                status.subscription_status = Some(SubscriptionStatus::Expired);
                write_json(&*self.store, keys::PREMIUM_STATUS, &status)?;
            }
            Ok(status)
        } else {
            info!(
                "Premium access without subscription expired at {:?}, clearing",
                status.expires_at
            );
            self.clear()?;
            Ok(PremiumStatus::default())
        }
    }

    /// Convenience for feature gating
    pub fn is_premium(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.is_premium)
    }

    /// Persist `status` and index its subscription id and plan separately
    pub fn write(&self, status: &PremiumStatus) -> Result<(), StorageError> {
        write_json(&*self.store, keys::PREMIUM_STATUS, status)?;

        match &status.subscription_id {
            Some(id) => self.store.set(keys::SUBSCRIPTION_ID, id)?,
            None => self.store.remove(keys::SUBSCRIPTION_ID)?,
        }
        match &status.plan {
            Some(plan) => self.store.set(keys::SUBSCRIPTION_PERIOD, plan)?,
            None => self.store.remove(keys::SUBSCRIPTION_PERIOD)?,
        }

        debug!(
            "Stored premium status: premium={}, plan={:?}",
            status.is_premium, status.plan
        );
        Ok(())
    }

    /// Remove the status and its index keys
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::PREMIUM_STATUS)?;
        self.store.remove(keys::SUBSCRIPTION_ID)?;
        self.store.remove(keys::SUBSCRIPTION_PERIOD)?;
        info!("Premium status cleared");
        Ok(())
    }

    /// Mark an active subscription as canceled
    ///
    /// No-op unless the user is premium and has a subscription id. Access is
    /// kept until `expires_at`.
    pub fn cancel(&self) -> Result<(), StorageError> {
        let mut status = self.read()?;
        if !status.is_premium || status.subscription_id.is_none() {
            warn!("Ignoring cancel: no active subscription");
            return Ok(());
        }

        status.subscription_status = Some(SubscriptionStatus::Canceled);
        self.write(&status)?;
        info!("Subscription {:?} canceled", status.subscription_id);
        Ok(())
    }

    /// Grant premium after a successful checkout
    pub fn activate(
        &self,
        plan: PremiumPlan,
        subscription_id: Option<String>,
    ) -> Result<PremiumStatus, StorageError> {
        let expires_at = plan.expiry_from(self.clock.now());
        let status = PremiumStatus {
            is_premium: true,
            plan: Some(plan.as_str().to_string()),
            expires_at: Some(expires_at),
            subscription_id,
            subscription_status: Some(SubscriptionStatus::Active),
        };

        self.write(&status)?;
        info!("Premium {} plan activated until {}", plan, expires_at);
        Ok(status)
    }

    /// Subscription id from the index key
    pub fn subscription_id(&self) -> Result<Option<String>, StorageError> {
        self.store.get(keys::SUBSCRIPTION_ID)
    }

    /// Plan name from the index key
    pub fn subscription_period(&self) -> Result<Option<String>, StorageError> {
        self.store.get(keys::SUBSCRIPTION_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn setup() -> (PremiumStore, Arc<MemoryStore>, Arc<FixedClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(now()));
        (PremiumStore::new(store.clone(), clock.clone()), store, clock)
    }

    #[test]
    fn test_default_status_is_free() -> Result<(), StorageError> {
        let (premium, _store, _clock) = setup();
        assert_eq!(premium.read()?, PremiumStatus::default());
        assert!(!premium.is_premium()?);
        Ok(())
    }

    #[test]
    fn test_write_indexes_subscription_fields() -> Result<(), StorageError> {
        let (premium, store, _clock) = setup();
        let status = PremiumStatus {
            is_premium: true,
            plan: Some("monthly".to_string()),
            expires_at: Some(now() + Duration::days(10)),
            subscription_id: Some("sub_123".to_string()),
            subscription_status: Some(SubscriptionStatus::Active),
        };

        premium.write(&status)?;
        assert_eq!(premium.read()?, status);
        assert_eq!(premium.subscription_id()?, Some("sub_123".to_string()));
        assert_eq!(premium.subscription_period()?, Some("monthly".to_string()));

        premium.write(&PremiumStatus::default())?;
        assert_eq!(store.get(keys::SUBSCRIPTION_ID)?, None);
        assert_eq!(store.get(keys::SUBSCRIPTION_PERIOD)?, None);
        Ok(())
    }

    #[test]
    fn test_expired_without_subscription_is_cleared() -> Result<(), StorageError> {
        let (premium, store, _clock) = setup();
        premium.write(&PremiumStatus {
            is_premium: true,
            plan: Some("monthly".to_string()),
            expires_at: Some(now() - Duration::days(1)),
            ..Default::default()
        })?;

        assert_eq!(premium.read()?, PremiumStatus::default());
        assert_eq!(store.get(keys::PREMIUM_STATUS)?, None);
        assert_eq!(store.get(keys::SUBSCRIPTION_PERIOD)?, None);
        Ok(())
    }

    #[test]
    fn test_expired_with_subscription_is_downgraded() -> Result<(), StorageError> {
        let (premium, _store, _clock) = setup();
        premium.write(&PremiumStatus {
            is_premium: true,
            plan: Some("yearly".to_string()),
            expires_at: Some(now() - Duration::seconds(1)),
            subscription_id: Some("sub_9".to_string()),
            subscription_status: Some(SubscriptionStatus::Active),
        })?;

        let status = premium.read()?;
        assert!(!status.is_premium);
        assert_eq!(status.subscription_status, Some(SubscriptionStatus::Expired));
        assert_eq!(status.subscription_id.as_deref(), Some("sub_9"));
        assert_eq!(status.plan.as_deref(), Some("yearly"));

        // The downgrade was persisted
        assert_eq!(premium.read()?, status);
        Ok(())
    }

    #[test]
    fn test_cancel_keeps_access_until_expiry() -> Result<(), StorageError> {
        let (premium, _store, clock) = setup();
        premium.activate(PremiumPlan::Monthly, Some("sub_1".to_string()))?;

        premium.cancel()?;
        let status = premium.read()?;
        assert!(status.is_premium);
        assert_eq!(status.subscription_status, Some(SubscriptionStatus::Canceled));

        clock.advance(Duration::days(40));
        let status = premium.read()?;
        assert!(!status.is_premium);
        assert_eq!(status.subscription_status, Some(SubscriptionStatus::Expired));
        Ok(())
    }

    #[test]
    fn test_cancel_without_subscription_is_noop() -> Result<(), StorageError> {
        let (premium, _store, _clock) = setup();
        premium.activate(PremiumPlan::Monthly, None)?;
        let before = premium.read()?;

        premium.cancel()?;
        assert_eq!(premium.read()?, before);

        premium.clear()?;
        premium.cancel()?;
        assert_eq!(premium.read()?, PremiumStatus::default());
        Ok(())
    }

    #[test]
    fn test_activate_computes_expiry() -> Result<(), StorageError> {
        let (premium, _store, _clock) = setup();

        let monthly = premium.activate(PremiumPlan::Monthly, Some("sub_m".to_string()))?;
        assert_eq!(
            monthly.expires_at,
            Some(Utc.with_ymd_and_hms(2026, 11, 19, 12, 0, 0).unwrap())
        );
        assert_eq!(monthly.plan.as_deref(), Some("monthly"));

        let yearly = premium.activate(PremiumPlan::Yearly, Some("sub_y".to_string()))?;
        assert_eq!(
            yearly.expires_at,
            Some(Utc.with_ymd_and_hms(2027, 10, 19, 12, 0, 0).unwrap())
        );
        assert_eq!(premium.subscription_id()?, Some("sub_y".to_string()));
        Ok(())
    }

    #[test]
    fn test_malformed_status_reads_as_default() -> Result<(), StorageError> {
        let (premium, store, _clock) = setup();
        store.set(keys::PREMIUM_STATUS, "not json at all")?;
        assert_eq!(premium.read()?, PremiumStatus::default());
        Ok(())
    }

    #[test]
    fn test_status_json_shape() {
        let status = PremiumStatus {
            is_premium: false,
            subscription_status: Some(SubscriptionStatus::Expired),
            ..Default::default()
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["isPremium"], false);
        assert_eq!(json["subscriptionStatus"], "expired");
        assert!(json.get("plan").is_none());
    }

    #[test]
    fn test_plan_parsing() {
        assert_eq!("Monthly".parse::<PremiumPlan>(), Ok(PremiumPlan::Monthly));
        assert_eq!("annual".parse::<PremiumPlan>(), Ok(PremiumPlan::Yearly));
        assert!("weekly".parse::<PremiumPlan>().is_err());
    }
}
