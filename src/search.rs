//! Search gating for the free tier.
//!
//! The quota tracker only counts; this module is the caller-side check that
//! decides whether a search may run and records it afterwards.

use crate::premium::PremiumStore;
use crate::quota::QuotaTracker;
use crate::storage_errors::StorageError;
use std::fmt;
use tracing::{debug, info};

/// Longest accepted product name, in characters
pub const MAX_QUERY_LENGTH: usize = 255;

/// Reasons a search query is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    Empty,
    TooLong { max: usize },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Empty => write!(f, "Search query is empty"),
            QueryError::TooLong { max } => {
                write!(f, "Search query is longer than {} characters", max)
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Validates a restaurant or product name typed by the user
pub fn validate_search_query(query: &str) -> Result<String, QueryError> {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Err(QueryError::Empty);
    }

    if trimmed.chars().count() > MAX_QUERY_LENGTH {
        return Err(QueryError::TooLong {
            max: MAX_QUERY_LENGTH,
        });
    }

    Ok(trimmed.to_string())
}

/// Outcome of checking whether a search may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDecision {
    /// Premium users are never counted
    Premium,
    /// Free user with searches left before this one
    Allowed { remaining: u32 },
    /// Free user at or past the daily limit
    LimitReached { limit: u32 },
}

impl SearchDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, SearchDecision::LimitReached { .. })
    }
}

/// Applies the free-tier limit using the quota and premium stores
pub struct SearchGate<'a> {
    quota: &'a QuotaTracker,
    premium: &'a PremiumStore,
}

impl<'a> SearchGate<'a> {
    pub fn new(quota: &'a QuotaTracker, premium: &'a PremiumStore) -> Self {
        Self { quota, premium }
    }

    /// Decide whether a search may run now
    pub fn check(&self) -> Result<SearchDecision, StorageError> {
        if self.premium.is_premium()? {
            return Ok(SearchDecision::Premium);
        }

        let count = self.quota.get_count()?;
        let limit = self.quota.get_limit();
        let decision = if count < limit {
            SearchDecision::Allowed {
                remaining: limit - count,
            }
        } else {
            SearchDecision::LimitReached { limit }
        };

        debug!("Search check: count={}, limit={} -> {:?}", count, limit, decision);
        Ok(decision)
    }

    /// Count a completed search against the free quota
    ///
    /// Premium searches are not counted.
    pub fn record_search(&self) -> Result<(), StorageError> {
        if self.premium.is_premium()? {
            return Ok(());
        }
        self.quota.increment()?;
        info!(
            "Recorded free search, {} left today",
            self.quota.remaining()?
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::premium::PremiumPlan;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn stores(limit: u32) -> (QuotaTracker, PremiumStore) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
        ));
        (
            QuotaTracker::new(store.clone(), clock.clone(), limit),
            PremiumStore::new(store, clock),
        )
    }

    #[test]
    fn test_search_query_validation() {
        assert_eq!(
            validate_search_query("  Olive Garden breadsticks "),
            Ok("Olive Garden breadsticks".to_string())
        );
        assert_eq!(validate_search_query(""), Err(QueryError::Empty));
        assert_eq!(validate_search_query("   "), Err(QueryError::Empty));
        assert_eq!(
            validate_search_query(&"a".repeat(256)),
            Err(QueryError::TooLong { max: 255 })
        );
        assert!(validate_search_query(&"é".repeat(255)).is_ok());
    }

    #[test]
    fn test_free_user_hits_limit() -> Result<(), StorageError> {
        let (quota, premium) = stores(2);
        let gate = SearchGate::new(&quota, &premium);

        assert_eq!(gate.check()?, SearchDecision::Allowed { remaining: 2 });
        gate.record_search()?;
        assert_eq!(gate.check()?, SearchDecision::Allowed { remaining: 1 });
        gate.record_search()?;

        let decision = gate.check()?;
        assert_eq!(decision, SearchDecision::LimitReached { limit: 2 });
        assert!(!decision.is_allowed());
        Ok(())
    }

    #[test]
    fn test_premium_searches_not_counted() -> Result<(), StorageError> {
        let (quota, premium) = stores(1);
        premium.activate(PremiumPlan::Yearly, Some("sub_1".to_string()))?;
        let gate = SearchGate::new(&quota, &premium);

        for _ in 0..5 {
            assert_eq!(gate.check()?, SearchDecision::Premium);
            gate.record_search()?;
        }
        assert_eq!(quota.get_count()?, 0);
        Ok(())
    }
}
