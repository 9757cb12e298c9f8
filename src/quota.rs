//! # Quota Tracker
//!
//! Counts free-tier searches per calendar day. The counter resets itself the
//! first time it is touched on a new day. The tracker never refuses an
//! increment; checking the limit is up to the caller.

use crate::clock::Clock;
use crate::storage::{keys, KeyValueStore};
use crate::storage_errors::StorageError;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Day-scoped search counter
pub struct QuotaTracker {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    limit: u32,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, limit: u32) -> Self {
        Self {
            store,
            clock,
            limit,
        }
    }

    /// Searches recorded today
    pub fn get_count(&self) -> Result<u32, StorageError> {
        self.refresh()
    }

    /// Record one search
    pub fn increment(&self) -> Result<(), StorageError> {
        let count = self.refresh()?.saturating_add(1);
        self.store.set(keys::SEARCH_COUNT, &count.to_string())?;
        debug!("Search count incremented to {}", count);
        Ok(())
    }

    /// Free searches allowed per day
    pub fn get_limit(&self) -> u32 {
        self.limit
    }

    /// Free searches left today
    pub fn remaining(&self) -> Result<u32, StorageError> {
        Ok(self.limit.saturating_sub(self.get_count()?))
    }

    /// Reset the counter when the stored date is not today, then return the count
    fn refresh(&self) -> Result<u32, StorageError> {
        let today = self.clock.today();
        let stored_date = self
            .store
            .get(keys::SEARCH_COUNT_DATE)?
            .and_then(|raw| NaiveDate::parse_from_str(&raw, DATE_FORMAT).ok());

        if stored_date != Some(today) {
            info!(
                "Resetting search count for {} (stored date: {:?})",
                today, stored_date
            );
            self.store.set(keys::SEARCH_COUNT, "0")?;
            self.store
                .set(keys::SEARCH_COUNT_DATE, &today.format(DATE_FORMAT).to_string())?;
            return Ok(0);
        }

        let count = match self.store.get(keys::SEARCH_COUNT)? {
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|e| {
                warn!("Treating unreadable search count '{}' as 0: {}", raw, e);
                0
            }),
            None => 0,
        };
        Ok(count)
    }
}
