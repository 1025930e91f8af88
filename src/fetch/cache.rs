//! Single-slot tracking page cache.
//!
//! Holds the last fetched page and the time the cache window was last reset.
//! The slot only decides; the fetcher in `session` owns the lock around it.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::CACHE_WINDOW_MINUTES;

use super::FetchedPage;

/// Outcome of consulting the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDecision {
    /// An upstream fetch is needed
    pub refetch: bool,
    /// The window expired and the cached page was dropped
    pub cleared: bool,
}

/// The cached page and the start of the current cache window.
#[derive(Debug, Default)]
pub struct CacheSlot {
    page: Option<Arc<FetchedPage>>,
    last_update: DateTime<Utc>,
}

impl CacheSlot {
    /// Decides whether the caller has to fetch a fresh page.
    ///
    /// When more than one minute separates `now` from the last update (in
    /// either direction, so a clock stepping backwards also expires the
    /// window), the window restarts at `now`; with `use_cache` the cached page
    /// is dropped as well. A refetch is needed when the cache is bypassed or
    /// holds no usable page.
    pub fn should_refetch(&mut self, now: DateTime<Utc>, use_cache: bool) -> CacheDecision {
        let elapsed_minutes = (self.last_update - now).num_milliseconds().abs() as f64 / 60_000.0;

        let mut cleared = false;
        if elapsed_minutes > CACHE_WINDOW_MINUTES {
            self.last_update = now;
            if use_cache {
                self.page = None;
                cleared = true;
            }
        }

        CacheDecision {
            refetch: !use_cache || self.usable_page().is_none(),
            cleared,
        }
    }

    /// Replaces the cached page and restarts the window at `now`.
    pub fn store(&mut self, page: Arc<FetchedPage>, now: DateTime<Utc>) {
        self.page = Some(page);
        self.last_update = now;
    }

    /// The cached page, if it can be served. Error responses are never served
    /// from cache.
    pub fn usable_page(&self) -> Option<&Arc<FetchedPage>> {
        self.page.as_ref().filter(|page| page.is_success())
    }

    /// Start of the current cache window.
    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }
}
