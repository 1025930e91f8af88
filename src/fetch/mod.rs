//! Tracking page retrieval.
//!
//! This module provides:
//! - The authenticated portal session (`PortalSession`)
//! - The single-slot, one-minute page cache (`CacheSlot`)
//! - The fetcher that combines both behind a lock (`SessionFetcher`)
//! - Redirect-hop tracking used for logged-out detection

mod cache;
mod clock;
mod redirects;
mod session;

use std::future::Future;

use crate::error_handling::FetchError;

// Re-export public API
pub use cache::{CacheDecision, CacheSlot};
pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub(crate) use clock::ManualClock;
pub use redirects::{follow_redirects, RedirectRequest};
pub use session::{PortalSession, SessionFetcher};

/// A tracking page as received from the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Response body (HTML)
    pub body: String,
    /// Final HTTP status code
    pub status: u16,
    /// URL the body was served from, after redirects
    pub final_url: String,
    /// Redirect hops between the request and the final response
    pub redirect_hops: usize,
}

impl FetchedPage {
    /// The portal bounces unauthenticated requests to its login page, so any
    /// redirect means the session is gone.
    pub fn is_logged_out(&self) -> bool {
        self.redirect_hops > 0
    }

    /// Whether the final status is below 400.
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Something that can fetch the tracking page.
pub trait PageSource: Send + Sync {
    /// Performs one upstream fetch. Transport failures are returned as is.
    fn fetch_page(&self) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}
