//! Package pipeline: page fetch, login check, extraction.

use scraper::Html;

use crate::error_handling::FetchError;
use crate::fetch::{Clock, PageSource, SessionFetcher};
use crate::models::PackageListResult;
use crate::parse::extract_packages;

/// Produces the package list for the HTTP layer.
///
/// Constructed once at startup around the logged-in session and shared by all
/// requests.
#[derive(Debug)]
pub struct PackagePipeline<S, C> {
    fetcher: SessionFetcher<S, C>,
}

impl<S: PageSource, C: Clock> PackagePipeline<S, C> {
    /// Creates a pipeline with an empty page cache.
    pub fn new(source: S, clock: C) -> Self {
        Self {
            fetcher: SessionFetcher::new(source, clock),
        }
    }

    /// Returns every package on the tracking page.
    ///
    /// With `use_cache`, a page fetched less than a minute ago is reused.
    /// A redirected page yields the logged-out result without parsing.
    ///
    /// # Errors
    ///
    /// Upstream fetch failures are returned as is. Malformed packages never
    /// fail the call; they appear as empty entries.
    pub async fn get_packages(&self, use_cache: bool) -> Result<PackageListResult, FetchError> {
        let page = self.fetcher.fetch_page(use_cache).await?;

        if page.is_logged_out() {
            return Ok(PackageListResult::logged_out());
        }

        let document = Html::parse_document(&page.body);
        let items = extract_packages(&document);

        Ok(PackageListResult {
            items,
            logged_in: true,
        })
    }

    /// The session fetcher backing this pipeline.
    pub fn fetcher(&self) -> &SessionFetcher<S, C> {
        &self.fetcher
    }
}
