//! Portal session and cached page fetching.

use std::sync::Arc;

use tokio::sync::Mutex;
use url::Url;

use crate::config::{Credentials, LOGIN_PATH, MAX_REDIRECT_HOPS, TRACKING_PATH};
use crate::error_handling::{FetchError, InitializationError};

use super::cache::CacheSlot;
use super::clock::Clock;
use super::redirects::{follow_redirects, RedirectRequest};
use super::{FetchedPage, PageSource};

/// An HTTP client logged in to the portal.
///
/// Created once at startup and shared by every request. The session cookie
/// lives in the client's cookie store; nothing re-validates or refreshes it.
#[derive(Debug, Clone)]
pub struct PortalSession {
    client: reqwest::Client,
    login_url: Url,
    tracking_url: Url,
}

fn join(base_url: &Url, path: &str) -> Result<Url, InitializationError> {
    base_url
        .join(path)
        .map_err(|e| InitializationError::InvalidUrlError {
            url: format!("{}{}", base_url, path),
            source: e,
        })
}

impl PortalSession {
    /// Binds a client to the portal at `base_url`.
    ///
    /// The client must have a cookie store and automatic redirects disabled
    /// (see `initialization::init_client`).
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, InitializationError> {
        let base = Url::parse(base_url).map_err(|e| InitializationError::InvalidUrlError {
            url: base_url.to_string(),
            source: e,
        })?;
        Ok(Self {
            client,
            login_url: join(&base, LOGIN_PATH)?,
            tracking_url: join(&base, TRACKING_PATH)?,
        })
    }

    /// Posts the credentials to the login form once.
    ///
    /// The response is only logged: a rejected login shows up later as every
    /// tracking fetch being redirected. Empty credentials are posted as well.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::LoginError` on transport failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), InitializationError> {
        log::info!("Logging in to {} as '{}'", self.login_url, credentials.name);

        let form = [
            ("username", credentials.name.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = self
            .client
            .post(self.login_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| InitializationError::LoginError(e.into()))?;
        let (response, hops) = follow_redirects(
            &self.client,
            response,
            RedirectRequest::Form(&form),
            MAX_REDIRECT_HOPS,
        )
        .await
        .map_err(InitializationError::LoginError)?;

        log::info!(
            "Login response: HTTP {} at {} after {} redirect(s)",
            response.status(),
            response.url(),
            hops
        );
        Ok(())
    }

    /// URL of the tracking page.
    pub fn tracking_url(&self) -> &Url {
        &self.tracking_url
    }
}

impl PageSource for PortalSession {
    async fn fetch_page(&self) -> Result<FetchedPage, FetchError> {
        log::debug!("Fetching {}", self.tracking_url);

        let response = self.client.get(self.tracking_url.clone()).send().await?;
        let (response, redirect_hops) =
            follow_redirects(&self.client, response, RedirectRequest::Get, MAX_REDIRECT_HOPS)
                .await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        if redirect_hops > 0 {
            log::info!(
                "Tracking page redirected {} time(s) to {}; session is logged out",
                redirect_hops,
                final_url
            );
        } else {
            log::debug!("Fetched tracking page: HTTP {} ({} bytes)", status, body.len());
        }

        Ok(FetchedPage {
            body,
            status,
            final_url,
            redirect_hops,
        })
    }
}

/// Serves the tracking page from a one-minute cache, fetching through the
/// page source when the cache says so.
///
/// The cache decision and the fetch run under one lock, so concurrent callers
/// never issue more than one upstream fetch at a time and the cached page
/// always matches its timestamp.
#[derive(Debug)]
pub struct SessionFetcher<S, C> {
    source: S,
    clock: C,
    slot: Mutex<CacheSlot>,
}

impl<S: PageSource, C: Clock> SessionFetcher<S, C> {
    /// Creates a fetcher with an empty cache.
    pub fn new(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            slot: Mutex::new(CacheSlot::default()),
        }
    }

    /// Returns the tracking page, from cache when allowed and fresh.
    ///
    /// A fetched page is cached whatever its login state.
    ///
    /// # Errors
    ///
    /// Upstream failures propagate unchanged; there is no retry and no
    /// fallback to a stale page.
    pub async fn fetch_page(&self, use_cache: bool) -> Result<Arc<FetchedPage>, FetchError> {
        let mut slot = self.slot.lock().await;
        let now = self.clock.now();

        let decision = slot.should_refetch(now, use_cache);
        if decision.cleared {
            log::debug!("Page cache expired");
        }

        if !decision.refetch {
            if let Some(page) = slot.usable_page() {
                log::debug!("Serving tracking page from cache");
                return Ok(Arc::clone(page));
            }
        }

        let page = Arc::new(self.source.fetch_page().await?);
        slot.store(Arc::clone(&page), now);
        Ok(page)
    }

    /// The underlying page source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The clock driving the cache window.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::ManualClock;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn portal_client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    fn portal(server: &Server) -> PortalSession {
        PortalSession::new(portal_client(), &server.url_str("/")).unwrap()
    }

    /// Counts fetches and returns a fixed page.
    struct CountingSource {
        fetches: AtomicUsize,
    }

    impl PageSource for CountingSource {
        async fn fetch_page(&self) -> Result<FetchedPage, FetchError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(FetchedPage {
                body: format!("page {}", n),
                status: 200,
                final_url: "http://portal/TrackingPaquetes".to_string(),
                redirect_hops: 0,
            })
        }
    }

    fn counting_fetcher(start: i64) -> SessionFetcher<CountingSource, ManualClock> {
        SessionFetcher::new(
            CountingSource {
                fetches: AtomicUsize::new(0),
            },
            ManualClock::at_seconds(start),
        )
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let result = PortalSession::new(portal_client(), "not a url");
        assert!(matches!(
            result,
            Err(InitializationError::InvalidUrlError { .. })
        ));
    }

    #[test]
    fn test_tracking_url_joins_base() {
        let session = PortalSession::new(portal_client(), "https://app.eps-int.com").unwrap();
        assert_eq!(
            session.tracking_url().as_str(),
            "https://app.eps-int.com/TrackingPaquetes"
        );
    }

    #[tokio::test]
    async fn test_login_posts_credentials_form() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/login"),
                request::body(url_decoded(contains(("username", "ana")))),
                request::body(url_decoded(contains(("password", "hunter2")))),
            ])
            .respond_with(status_code(200)),
        );

        let credentials = Credentials {
            name: "ana".to_string(),
            password: "hunter2".to_string(),
        };
        portal(&server).login(&credentials).await.unwrap();
    }

    #[tokio::test]
    async fn test_login_keeps_credentials_across_temporary_redirect() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/login"))
                .respond_with(status_code(307).append_header("Location", "/login/")),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/login/"),
                request::body(url_decoded(contains(("username", "ana")))),
                request::body(url_decoded(contains(("password", "hunter2")))),
            ])
            .respond_with(status_code(200).append_header("Set-Cookie", "sid=abc123; Path=/")),
        );
        server.expect(Expectation::matching(request::method_path("GET", "/login/"))
                .times(0)
                .respond_with(status_code(200)));

        let credentials = Credentials {
            name: "ana".to_string(),
            password: "hunter2".to_string(),
        };
        portal(&server).login(&credentials).await.unwrap();
    }

    #[tokio::test]
    async fn test_login_with_empty_credentials_still_posts() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/login"),
                request::body(url_decoded(contains(("username", "")))),
            ])
            .respond_with(status_code(401)),
        );

        portal(&server)
            .login(&Credentials::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_login_transport_failure_is_an_error() {
        // Nothing listens on port 1
        let session = PortalSession::new(portal_client(), "http://127.0.0.1:1").unwrap();
        let result = session.login(&Credentials::default()).await;
        assert!(matches!(result, Err(InitializationError::LoginError(_))));
    }

    #[tokio::test]
    async fn test_session_cookie_is_sent_with_fetch() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/login"))
                .respond_with(status_code(200).append_header("Set-Cookie", "sid=abc123; Path=/")),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/TrackingPaquetes"),
                request::headers(contains(("cookie", "sid=abc123"))),
            ])
            .respond_with(status_code(200).body("<html></html>")),
        );

        let session = portal(&server);
        session.login(&Credentials::default()).await.unwrap();
        let page = session.fetch_page().await.unwrap();
        assert!(!page.is_logged_out());
    }

    #[tokio::test]
    async fn test_fetch_page_redirect_means_logged_out() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/TrackingPaquetes"))
                .respond_with(status_code(302).append_header("Location", "/login")),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/login"))
                .respond_with(status_code(200).body("<form></form>")),
        );

        let page = portal(&server).fetch_page().await.unwrap();
        assert!(page.is_logged_out());
        assert_eq!(page.redirect_hops, 1);
        assert!(page.final_url.ends_with("/login"));
    }

    #[tokio::test]
    async fn test_fetch_page_transport_failure() {
        let session = PortalSession::new(portal_client(), "http://127.0.0.1:1").unwrap();
        let result = session.fetch_page().await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_fetcher_reuses_page_within_window() {
        let fetcher = counting_fetcher(0);
        let first = fetcher.fetch_page(true).await.unwrap();
        fetcher.clock.advance(Duration::from_secs(30));
        let second = fetcher.fetch_page(true).await.unwrap();

        assert_eq!(fetcher.source().fetches.load(Ordering::SeqCst), 1);
        assert_eq!(first.body, second.body);
    }

    #[tokio::test]
    async fn test_fetcher_refetches_after_window() {
        let fetcher = counting_fetcher(0);
        fetcher.fetch_page(true).await.unwrap();
        fetcher.clock.set_seconds(90);
        let page = fetcher.fetch_page(true).await.unwrap();

        assert_eq!(fetcher.source().fetches.load(Ordering::SeqCst), 2);
        assert_eq!(page.body, "page 2");
    }

    #[tokio::test]
    async fn test_fetcher_bypass_always_fetches_and_refreshes_cache() {
        let fetcher = counting_fetcher(0);
        fetcher.fetch_page(true).await.unwrap();
        fetcher.clock.set_seconds(10);
        let fresh = fetcher.fetch_page(false).await.unwrap();
        assert_eq!(fresh.body, "page 2");

        // The fresh page now backs cached reads
        fetcher.clock.set_seconds(20);
        let cached = fetcher.fetch_page(true).await.unwrap();
        assert_eq!(cached.body, "page 2");
        assert_eq!(fetcher.source().fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_cached_reads_fetch_once() {
        let fetcher = Arc::new(counting_fetcher(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let fetcher = Arc::clone(&fetcher);
            handles.push(tokio::spawn(async move {
                fetcher.fetch_page(true).await.map(|page| page.body.clone())
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "page 1");
        }
        assert_eq!(fetcher.source().fetches.load(Ordering::SeqCst), 1);
    }
}
