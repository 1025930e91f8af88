// Shared test helpers for the fake portal and the served router.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use httptest::Server;
use tokio::net::TcpListener;

use eps_tracker::config::Credentials;
use eps_tracker::fetch::{Clock, PageSource, PortalSession};
use eps_tracker::initialization::init_session;
use eps_tracker::server::router;
use eps_tracker::{Config, PackagePipeline};

/// A clock that only moves when a test advances it.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at_seconds(seconds: i64) -> Self {
        Self {
            millis: AtomicI64::new(seconds * 1000),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// One package fragment as the portal renders it.
#[allow(dead_code)]
pub fn package_fragment(tracking: &str, code: &str, label: &str) -> String {
    format!(
        r#"<div class="element-item" data-groups="paquete {code} {label}">
            <span class="packagecondition">Bueno</span>
            <span class="trackingnumber">{tracking}</span>
            <span class="packagecontent">Ropa</span>
            <span class="packagesender">Amazon</span>
            <span class="packageweight">1.50 lb</span>
        </div>"#
    )
}

/// A fragment missing its weight element.
#[allow(dead_code)]
pub fn broken_fragment(tracking: &str) -> String {
    format!(
        r#"<div class="element-item" data-groups="paquete status2 Aereo">
            <span class="packagecondition">Bueno</span>
            <span class="trackingnumber">{tracking}</span>
            <span class="packagecontent">Ropa</span>
            <span class="packagesender">Amazon</span>
        </div>"#
    )
}

/// The tracking page around the given fragments.
#[allow(dead_code)]
pub fn tracking_page(fragments: &[String]) -> String {
    format!(
        r#"<html><body>
            <div id="fTrackingPaquetes" class="isotope">{}</div>
        </body></html>"#,
        fragments.concat()
    )
}

/// Config pointing at the fake portal.
#[allow(dead_code)]
pub fn portal_config(server: &Server) -> Config {
    Config {
        base_url: server.url_str("/"),
        timeout_seconds: 5,
        ..Default::default()
    }
}

/// Logs in to the fake portal (which must expect `POST /login`) and wraps the
/// session in a pipeline driven by a manual clock at t=0.
#[allow(dead_code)]
pub async fn portal_pipeline(server: &Server) -> Arc<PackagePipeline<PortalSession, ManualClock>> {
    let session = init_session(&portal_config(server), &Credentials::default())
        .await
        .expect("Failed to log in to fake portal");
    Arc::new(PackagePipeline::new(session, ManualClock::at_seconds(0)))
}

/// Serves the router on an ephemeral port and returns its base URL.
#[allow(dead_code)]
pub async fn serve<S, C>(pipeline: Arc<PackagePipeline<S, C>>) -> String
where
    S: PageSource + 'static,
    C: Clock + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router(pipeline))
            .await
            .expect("Test server failed");
    });
    format!("http://{}", addr)
}
