//! HTTP redirect chain following.
//!
//! The portal client has automatic redirects disabled so the number of hops
//! is known: an unauthenticated request to the tracking page bounces to the
//! login portal, and that bounce is how a dead session is detected.

use reqwest::{Response, StatusCode};

use crate::error_handling::FetchError;

fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// The request that produced the response being followed.
///
/// 307 and 308 re-send it unchanged; 301, 302 and 303 turn it into a GET.
#[derive(Debug, Clone, Copy)]
pub enum RedirectRequest<'a> {
    /// A plain GET
    Get,
    /// A form-encoded POST
    Form(&'a [(&'a str, &'a str)]),
}

impl RedirectRequest<'_> {
    fn preserves_method(status: StatusCode) -> bool {
        matches!(status.as_u16(), 307 | 308)
    }
}

/// Follows redirects starting from an already received `response`.
///
/// Every hop goes through the same client, so cookies set along the chain
/// land in its cookie store. A form POST is replayed with its body on 307 and
/// 308 and becomes a GET on any other redirect.
///
/// # Returns
///
/// The final response and the number of redirect hops taken to reach it.
///
/// # Errors
///
/// Returns an error if a hop fails at the transport level, a `Location` cannot
/// be resolved, or more than `max_hops` redirects are chained.
pub async fn follow_redirects(
    client: &reqwest::Client,
    mut response: Response,
    mut request: RedirectRequest<'_>,
    max_hops: usize,
) -> Result<(Response, usize), FetchError> {
    let start_url = response.url().to_string();
    let mut hops = 0;

    while is_redirect(response.status()) {
        let Some(location) = response.headers().get(reqwest::header::LOCATION) else {
            // Redirect status but no Location header - this is unusual, log and stop here
            log::warn!(
                "Redirect status {} for {} but no Location header",
                response.status(),
                response.url()
            );
            break;
        };

        let location = location
            .to_str()
            .map_err(|_| FetchError::InvalidRedirect {
                from: response.url().to_string(),
                location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
            })?
            .to_string();
        let next = response
            .url()
            .join(&location)
            .map_err(|_| FetchError::InvalidRedirect {
                from: response.url().to_string(),
                location: location.clone(),
            })?;

        hops += 1;
        if hops > max_hops {
            return Err(FetchError::TooManyRedirects {
                url: start_url,
                hops: max_hops,
            });
        }

        if !RedirectRequest::preserves_method(response.status()) {
            request = RedirectRequest::Get;
        }

        log::debug!("Redirect hop {}: {} -> {}", hops, response.url(), next);
        response = match request {
            RedirectRequest::Get => client.get(next).send().await?,
            RedirectRequest::Form(fields) => client.post(next).form(fields).send().await?,
        };
    }

    Ok((response, hops))
}
