//! Package data returned by the service.

use serde::Serialize;

/// One package scraped from the tracking page.
///
/// All fields are raw text as scraped except `status_formatted`, which comes
/// from the status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    /// Text of `.packagecondition`
    pub condition: String,
    /// Text of `.trackingnumber`
    pub tracking_number: String,
    /// Text of `.packagecontent`
    pub content: String,
    /// Text of `.packagesender`
    pub sender: String,
    /// Text of `.packageweight`, unit included
    pub weight: String,
    /// Raw status code, e.g. `status3`
    pub status: String,
    /// Status text exactly as the portal printed it
    pub status_label: String,
    /// Label from the status table for `status`
    pub status_formatted: String,
}

/// A fragment's outcome: a full record, or an empty placeholder for a
/// fragment that could not be parsed. Empty entries serialize as `{}` and
/// keep their position in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PackageEntry {
    /// A fully parsed package
    Record(PackageRecord),
    /// A fragment that failed to parse
    Empty {},
}

impl PackageEntry {
    /// Whether this is the empty placeholder.
    pub fn is_empty(&self) -> bool {
        matches!(self, PackageEntry::Empty {})
    }
}

/// Response body of both endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageListResult {
    /// One entry per fragment, in page order
    pub items: Vec<PackageEntry>,
    /// False when the tracking request was redirected to the login page
    pub logged_in: bool,
}

impl PackageListResult {
    /// The answer when the portal session is not valid.
    pub fn logged_out() -> Self {
        Self {
            items: Vec::new(),
            logged_in: false,
        }
    }
}
