//! Package fragment extraction.
//!
//! The tracking page lists one element per package under `#fTrackingPaquetes`,
//! each carrying a `data-groups` attribute of the form `"<group> <statusN> <label>"`
//! and five nested elements holding the package fields.

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

use crate::error_handling::TransformError;
use crate::models::{PackageEntry, PackageRecord};
use crate::status::TrackingStatus;
use crate::utils::parse_selector_unsafe;

const GROUPS_ATTR: &str = "data-groups";

const PACKAGES_SELECTOR_STR: &str = "#fTrackingPaquetes [data-groups]";

const CONDITION_CLASS: &str = "packagecondition";
const TRACKING_NUMBER_CLASS: &str = "trackingnumber";
const CONTENT_CLASS: &str = "packagecontent";
const SENDER_CLASS: &str = "packagesender";
const WEIGHT_CLASS: &str = "packageweight";

static PACKAGES_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(PACKAGES_SELECTOR_STR, "PACKAGES_SELECTOR"));

static CONDITION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| class_selector(CONDITION_CLASS));
static TRACKING_NUMBER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| class_selector(TRACKING_NUMBER_CLASS));
static CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| class_selector(CONTENT_CLASS));
static SENDER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| class_selector(SENDER_CLASS));
static WEIGHT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| class_selector(WEIGHT_CLASS));

fn class_selector(class: &str) -> Selector {
    parse_selector_unsafe(&format!(".{}", class), class)
}

/// Extracts every package on the tracking page, in document order.
///
/// Fragments that fail to parse are kept as `PackageEntry::Empty` at their
/// position; the list never shrinks.
pub fn extract_packages(document: &Html) -> Vec<PackageEntry> {
    let entries: Vec<PackageEntry> = document
        .select(&PACKAGES_SELECTOR)
        .map(transform_package)
        .collect();

    let empty = entries.iter().filter(|e| e.is_empty()).count();
    log::debug!(
        "Extracted {} package fragments ({} unparsable)",
        entries.len(),
        empty
    );

    entries
}

/// Converts one package fragment into a record, or an empty entry if any
/// part of it is missing or the status code is unknown.
pub fn transform_package(fragment: ElementRef<'_>) -> PackageEntry {
    match parse_package(fragment) {
        Ok(record) => PackageEntry::Record(record),
        Err(e) => {
            log::debug!("Package fragment downgraded to empty record: {}", e);
            PackageEntry::Empty {}
        }
    }
}

/// Parses a fragment, reporting the first thing that was wrong with it.
pub(crate) fn parse_package(fragment: ElementRef<'_>) -> Result<PackageRecord, TransformError> {
    let groups = fragment
        .value()
        .attr(GROUPS_ATTR)
        .ok_or(TransformError::MissingGroups)?;
    let tokens: Vec<&str> = groups.split_whitespace().collect();
    let [_, status, status_label] = tokens.as_slice() else {
        return Err(TransformError::MalformedGroups(tokens.len()));
    };

    let condition = first_text(fragment, &CONDITION_SELECTOR, CONDITION_CLASS)?;
    let tracking_number = first_text(fragment, &TRACKING_NUMBER_SELECTOR, TRACKING_NUMBER_CLASS)?;
    let content = first_text(fragment, &CONTENT_SELECTOR, CONTENT_CLASS)?;
    let sender = first_text(fragment, &SENDER_SELECTOR, SENDER_CLASS)?;
    let weight = first_text(fragment, &WEIGHT_SELECTOR, WEIGHT_CLASS)?;

    let formatted = TrackingStatus::from_code(status)
        .ok_or_else(|| TransformError::UnknownStatus(status.to_string()))?;

    Ok(PackageRecord {
        condition,
        tracking_number,
        content,
        sender,
        weight,
        status: status.to_string(),
        status_label: status_label.to_string(),
        status_formatted: formatted.label().to_string(),
    })
}

/// Raw text of the first child node of the first descendant matching `selector`.
///
/// The text is returned untrimmed; only a leading text node counts.
fn first_text(
    fragment: ElementRef<'_>,
    selector: &Selector,
    class: &'static str,
) -> Result<String, TransformError> {
    let element = fragment
        .select(selector)
        .next()
        .ok_or(TransformError::MissingElement(class))?;

    match element.first_child().map(|child| child.value()) {
        Some(Node::Text(text)) => Ok(String::from(&**text)),
        _ => Err(TransformError::MissingText(class)),
    }
}
