//! Tracking status codes.
//!
//! The portal tags every package with a `statusN` class. Codes 1-4 and 6 are
//! consecutive shipping stages; `status5` ("available") is the final one even
//! though its number sits before `status6`. The mapping is fixed by the portal
//! and must not be reordered numerically.

use std::str::FromStr;

use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// A known tracking status, parsed from the portal's `statusN` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
pub enum TrackingStatus {
    /// Package is at the origin warehouse
    #[strum(serialize = "status1")]
    Origin,
    /// In flight or at sea
    #[strum(serialize = "status2")]
    AirLineOrShip,
    /// Held at customs
    #[strum(serialize = "status3")]
    Customs,
    /// At the distribution center
    #[strum(serialize = "status4")]
    DistributionCenter,
    /// In transit to the pickup point
    #[strum(serialize = "status6")]
    Transit,
    /// Ready for pickup
    #[strum(serialize = "status5")]
    Available,
}

impl TrackingStatus {
    /// Looks up a raw portal code. Returns `None` for codes outside the table.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_str(code).ok()
    }

    /// The raw portal code (`status1` ... `status6`).
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TrackingStatus::Origin => "origin",
            TrackingStatus::AirLineOrShip => "air line / ship",
            TrackingStatus::Customs => "customs",
            TrackingStatus::DistributionCenter => "distribution center",
            TrackingStatus::Transit => "transit",
            TrackingStatus::Available => "available",
        }
    }
}
