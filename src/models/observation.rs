//! Raw nowcast observation items and category codes

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ReportKey;

/// Meteorological variable reported by the ultra-short-term nowcast
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Temperature (℃)
    T1H,
    /// One-hour rainfall (mm)
    RN1,
    /// East-west wind component (m/s), positive is east
    UUU,
    /// North-south wind component (m/s), positive is north
    VVV,
    /// Relative humidity (%)
    REH,
    /// Precipitation type code
    PTY,
    /// Wind direction (deg)
    VEC,
    /// Wind speed (m/s)
    WSD,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::T1H,
        Category::RN1,
        Category::UUU,
        Category::VVV,
        Category::REH,
        Category::PTY,
        Category::VEC,
        Category::WSD,
    ];

    /// Parse a provider category code; unknown codes yield `None`
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Category::T1H => "T1H",
            Category::RN1 => "RN1",
            Category::UUU => "UUU",
            Category::VVV => "VVV",
            Category::REH => "REH",
            Category::PTY => "PTY",
            Category::VEC => "VEC",
            Category::WSD => "WSD",
        }
    }

    /// Report field this category is written to
    #[must_use]
    pub fn report_key(self) -> ReportKey {
        match self {
            Category::T1H => ReportKey::Temperature,
            Category::RN1 => ReportKey::Rainfall,
            Category::UUU => ReportKey::EastWestComponent,
            Category::VVV => ReportKey::NorthSouthComponent,
            Category::REH => ReportKey::Humidity,
            Category::PTY => ReportKey::PrecipitationType,
            Category::VEC => ReportKey::WindDirection,
            Category::WSD => ReportKey::WindSpeed,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One `<item>` of a getUltraSrtNcst response
///
/// Every element is optional on the wire; a missing one decodes as empty so
/// that a single incomplete item never rejects the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationItem {
    /// Announcement date, YYYYMMDD
    #[serde(default)]
    pub base_date: String,
    /// Announcement time, HHMM
    #[serde(default)]
    pub base_time: String,
    /// Raw category code; may be outside the known set
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub nx: i32,
    #[serde(default)]
    pub ny: i32,
    /// Raw observed value as sent by the provider
    #[serde(default)]
    pub obsr_value: String,
}

impl ObservationItem {
    #[must_use]
    pub fn new(category: &str, obsr_value: &str, base_date: &str, base_time: &str) -> Self {
        Self {
            base_date: base_date.to_string(),
            base_time: base_time.to_string(),
            category: category.to_string(),
            nx: 0,
            ny: 0,
            obsr_value: obsr_value.to_string(),
        }
    }

    #[must_use]
    pub fn category(&self) -> Option<Category> {
        Category::from_code(self.category.trim())
    }
}
