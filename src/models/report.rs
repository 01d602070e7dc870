//! Normalized weather report

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::classifier::decimal;

/// Placeholder shown for fields the provider did not send
pub const NOT_AVAILABLE: &str = "N/A";

/// Output field of a `WeatherReport`, ordered as it is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportKey {
    Temperature,
    Humidity,
    PrecipitationType,
    Rainfall,
    WindDirection,
    WindSpeed,
    /// Raw east-west component, only kept when its partner is missing
    EastWestComponent,
    /// Raw north-south component, only kept when its partner is missing
    NorthSouthComponent,
    EastWestWind,
    NorthSouthWind,
}

impl ReportKey {
    /// Korean label used in JSON output
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReportKey::Temperature => "기온(℃)",
            ReportKey::Humidity => "습도(%)",
            ReportKey::PrecipitationType => "강수형태",
            ReportKey::Rainfall => "1시간 강수량",
            ReportKey::WindDirection => "풍향",
            ReportKey::WindSpeed => "풍속",
            ReportKey::EastWestComponent => "동서바람성분(m/s)",
            ReportKey::NorthSouthComponent => "남북바람성분(m/s)",
            ReportKey::EastWestWind => "동서성분",
            ReportKey::NorthSouthWind => "남북성분",
        }
    }
}

/// A report value: either a raw reading or a descriptive text
#[derive(Debug, Clone, PartialEq)]
pub enum ReportField {
    Number(f64),
    Text(String),
}

impl ReportField {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ReportField::Number(value) => Some(*value),
            ReportField::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ReportField::Number(_) => None,
            ReportField::Text(text) => Some(text),
        }
    }
}

impl fmt::Display for ReportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportField::Number(value) => f.write_str(&decimal(*value)),
            ReportField::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for ReportField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReportField::Number(value) => serializer.serialize_f64(*value),
            ReportField::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// Human-readable nowcast for one grid cell and announcement time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherReport {
    /// Announcement date, YYYYMMDD
    pub base_date: String,
    /// Announcement time, HHMM
    pub base_time: String,
    fields: BTreeMap<ReportKey, ReportField>,
}

impl WeatherReport {
    #[must_use]
    pub fn new(base_date: impl Into<String>, base_time: impl Into<String>) -> Self {
        Self {
            base_date: base_date.into(),
            base_time: base_time.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: ReportKey, value: ReportField) {
        self.fields.insert(key, value);
    }

    pub fn remove(&mut self, key: ReportKey) -> Option<ReportField> {
        self.fields.remove(&key)
    }

    #[must_use]
    pub fn get(&self, key: ReportKey) -> Option<&ReportField> {
        self.fields.get(&key)
    }

    #[must_use]
    pub fn contains(&self, key: ReportKey) -> bool {
        self.fields.contains_key(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (ReportKey, &ReportField)> {
        self.fields.iter().map(|(key, value)| (*key, value))
    }

    /// Field rendered as text, or `N/A` when absent
    #[must_use]
    pub fn display(&self, key: ReportKey) -> String {
        self.get(key)
            .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string)
    }

    /// Announcement time as `YYYY년 MM월 DD일 HH시 MM분`
    ///
    /// Splits the fixed-width provider strings; short strings fall back to zeros.
    #[must_use]
    pub fn announced_at(&self) -> String {
        let part = |source: &str, range: std::ops::Range<usize>, zeros: &'static str| {
            source.get(range).unwrap_or(zeros).to_string()
        };
        format!(
            "{}년 {}월 {}일 {}시 {}분",
            part(&self.base_date, 0..4, "0000"),
            part(&self.base_date, 4..6, "00"),
            part(&self.base_date, 6..8, "00"),
            part(&self.base_time, 0..2, "00"),
            part(&self.base_time, 2..4, "00"),
        )
    }
}

impl Serialize for WeatherReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry("발표일자", &self.base_date)?;
        map.serialize_entry("발표시각", &self.base_time)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key.label(), value)?;
        }
        map.end()
    }
}
