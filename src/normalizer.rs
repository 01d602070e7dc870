//! Response normalizer
//!
//! Walks the items of a nowcast response and builds a `WeatherReport`,
//! applying the classifier per category. A bad value in one item only
//! affects that field; the rest of the batch is still reported.

use tracing::{debug, warn};

use crate::classifier::{
    describe_precipitation_type, describe_wind_components, format_rainfall,
    format_wind_direction, format_wind_speed,
};
use crate::models::{
    Category, ObservationItem, ReportField, ReportKey, UltraSrtNcstResponse, WeatherReport,
};
use crate::{Result, WeatherError};

/// Normalize a decoded response, checking the `body/items` structure first
pub fn normalize_response(response: &UltraSrtNcstResponse) -> Result<WeatherReport> {
    let items = response
        .items()
        .ok_or_else(|| WeatherError::malformed("response has no body/items container"))?;
    normalize(items)
}

/// Build a report from a batch of observation items
///
/// All items of one response share the announcement date/time, so it is taken
/// from the first item and not re-checked per item.
pub fn normalize(items: &[ObservationItem]) -> Result<WeatherReport> {
    let first = items
        .first()
        .ok_or_else(|| WeatherError::malformed("response contains no items"))?;

    let mut report = WeatherReport::new(first.base_date.trim(), first.base_time.trim());

    for item in items {
        let Some(category) = item.category() else {
            debug!("Skipping unrecognized category '{}'", item.category);
            continue;
        };

        let raw = item.obsr_value.trim();
        let value = convert(category, raw).unwrap_or_else(|err| {
            warn!("{err}; using fallback");
            fallback(category, raw)
        });
        report.insert(category.report_key(), value);
    }

    merge_wind_components(&mut report);
    Ok(report)
}

fn convert(category: Category, raw: &str) -> Result<ReportField> {
    let field = match category {
        Category::RN1 => ReportField::Text(format_rainfall(parse_reading(category, raw)?)),
        Category::PTY => ReportField::Text(describe_precipitation_type(raw)),
        Category::WSD => ReportField::Text(format_wind_speed(parse_reading(category, raw)?)),
        Category::VEC => ReportField::Text(
            format_wind_direction(parse_reading(category, raw)?).to_string(),
        ),
        Category::T1H | Category::REH | Category::UUU | Category::VVV => {
            ReportField::Number(parse_reading(category, raw)?)
        }
    };
    Ok(field)
}

fn parse_reading(category: Category, raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| WeatherError::field_conversion(category.code(), raw))
}

/// Literal the provider writes in RN1 when it did not rain
const NO_RAIN: &str = "강수없음";

/// Value reported when a reading cannot be converted
///
/// Only the provider's own no-rain literal is passed through for RN1; any
/// other unreadable rainfall value gets a neutral marker.
fn fallback(category: Category, raw: &str) -> ReportField {
    let marker = match category {
        Category::RN1 if raw == NO_RAIN => NO_RAIN,
        Category::RN1 => "강수량 정보 확인 불가",
        Category::WSD => "풍속 정보 확인 불가",
        Category::VEC => "풍향 정보 확인 불가",
        Category::T1H | Category::REH | Category::UUU | Category::VVV | Category::PTY => raw,
    };
    ReportField::Text(marker.to_string())
}

/// Replace raw UUU/VVV readings by their descriptions, only when both are numeric
fn merge_wind_components(report: &mut WeatherReport) {
    let u = report
        .get(ReportKey::EastWestComponent)
        .and_then(ReportField::as_number);
    let v = report
        .get(ReportKey::NorthSouthComponent)
        .and_then(ReportField::as_number);

    if let (Some(u), Some(v)) = (u, v) {
        report.remove(ReportKey::EastWestComponent);
        report.remove(ReportKey::NorthSouthComponent);

        let components = describe_wind_components(u, v);
        report.insert(ReportKey::EastWestWind, ReportField::Text(components.east_west));
        report.insert(ReportKey::NorthSouthWind, ReportField::Text(components.north_south));
    }
}
