//! Observation classifier
//!
//! Turns raw nowcast readings into the descriptive Korean text shown to users:
//! wind components, rainfall bands, 16-point compass directions, wind strength
//! and precipitation type codes. Every function here is pure and total over
//! `f64`; converting provider strings to numbers is the caller's job.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used when a wind component is exactly zero
pub const NO_WIND: &str = "없음";

/// Compass points clockwise from north, 22.5° apart
pub const COMPASS_POINTS: [&str; 16] = [
    "북", "북북동", "북동", "동북동", "동", "동남동", "남동", "남남동", "남", "남남서", "남서",
    "서남서", "서", "서북서", "북서", "북북서",
];

/// Render a reading the way the provider writes decimals (`2.0`, `0.9`)
#[must_use]
pub fn decimal(value: f64) -> String {
    format!("{value:?}")
}

/// Descriptions of the east-west and north-south wind components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindComponents {
    pub east_west: String,
    pub north_south: String,
}

/// Describe UUU/VVV components; positive UUU is an east wind, positive VVV a north wind
#[must_use]
pub fn describe_wind_components(u_component: f64, v_component: f64) -> WindComponents {
    WindComponents {
        east_west: describe_component(u_component, "동풍", "서풍"),
        north_south: describe_component(v_component, "북풍", "남풍"),
    }
}

fn describe_component(value: f64, positive: &str, negative: &str) -> String {
    if value > 0.0 {
        format!("{positive} {}m/s", decimal(value))
    } else if value < 0.0 {
        format!("{negative} {}m/s", decimal(value.abs()))
    } else {
        NO_WIND.to_string()
    }
}

/// Band one-hour rainfall (mm) the way the KMA presents it
#[must_use]
pub fn format_rainfall(mm_per_hour: f64) -> String {
    if mm_per_hour < 0.1 {
        "강수없음".to_string()
    } else if mm_per_hour < 1.0 {
        "1mm 미만".to_string()
    } else if mm_per_hour < 30.0 {
        format!("{}mm", decimal(mm_per_hour))
    } else if mm_per_hour < 50.0 {
        "30.0~50.0mm".to_string()
    } else if mm_per_hour >= 50.0 {
        "50.0mm 이상".to_string()
    } else {
        debug_assert!(mm_per_hour.is_nan(), "finite rainfall fell through every band");
        "정보 확인 필요".to_string()
    }
}

/// Index into `COMPASS_POINTS` for a direction in degrees
///
/// Works for any real input: 360° wraps to north and negative angles count
/// counter-clockwise.
#[must_use]
pub fn compass_index(degrees: f64) -> usize {
    let sector = ((degrees + 11.25) / 22.5).floor() as i64;
    sector.rem_euclid(16) as usize
}

/// 16-point compass name of a wind direction
#[must_use]
pub fn format_wind_direction(degrees: f64) -> &'static str {
    COMPASS_POINTS[compass_index(degrees)]
}

/// Wind strength bands used for the descriptive wind speed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindStrength {
    /// Below 4 m/s
    Weak,
    /// 4 to 9 m/s
    Moderate,
    /// 9 to 14 m/s
    Strong,
    /// 14 m/s and above
    VeryStrong,
}

impl WindStrength {
    #[must_use]
    pub fn from_speed(meters_per_second: f64) -> Self {
        if meters_per_second < 4.0 {
            WindStrength::Weak
        } else if meters_per_second < 9.0 {
            WindStrength::Moderate
        } else if meters_per_second < 14.0 {
            WindStrength::Strong
        } else {
            WindStrength::VeryStrong
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            WindStrength::Weak => "바람이 약하게 느껴집니다.",
            WindStrength::Moderate => "나뭇잎이 흔들리는 정도의 바람입니다.",
            WindStrength::Strong => "나무가지가 흔들리는 정도의 강한 바람입니다.",
            WindStrength::VeryStrong => "나무 전체가 흔들릴 정도의 매우 강한 바람입니다.",
        }
    }
}

/// Wind speed with its strength description, e.g. `4.5m/s, 나뭇잎이 ...`
#[must_use]
pub fn format_wind_speed(meters_per_second: f64) -> String {
    format!(
        "{}m/s, {}",
        decimal(meters_per_second),
        WindStrength::from_speed(meters_per_second).description()
    )
}

/// Precipitation type (PTY) of the nowcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecipitationType {
    None,
    Rain,
    RainSnow,
    Snow,
    Raindrop,
    RaindropSnowFlurry,
    SnowFlurry,
}

impl PrecipitationType {
    /// Decode a PTY code; codes outside the published table yield `None`
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(PrecipitationType::None),
            "1" => Some(PrecipitationType::Rain),
            "2" => Some(PrecipitationType::RainSnow),
            "3" => Some(PrecipitationType::Snow),
            "5" => Some(PrecipitationType::Raindrop),
            "6" => Some(PrecipitationType::RaindropSnowFlurry),
            "7" => Some(PrecipitationType::SnowFlurry),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PrecipitationType::None => "없음",
            PrecipitationType::Rain => "비",
            PrecipitationType::RainSnow => "비/눈",
            PrecipitationType::Snow => "눈",
            PrecipitationType::Raindrop => "빗방울",
            PrecipitationType::RaindropSnowFlurry => "빗방울/눈날림",
            PrecipitationType::SnowFlurry => "눈날림",
        }
    }
}

impl fmt::Display for PrecipitationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// PTY label, or the raw code when it is not in the table
#[must_use]
pub fn describe_precipitation_type(code: &str) -> String {
    PrecipitationType::from_code(code).map_or_else(|| code.to_string(), |pty| pty.label().to_string())
}
