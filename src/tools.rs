//! Text-producing weather tools
//!
//! These functions never fail: every outcome, including a missing API key or
//! an upstream failure, is rendered as the Korean text handed back to the
//! assistant.

use tracing::{error, info};

use crate::api::{BaseTime, ObservationSource};
use crate::classifier::decimal;
use crate::config::WeatherConfig;
use crate::grid;
use crate::models::{Coordinate, GridCell, ReportKey, WeatherReport};
use crate::normalizer::normalize_response;
use crate::regions;
use crate::Result;

/// Reply when no usable API key is configured
pub const MISSING_KEY_MESSAGE: &str =
    "오류: 서버에 API 키가 설정되지 않았습니다. 관리자에게 문의하세요.";

/// Current weather at a coordinate, as a Markdown report
pub async fn get_current_weather<S: ObservationSource>(
    config: &WeatherConfig,
    source: &S,
    latitude: f64,
    longitude: f64,
    base: &BaseTime,
) -> String {
    if config.api_key().is_err() {
        return MISSING_KEY_MESSAGE.to_string();
    }

    let cell = grid::project(latitude, longitude);
    info!(
        "get_current_weather ({}) -> {} at {}{}",
        Coordinate::new(latitude, longitude).format_coordinates(),
        cell,
        base.date,
        base.time
    );

    match fetch_report(source, cell, base).await {
        Ok(report) => render_report(latitude, longitude, cell, &report),
        Err(err) => {
            error!("Weather lookup failed: {}", err);
            format!(
                "날씨 정보를 가져오는 데 실패했습니다: {}",
                err.user_message()
            )
        }
    }
}

/// Fetch and normalize the nowcast for one grid cell
pub async fn fetch_report<S: ObservationSource>(
    source: &S,
    cell: GridCell,
    base: &BaseTime,
) -> Result<WeatherReport> {
    let response = source.fetch_observations(cell, base).await?;
    normalize_response(&response)
}

/// Render a report in the fixed Markdown layout
#[must_use]
pub fn render_report(latitude: f64, longitude: f64, cell: GridCell, report: &WeatherReport) -> String {
    let field = |key| report.display(key);
    format!(
        "# 현재 날씨 정보 (위도: {lat}, 경도: {lon})
- 기준 시각: {announced}
- 격자 좌표: {cell}

## 기상 상태
- 기온: {temperature}℃
- 습도: {humidity}%
- 강수 형태: {precipitation}
- 1시간 강수량: {rainfall}

## 바람 정보
- 풍향: {direction}
- 풍속: {speed}
- 동서성분: {east_west}
- 남북성분: {north_south}
",
        lat = decimal(latitude),
        lon = decimal(longitude),
        announced = report.announced_at(),
        temperature = field(ReportKey::Temperature),
        humidity = field(ReportKey::Humidity),
        precipitation = field(ReportKey::PrecipitationType),
        rainfall = field(ReportKey::Rainfall),
        direction = field(ReportKey::WindDirection),
        speed = field(ReportKey::WindSpeed),
        east_west = field(ReportKey::EastWestWind),
        north_south = field(ReportKey::NorthSouthWind),
    )
}

/// Coordinate and grid cell of a named region
#[must_use]
pub fn get_coordinates_by_city(city: &str) -> String {
    match regions::lookup(city) {
        Some(region) => {
            info!(
                "get_coordinates_by_city '{}' -> {} ({})",
                city,
                region.name,
                region.coordinate().format_coordinates()
            );
            format!(
                "{}의 좌표는 위도 {}, 경도 {}입니다. (격자 좌표: {})",
                region.name,
                decimal(region.latitude),
                decimal(region.longitude),
                region.grid_cell()
            )
        }
        None => {
            info!("get_coordinates_by_city '{}' -> not found", city);
            format!(
                "'{}'에 대한 좌표 정보를 찾을 수 없습니다. 사용 가능한 지역: {}",
                city.trim(),
                regions::names().collect::<Vec<_>>().join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObservationItem, UltraSrtNcstResponse};
    use crate::WeatherError;
    use std::cell::Cell;

    /// Source that replays a fixed outcome and counts calls
    struct FakeSource {
        outcome: fn() -> Result<UltraSrtNcstResponse>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn new(outcome: fn() -> Result<UltraSrtNcstResponse>) -> Self {
            Self {
                outcome,
                calls: Cell::new(0),
            }
        }
    }

    impl ObservationSource for FakeSource {
        async fn fetch_observations(
            &self,
            _cell: GridCell,
            _base: &BaseTime,
        ) -> Result<UltraSrtNcstResponse> {
            self.calls.set(self.calls.get() + 1);
            (self.outcome)()
        }
    }

    fn batch() -> Result<UltraSrtNcstResponse> {
        let item = |category, value| ObservationItem::new(category, value, "20250805", "2000");
        Ok(UltraSrtNcstResponse::from_items(vec![
            item("PTY", "0"),
            item("REH", "81"),
            item("RN1", "0"),
            item("T1H", "26.2"),
            item("UUU", "-0.9"),
            item("VEC", "121"),
            item("VVV", "0.5"),
            item("WSD", "1.1"),
        ]))
    }

    fn keyed_config() -> WeatherConfig {
        WeatherConfig {
            api_key: Some("test-key".to_string()),
            ..WeatherConfig::default()
        }
    }

    fn base() -> BaseTime {
        BaseTime {
            date: "20250805".to_string(),
            time: "2000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let source = FakeSource::new(batch);
        let text =
            get_current_weather(&WeatherConfig::default(), &source, 36.3268, 127.3954, &base())
                .await;
        assert_eq!(text, MISSING_KEY_MESSAGE);
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_report_layout() {
        let source = FakeSource::new(batch);
        let text = get_current_weather(&keyed_config(), &source, 36.3268, 127.3954, &base()).await;

        let expected = "# 현재 날씨 정보 (위도: 36.3268, 경도: 127.3954)
- 기준 시각: 2025년 08월 05일 20시 00분
- 격자 좌표: X=67, Y=100

## 기상 상태
- 기온: 26.2℃
- 습도: 81.0%
- 강수 형태: 없음
- 1시간 강수량: 강수없음

## 바람 정보
- 풍향: 동남동
- 풍속: 1.1m/s, 바람이 약하게 느껴집니다.
- 동서성분: 서풍 0.9m/s
- 남북성분: 북풍 0.5m/s
";
        assert_eq!(text, expected);
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_render_as_not_available() {
        fn temperature_only() -> Result<UltraSrtNcstResponse> {
            Ok(UltraSrtNcstResponse::from_items(vec![ObservationItem::new(
                "T1H", "-3.5", "20250101", "0600",
            )]))
        }
        let source = FakeSource::new(temperature_only);
        let text = get_current_weather(&keyed_config(), &source, 37.5665, 126.978, &base()).await;

        assert!(text.contains("- 기온: -3.5℃"));
        assert!(text.contains("- 습도: N/A%"));
        assert!(text.contains("- 풍향: N/A"));
        assert!(text.contains("- 남북성분: N/A"));
        assert!(text.contains("2025년 01월 01일 06시 00분"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_reported_as_text() {
        fn unavailable() -> Result<UltraSrtNcstResponse> {
            Err(WeatherError::UpstreamStatus { status: 500 })
        }
        let source = FakeSource::new(unavailable);
        let text = get_current_weather(&keyed_config(), &source, 37.5665, 126.978, &base()).await;
        assert_eq!(
            text,
            "날씨 정보를 가져오는 데 실패했습니다: API 서버 오류: 상태 코드 500"
        );
    }

    #[tokio::test]
    async fn test_empty_response_is_reported_as_text() {
        fn empty() -> Result<UltraSrtNcstResponse> {
            Ok(UltraSrtNcstResponse::default())
        }
        let source = FakeSource::new(empty);
        let text = get_current_weather(&keyed_config(), &source, 37.5665, 126.978, &base()).await;
        assert!(text.starts_with("날씨 정보를 가져오는 데 실패했습니다: API 응답 데이터 형식이"));
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_not_reported_as_missing_key() {
        let config = WeatherConfig {
            base_url: "not a url".to_string(),
            ..keyed_config()
        };
        let client = crate::api::KmaClient::new(config.clone()).unwrap();
        let text = get_current_weather(&config, &client, 37.5665, 126.978, &base()).await;

        assert!(text.starts_with("날씨 정보를 가져오는 데 실패했습니다: 서버 설정 오류: "));
        assert!(text.contains("not a url"));
        assert!(!text.contains("API 키"));
    }

    #[test]
    fn test_coordinates_by_city() {
        assert_eq!(
            get_coordinates_by_city("서울특별시"),
            "서울의 좌표는 위도 37.5665, 경도 126.978입니다. (격자 좌표: X=60, Y=127)"
        );
    }

    #[test]
    fn test_coordinates_by_unknown_city() {
        let text = get_coordinates_by_city(" 평양 ");
        assert!(text.starts_with("'평양'에 대한 좌표 정보를 찾을 수 없습니다."));
        assert!(text.ends_with("경북, 경남, 제주"));
    }
}
