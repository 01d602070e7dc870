//! KMA nowcast API client
//!
//! This module provides the HTTP client for the data.go.kr village forecast
//! service (`getUltraSrtNcst`). It picks the announcement slot to request,
//! performs a single GET under a timeout, decodes the XML body and checks the
//! provider's result code. There are no retries.

use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Asia::Seoul;
use reqwest::{Client, Url};
use std::fmt::Display;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::response::NORMAL_SERVICE;
use crate::models::{GridCell, UltraSrtNcstResponse};
use crate::{Result, WeatherError};

/// Operation name of the ultra-short-term nowcast
pub const ULTRA_SRT_NCST: &str = "getUltraSrtNcst";

/// Minute past the hour at which the nowcast for that hour is published
pub const PUBLISH_MINUTE: u32 = 40;

/// Announcement slot sent as `base_date`/`base_time`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTime {
    /// YYYYMMDD
    pub date: String,
    /// HH00
    pub time: String,
}

impl BaseTime {
    /// Latest slot already published at `instant`
    ///
    /// Before minute 40 the previous hour is used; the date follows the
    /// adjusted hour, so shortly after midnight the previous day is requested.
    pub fn for_instant<Tz>(instant: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let slot = if instant.minute() < PUBLISH_MINUTE {
            instant.clone() - TimeDelta::hours(1)
        } else {
            instant.clone()
        };
        Self {
            date: slot.format("%Y%m%d").to_string(),
            time: slot.format("%H00").to_string(),
        }
    }

    /// Latest published slot in Korea Standard Time
    #[must_use]
    pub fn now() -> Self {
        Self::for_instant(&Utc::now().with_timezone(&Seoul))
    }
}

/// Anything that can produce a nowcast response for a grid cell
///
/// The returned future is not required to be `Send`; the server drives one
/// request at a time on its own task.
#[allow(async_fn_in_trait)]
pub trait ObservationSource {
    async fn fetch_observations(
        &self,
        cell: GridCell,
        base: &BaseTime,
    ) -> Result<UltraSrtNcstResponse>;
}

/// Client for the data.go.kr village forecast service
pub struct KmaClient {
    /// HTTP client
    client: Client,
    /// Service configuration
    config: WeatherConfig,
}

impl KmaClient {
    /// Create a new client; the configured timeout bounds every request
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("korea-weather/{}", crate::VERSION))
            .build()
            .map_err(|e| WeatherError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Full request URL including the service key
    pub fn request_url(&self, api_key: &str, cell: GridCell, base: &BaseTime) -> Result<Url> {
        let endpoint = format!("{}/{}", self.config.base_url, ULTRA_SRT_NCST);
        let params = [
            ("serviceKey", api_key.to_string()),
            ("numOfRows", self.config.num_of_rows.to_string()),
            ("pageNo", "1".to_string()),
            ("dataType", "XML".to_string()),
            ("base_date", base.date.clone()),
            ("base_time", base.time.clone()),
            ("nx", cell.x.to_string()),
            ("ny", cell.y.to_string()),
        ];
        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| WeatherError::config(format!("Invalid base URL '{endpoint}': {e}")))
    }
}

impl ObservationSource for KmaClient {
    #[instrument(skip(self), fields(nx = cell.x, ny = cell.y))]
    async fn fetch_observations(
        &self,
        cell: GridCell,
        base: &BaseTime,
    ) -> Result<UltraSrtNcstResponse> {
        let api_key = self.config.api_key()?;
        let url = self.request_url(api_key, cell, base)?;

        debug!(
            "Requesting {}/{} for {}{}",
            self.config.base_url, ULTRA_SRT_NCST, base.date, base.time
        );
        let start_time = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Nowcast request failed: {}", e);
            WeatherError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Nowcast request returned HTTP {}", status);
            return Err(WeatherError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let decoded: UltraSrtNcstResponse = quick_xml::de::from_str(&body).map_err(|e| {
            error!("Failed to decode nowcast XML: {}", e);
            WeatherError::from(e)
        })?;
        check_result(&decoded)?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {} nowcast items in {:.3}s",
            decoded.items().map_or(0, <[_]>::len),
            total_duration.as_secs_f64()
        );
        if total_duration > Duration::from_secs(5) {
            warn!(
                "Slow API response detected: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(decoded)
    }
}

/// Turn a provider-reported failure into `UpstreamResult`
pub fn check_result(response: &UltraSrtNcstResponse) -> Result<()> {
    if let Some(gateway) = &response.gateway_header {
        let message = if gateway.return_auth_msg.is_empty() {
            gateway.err_msg.clone()
        } else {
            gateway.return_auth_msg.clone()
        };
        return Err(WeatherError::UpstreamResult {
            code: gateway.return_reason_code.clone(),
            message,
        });
    }

    match &response.header {
        Some(header) if header.result_code.trim() != NORMAL_SERVICE => {
            Err(WeatherError::UpstreamResult {
                code: header.result_code.trim().to_string(),
                message: header.result_msg.clone(),
            })
        }
        _ => Ok(()),
    }
}
