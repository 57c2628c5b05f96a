//! Aircraft feed client
//!
//! Fetches `aircraft.json` from a tar1090/readsb instance. The source sits
//! behind a trait so the watcher can be driven by a fake in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::aircraft::{AircraftFrame, FeedResponse};

/// Per-request timeout for the feed; a slow receiver must not stall the loop
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of one cycle's aircraft list
#[async_trait]
pub trait AircraftSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<AircraftFrame>>;
}

/// HTTP client for a tar1090/readsb `aircraft.json` endpoint
pub struct AdsbFeed {
    client: reqwest::Client,
    url: String,
}

impl AdsbFeed {
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("build feed HTTP client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl AircraftSource for AdsbFeed {
    async fn fetch(&self) -> Result<Vec<AircraftFrame>> {
        let response: FeedResponse = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {}", self.url))?
            .json()
            .await
            .with_context(|| format!("parse body {}", self.url))?;

        Ok(response
            .aircraft
            .into_iter()
            .map(AircraftFrame::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_body_parses_into_frames() {
        let body = r#"{"now":1724900000.0,"messages":12345,"aircraft":[
            {"hex":"4ca1d2","flight":"SAS1417 ","lat":56.21,"lon":10.31,"alt_baro":12000},
            {"hex":"45ac2f","alt_baro":"ground"},
            {}
        ]}"#;
        let response: FeedResponse = serde_json::from_str(body).unwrap();
        let frames: Vec<AircraftFrame> = response.aircraft.into_iter().map(Into::into).collect();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].callsign.as_deref(), Some("SAS1417"));
        assert_eq!(frames[1].altitude_ft, None);
        assert_eq!(frames[2].hex, "");
    }
}
