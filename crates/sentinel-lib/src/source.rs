//! Prometheus metric source
//!
//! HTTP client for the instantaneous query endpoint (detection path) and
//! the range query endpoint (export path). Every failure mode crossing
//! this boundary is a tagged [`FetchError`]; nothing panics past it.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::FetchError;
use crate::models::Sample;

/// Instant query timeout
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);
/// Range query timeout (larger payloads)
const RANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of scalar metric readings.
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Fetch the current value of the watched metric.
    async fn fetch_current(&self) -> Result<Sample, FetchError>;

    /// Fetch a time-bounded sequence of readings.
    ///
    /// `start` and `end` are epoch seconds with `start < end`; `step` is
    /// the positive resolution of the returned series.
    async fn fetch_range(
        &self,
        start: i64,
        end: i64,
        step: Duration,
    ) -> Result<Vec<Sample>, FetchError>;
}

// Prometheus API response shapes. Only the fields we consume.

#[derive(Debug, Deserialize)]
struct InstantResponse {
    data: InstantData,
}

#[derive(Debug, Deserialize)]
struct InstantData {
    result: Vec<InstantResult>,
}

#[derive(Debug, Deserialize)]
struct InstantResult {
    /// `[timestamp, value_as_string]`
    value: (f64, String),
}

#[derive(Debug, Deserialize)]
struct RangeResponse {
    data: RangeData,
}

#[derive(Debug, Deserialize)]
struct RangeData {
    result: Vec<RangeResult>,
}

#[derive(Debug, Deserialize)]
struct RangeResult {
    /// `[[timestamp, value_as_string], ...]`
    values: Vec<(f64, String)>,
}

/// Client for a Prometheus-compatible query API.
pub struct PromClient {
    client: Client,
    base_url: Url,
    query: String,
}

impl PromClient {
    /// Create a client for `base_url`, watching the metric produced by
    /// the PromQL expression `query`.
    pub fn new(base_url: &str, query: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to create HTTP client")?;

        let mut base_url = Url::parse(base_url).context("invalid Prometheus URL")?;

        // A trailing slash makes relative joins append to the base path,
        // so a backend mounted under a prefix keeps that prefix.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            client,
            base_url,
            query: query.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::Parse(format!("invalid endpoint path: {e}")))
    }

    fn parse_point(pair: &(f64, String)) -> Result<Sample, FetchError> {
        let value: f64 = pair
            .1
            .parse()
            .map_err(|_| FetchError::Parse(format!("non-numeric sample value: {:?}", pair.1)))?;

        Ok(Sample::new(pair.0 as i64, value))
    }
}

#[async_trait]
impl MetricSource for PromClient {
    async fn fetch_current(&self) -> Result<Sample, FetchError> {
        let response = self
            .client
            .get(self.endpoint("api/v1/query")?)
            .query(&[("query", self.query.as_str())])
            .timeout(QUERY_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }

        let body: InstantResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let first = body.data.result.first().ok_or(FetchError::EmptyResult)?;
        Self::parse_point(&first.value)
    }

    async fn fetch_range(
        &self,
        start: i64,
        end: i64,
        step: Duration,
    ) -> Result<Vec<Sample>, FetchError> {
        if start >= end {
            return Err(FetchError::InvalidRange(format!(
                "start ({start}) must be before end ({end})"
            )));
        }
        // The step is rendered in whole seconds, so anything below one
        // second would silently become "0s".
        if step.as_secs() == 0 {
            return Err(FetchError::InvalidRange(
                "step must be at least one second".into(),
            ));
        }

        let response = self
            .client
            .get(self.endpoint("api/v1/query_range")?)
            .query(&[
                ("query", self.query.as_str()),
                ("start", &start.to_string()),
                ("end", &end.to_string()),
                ("step", &format!("{}s", step.as_secs())),
            ])
            .timeout(RANGE_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }

        let body: RangeResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        // An empty result here means a misconfigured or unreachable
        // exporter, not an absence of data.
        let first = body.data.result.first().ok_or(FetchError::EmptyResult)?;
        if first.values.is_empty() {
            return Err(FetchError::EmptyResult);
        }

        first.values.iter().map(Self::parse_point).collect()
    }
}
