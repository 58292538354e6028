use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::errors::ChartError;
use crate::models::query::ChartQuery;
use crate::models::response::RawResponse;
use crate::models::settings::ClientSettings;
use super::traits::ChartDataSource;

/// Fetches chart data from the chart server over HTTP.
///
/// `GET {base_url}{chart_data_path}?stock=..&type=..&start=..&end=..[&avg=..&include=0|1]`
pub struct HttpChartSource {
    client: Client,
    endpoint: Url,
}

impl HttpChartSource {
    pub fn new(settings: &ClientSettings) -> Result<Self, ChartError> {
        let endpoint = Url::parse(&settings.base_url)?.join(&settings.chart_data_path)?;

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        let client = builder.build().unwrap_or_else(|_| Client::new());

        Ok(Self { client, endpoint })
    }

    /// Full request URL for a query.
    pub fn url_for(&self, query: &ChartQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(&query.query_string()));
        url
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ChartDataSource for HttpChartSource {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_chart_data(&self, query: &ChartQuery) -> Result<RawResponse, ChartError> {
        let url = self.url_for(query);
        debug!(endpoint = %self.endpoint, instruments = ?query.instruments, "requesting chart data");

        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let body: Value = resp.json().await?;

        debug!(status, "chart data received");
        Ok(RawResponse::new(status, body))
    }
}
