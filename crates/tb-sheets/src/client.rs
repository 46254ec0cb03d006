//! HTTP client for the sheet values API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use tb_core::{SheetConfig, SheetStore};

use crate::error::{Result, SheetError};

/// Response body of a values range read.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Client for a Sheets-style values endpoint.
pub struct SheetClient {
    client: Client,
    config: SheetConfig,
    base_url: String,
}

impl SheetClient {
    /// Create a new sheet client.
    pub fn new(config: SheetConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| SheetError::Configuration(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        info!("Sheet client initialized for: {}", base_url);

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Fetch the configured range, header row included.
    pub async fn fetch_rows(&self) -> Result<Vec<Vec<String>>> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url, self.config.spreadsheet_id, self.config.range
        );

        debug!("Fetching sheet values from: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| SheetError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Values request failed: {} - {}", status, error_text);
            return Err(SheetError::ValuesApi(format!(
                "Request failed: {} - {}",
                status, error_text
            )));
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetError::ParseError(e.to_string()))?;

        info!("Fetched {} sheet rows", range.values.len());
        Ok(range.values)
    }
}

#[async_trait]
impl SheetStore for SheetClient {
    async fn read_rows(&self) -> tb_core::Result<Vec<Vec<String>>> {
        Ok(self.fetch_rows().await?)
    }
}
