use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use tracing::instrument;

use super::MetricsSource;
use crate::{
    error::{AppError, AppResult},
    models::AnalysisReport,
};

/// Client for the repository analysis service
pub struct AnalysisClient {
    http_client: HttpClient,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn report_url(&self, selected_repositories_id: &str) -> String {
        format!("{}/analysis/{}", self.base_url, selected_repositories_id)
    }
}

#[async_trait::async_trait]
impl MetricsSource for AnalysisClient {
    #[instrument(skip(self))]
    async fn load_analysis(&self, selected_repositories_id: &str) -> AppResult<AnalysisReport> {
        let url = self.report_url(selected_repositories_id);
        tracing::debug!(url = %url, "Fetching analysis report");

        let response = self.http_client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::MissingInputData(format!(
                "No analysis found for repository selection {}",
                selected_repositories_id
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                selected_repositories_id = %selected_repositories_id,
                status = %status,
                body = %body,
                "Analysis service request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Analysis service returned status {}: {}",
                status, body
            )));
        }

        // The analyzer may prefix its JSON with a byte-order mark
        let body = response.text().await?;
        let report = AnalysisReport::from_json_str(&body)?;

        tracing::info!(
            selected_repositories_id = %selected_repositories_id,
            repositories = report.repositories.len(),
            "Fetched analysis report"
        );

        Ok(report)
    }
}
