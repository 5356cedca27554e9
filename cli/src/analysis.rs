use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use snapbite_core::analysis::{AnalysisResponse, AnalyzeRequest};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/analyze";

/// Client side of the analysis contract: posts a base64 image payload
/// and hands back whatever shape the endpoint answered with. Callers
/// decide what an error payload means (no entry, user notified).
pub struct AnalysisClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AnalysisClient {
    pub fn new(endpoint: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "snapbite-cli/{} (nutrition tracker)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, endpoint }
    }

    pub async fn analyze_image(&self, image_bytes: &[u8]) -> Result<AnalysisResponse> {
        let encoded = STANDARD.encode(image_bytes);
        let request = AnalyzeRequest {
            image: format!("data:image/jpeg;base64,{encoded}"),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the analysis endpoint")?;

        let data: AnalysisResponse = resp
            .json()
            .await
            .context("Failed to parse the analysis response")?;

        Ok(data)
    }
}
