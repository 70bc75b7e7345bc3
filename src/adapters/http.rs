use crate::domain::model::Matrix;
use crate::domain::ports::{PricingApi, PRICING_PATH, SAVE_PRICING_PATH};
use crate::utils::error::{PricingError, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Response};

/// `PricingApi` over HTTP against the pricing server.
pub struct HttpPricingApi {
    client: Client,
    api_base: String,
}

impl HttpPricingApi {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl PricingApi for HttpPricingApi {
    async fn fetch_matrix(&self) -> Result<Matrix> {
        let url = self.endpoint(PRICING_PATH);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let matrix = ensure_success(response).await?.json::<Matrix>().await?;
        Ok(matrix)
    }

    async fn save_matrix(&self, matrix: &Matrix) -> Result<Matrix> {
        let url = self.endpoint(SAVE_PRICING_PATH);
        tracing::debug!("Posting pricing matrix to: {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(matrix)
            .send()
            .await?;
        tracing::debug!("API response status: {}", response.status());

        let saved = ensure_success(response).await?.json::<Matrix>().await?;
        Ok(saved)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(PricingError::UnexpectedStatusError {
        status: status.as_u16(),
        body,
    })
}
