use crate::domain::model::Matrix;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// `Ok(None)` when the file does not exist.
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 編輯器對後端的兩個呼叫
#[async_trait]
pub trait PricingApi: Send + Sync {
    async fn fetch_matrix(&self) -> Result<Matrix>;
    async fn save_matrix(&self, matrix: &Matrix) -> Result<Matrix>;
}

/// User-facing notices (the browser's `alert`).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

pub const PRICING_PATH: &str = "/api/pricing";
pub const SAVE_PRICING_PATH: &str = "/api/save-pricing";
