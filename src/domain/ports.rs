use crate::domain::model::{FlattenedGrid, GridDocument, TemplateType};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn grid_base_url(&self) -> &str;
    fn grid_api_key(&self) -> &str;
    fn pptx_base_url(&self) -> &str;
    fn pptx_api_key(&self) -> &str;
    fn tab(&self) -> &str;
    fn template_type(&self) -> TemplateType;
    fn output_path(&self) -> &str;
    /// `None` means the underlying HTTP client applies no request timeout,
    /// so a stalled server can block the conversion indefinitely.
    fn request_timeout(&self) -> Option<Duration>;
}

/// Download progress callback, decoupled from any rendering surface.
/// `total` is the declared content length when the server provides one;
/// `received` never exceeds it.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, received: u64, total: Option<u64>);
}

/// Discards all progress updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&self, _received: u64, _total: Option<u64>) {}
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn fetch(&self) -> Result<GridDocument>;
    async fn flatten(&self, document: GridDocument) -> Result<FlattenedGrid>;
    async fn load(&self, flattened: FlattenedGrid) -> Result<String>;
}
