use chrono::Local;

use crate::core::flatten::GridFlattener;
use crate::core::grid_api::GridClient;
use crate::core::pptx_api::PresentationClient;
use crate::domain::model::{FlattenedGrid, GenerateOptions, GridDocument, GridReference};
use crate::domain::ports::{ConfigProvider, NoopProgress, Pipeline, ProgressObserver, Storage};
use crate::utils::error::Result;

/// Wires one conversion together: grid fetch, flatten, presentation
/// generation and artifact persistence. Holds no state across runs beyond
/// the configured clients.
pub struct ConversionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    reference: GridReference,
    grid: GridClient,
    pptx: PresentationClient,
    flattener: GridFlattener,
    progress: Box<dyn ProgressObserver>,
}

impl<S: Storage, C: ConfigProvider> ConversionPipeline<S, C> {
    pub fn new(storage: S, config: C, reference: GridReference) -> Result<Self> {
        let grid = GridClient::new(&config)?;
        let pptx = PresentationClient::new(&config)?;

        Ok(Self {
            storage,
            config,
            reference,
            grid,
            pptx,
            flattener: GridFlattener::new(),
            progress: Box::new(NoopProgress),
        })
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    fn artifact_name(&self) -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("grid_{}_{}.pptx", self.reference.id(), timestamp)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ConversionPipeline<S, C> {
    async fn fetch(&self) -> Result<GridDocument> {
        self.grid.fetch(&self.reference).await
    }

    async fn flatten(&self, document: GridDocument) -> Result<FlattenedGrid> {
        Ok(self.flattener.flatten(&document))
    }

    async fn load(&self, flattened: FlattenedGrid) -> Result<String> {
        let options = GenerateOptions {
            tab: self.config.tab().to_string(),
            template_type: self.config.template_type(),
        };

        let content = self
            .pptx
            .generate(&flattened, &options, self.progress.as_ref())
            .await?;

        let file_name = self.artifact_name();
        tracing::debug!("Writing artifact ({} bytes) to {}", content.len(), file_name);
        self.storage.write_file(&file_name, &content).await?;

        Ok(format!("{}/{}", self.config.output_path(), file_name))
    }
}
