use crate::core::Pipeline;
use crate::utils::error::Result;

/// Drives one conversion through its three stages. No retries: the first
/// failure ends the run.
pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Fetching grid document...");
        let document = self.pipeline.fetch().await?;

        tracing::info!("Flattening grid...");
        let flattened = self.pipeline.flatten(document).await?;
        tracing::info!(
            "Flattened {} rows across {} columns",
            flattened.entries.len(),
            flattened.columns.len()
        );

        tracing::info!("Generating presentation...");
        let output_path = self.pipeline.load(flattened).await?;
        tracing::info!("Presentation saved to: {}", output_path);

        Ok(output_path)
    }
}
