use std::sync::atomic::{AtomicU64, Ordering};

use clap::Parser;
use grid2pptx::config::toml_config::FileConfig;
use grid2pptx::core::ProgressObserver;
use grid2pptx::domain::model::GridReference;
use grid2pptx::utils::{logger, validation::Validate};
use grid2pptx::{CliConfig, ConversionEngine, ConversionPipeline, LocalStorage, ResolvedConfig};

/// Logs download progress at coarse steps instead of once per chunk: every
/// 10% when the server declares a total, every 256 KiB otherwise.
#[derive(Default)]
struct LogProgress {
    last_step: AtomicU64,
}

impl ProgressObserver for LogProgress {
    fn on_progress(&self, received: u64, total: Option<u64>) {
        match total {
            Some(total) if total > 0 => {
                let percent = received * 100 / total;
                let step = percent / 10;
                if step != self.last_step.swap(step, Ordering::Relaxed) {
                    tracing::info!(
                        "Downloading presentation: {:.1} KB of {:.1} KB ({}%)",
                        received as f64 / 1024.0,
                        total as f64 / 1024.0,
                        percent
                    );
                }
            }
            _ => {
                let step = received / (256 * 1024);
                if step != self.last_step.swap(step, Ordering::Relaxed) {
                    tracing::info!(
                        "Downloading presentation: {:.1} KB (size unknown)",
                        received as f64 / 1024.0
                    );
                }
            }
        }
    }
}

fn fail(error: &dyn std::fmt::Display) -> ! {
    tracing::error!("{}", error);
    eprintln!("❌ {}", error);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting grid2pptx");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let reference = match GridReference::parse(&cli.grid) {
        Ok(reference) => reference,
        Err(e) => fail(&e),
    };
    tracing::info!("Grid id: {}", reference.id());

    let file_config = match FileConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => fail(&format!("Cannot load {}: {}", cli.config, e)),
    };

    let config = match ResolvedConfig::resolve(&cli, &file_config) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = match ConversionPipeline::new(storage, config, reference) {
        Ok(pipeline) => pipeline.with_progress(Box::new(LogProgress::default())),
        Err(e) => fail(&e),
    };

    let engine = ConversionEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Presentation saved to: {}", output_path);
        }
        Err(e) => fail(&e),
    }
}
