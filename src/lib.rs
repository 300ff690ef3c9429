pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, ResolvedConfig};

pub use core::{engine::ConversionEngine, pipeline::ConversionPipeline};
pub use utils::error::{ConvertError, Result};
