pub mod engine;
pub mod flatten;
pub mod grid_api;
pub mod pipeline;
pub mod pptx_api;

pub use crate::domain::model::{
    FlatEntry, FlattenedGrid, GenerateOptions, GridDocument, GridReference, TemplateType,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ProgressObserver, Storage};
pub use crate::utils::error::Result;
pub use engine::ConversionEngine;
pub use flatten::GridFlattener;
pub use grid_api::GridClient;
pub use pipeline::ConversionPipeline;
pub use pptx_api::PresentationClient;
