// core/src/pipeline/mod.rs

//! A small async step runner. Each multi-step order workflow is declared as a
//! `Pipeline` of named steps operating on one `ContextData<T>`.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Pipeline};
