//! Call-processing pipeline: normalization → transcription → translation
//! → interest scoring → result assembly.

pub mod processor;
pub mod types;

pub use processor::CallPipeline;
pub use types::{CallJob, CallResult, ProgressEvent, Stage};
