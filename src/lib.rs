//! Shrink GeoJSON feature collections to a random sample of at most
//! [`SAMPLE_CAP`] features.

pub mod document;
pub mod error;
pub mod output;
pub mod sampler;

pub use error::{Result, SampleError};
pub use output::{derive_output_path, OutputFormat};
pub use sampler::{run, run_with, sample_document, sample_features, Progress, SampleReport, SAMPLE_CAP};
