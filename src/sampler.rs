//! Random reduction of a document's `features` array.
//!
//! `run` is the whole pass the `clean_data` binary performs: load, sample
//! at most [`SAMPLE_CAP`] features, write next to the input under the
//! "clean" name. The sampling itself is uniform without replacement and
//! never seeded outside of tests.

use std::path::{Path, PathBuf};

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use crate::document::{features_mut, load_document};
use crate::error::{Result, SampleError};
use crate::output::{derive_output_path, write_new, OutputFormat};

/// Upper bound on the number of features kept.
pub const SAMPLE_CAP: usize = 500;

/// Progress points reported while a run is under way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Loaded { features: usize },
    Sampled { taken: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleReport {
    pub features_before: usize,
    pub taken: usize,
    pub output: PathBuf,
}

/// Keep `min(len, cap)` features, every subset of that size equally likely.
/// Returns how many were kept.
pub fn sample_features<R: Rng + ?Sized>(features: &mut Vec<Value>, cap: usize, rng: &mut R) -> usize {
    let take = features.len().min(cap);
    features.shuffle(rng);
    features.truncate(take);
    take
}

/// Sample the `features` of `doc` in place, returning `(before, taken)`.
pub fn sample_document<R: Rng + ?Sized>(doc: &mut Value, cap: usize, rng: &mut R) -> Result<(usize, usize)> {
    let features = features_mut(doc)?;
    let before = features.len();
    let taken = sample_features(features, cap, rng);
    Ok((before, taken))
}

/// Full pass with the fixed cap and a thread-local RNG.
pub fn run(input: &Path, format: OutputFormat, on_progress: impl FnMut(Progress)) -> Result<SampleReport> {
    run_with(input, SAMPLE_CAP, format, &mut rand::thread_rng(), on_progress)
}

pub fn run_with<R: Rng + ?Sized>(
    input: &Path,
    cap: usize,
    format: OutputFormat,
    rng: &mut R,
    mut on_progress: impl FnMut(Progress),
) -> Result<SampleReport> {
    if !input.exists() {
        return Err(SampleError::InputNotFound { path: input.to_path_buf() });
    }
    info!("Input file: {}", input.display());

    let mut doc = load_document(input)?;

    let (features_before, taken) = sample_document(&mut doc, cap, rng)?;
    info!("Loaded {features_before} features");
    on_progress(Progress::Loaded { features: features_before });
    on_progress(Progress::Sampled { taken });

    let output = derive_output_path(input);
    info!("Writing {taken} features to {}", output.display());
    write_new(&output, &doc, format)?;

    Ok(SampleReport { features_before, taken, output })
}
