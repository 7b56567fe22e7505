//! Shared state for a worker process: its local model instance and the
//! location of its training data on disk (`spec.md` §3: each worker
//! owns a private shard under `{DATA_FOLDER}`).

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::{LinearLearner, Predictor};

/// Descending sample sizes `fit_request_data_sample` tries in order
/// when the worker's local shard is smaller than the requested size
/// (`spec.md` §4.4 edge case: shard smaller than the default sample).
pub const SAMPLE_SIZE_FALLBACKS: &[usize] = &[200, 100, 50, 25, 10, 5, 2];

#[derive(Clone)]
pub struct WorkerState {
    pub data_folder: PathBuf,
    pub train_features_filename: String,
    pub train_labels_filename: String,
    pub predictor: Arc<Mutex<Box<dyn Predictor>>>,
    pub linear_learner: Arc<Mutex<Box<dyn LinearLearner>>>,
}

impl WorkerState {
    pub fn new(
        data_folder: PathBuf,
        train_features_filename: String,
        train_labels_filename: String,
        predictor: Box<dyn Predictor>,
        linear_learner: Box<dyn LinearLearner>,
    ) -> Self {
        Self {
            data_folder,
            train_features_filename,
            train_labels_filename,
            predictor: Arc::new(Mutex::new(predictor)),
            linear_learner: Arc::new(Mutex::new(linear_learner)),
        }
    }

    pub fn features_path(&self) -> PathBuf {
        self.data_folder.join(&self.train_features_filename)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.data_folder.join(&self.train_labels_filename)
    }
}
