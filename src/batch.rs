use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::detection::ChopDetector;
use crate::models::{Detection, DetectionResult};
use crate::source::{ImageLoader, ImageSource};

/// Error text reported for every item without a detection
pub const DETECTION_FAILED: &str = "Detection failed";

/// One line of a batch report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchRecord {
    Detected {
        #[serde(flatten)]
        result: DetectionResult,
        image_url: String,
        width: u32,
        height: u32,
    },
    Failed {
        image_url: String,
        error: String,
    },
}

impl BatchRecord {
    pub fn failed(image_url: impl Into<String>) -> Self {
        BatchRecord::Failed {
            image_url: image_url.into(),
            error: DETECTION_FAILED.to_string(),
        }
    }

    pub fn image_url(&self) -> &str {
        match self {
            BatchRecord::Detected { image_url, .. } | BatchRecord::Failed { image_url, .. } => image_url.as_str(),
        }
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        match self {
            BatchRecord::Detected { result, .. } => Some(result),
            BatchRecord::Failed { .. } => None,
        }
    }
}

/// Runs the detector over many sources with bounded parallelism.
///
/// Each item is loaded, decoded and detected independently; any failure
/// becomes a `Failed` record and never stops the rest of the batch.
pub struct BatchRunner {
    detector: Arc<ChopDetector>,
    loader: ImageLoader,
    jobs: usize,
}

impl BatchRunner {
    pub fn new(detector: ChopDetector, loader: ImageLoader) -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            detector: Arc::new(detector),
            loader,
            jobs,
        }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Process all sources; records come back in input order
    pub async fn run(&self, sources: Vec<ImageSource>) -> Vec<BatchRecord> {
        let total = sources.len();
        let identifiers: Vec<String> = sources.iter().map(ImageSource::identifier).collect();
        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut tasks = JoinSet::new();

        for (index, source) in sources.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            let detector = self.detector.clone();
            let loader = self.loader.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let record = process_one(&loader, detector, index, source).await;
                (index, record)
            });
        }

        let mut records: Vec<Option<BatchRecord>> = vec![None; total];
        let mut done = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, record)) => {
                    done += 1;
                    info!(
                        "[{}/{}] {} -> {}",
                        done,
                        total,
                        record.image_url(),
                        if record.result().is_some() { "detected" } else { "not detected" }
                    );
                    records[index] = Some(record);
                }
                Err(e) => warn!(error = %e, "Batch task aborted"),
            }
        }

        records
            .into_iter()
            .zip(identifiers)
            .map(|(record, id)| record.unwrap_or_else(|| BatchRecord::failed(id)))
            .collect()
    }
}

async fn process_one(
    loader: &ImageLoader,
    detector: Arc<ChopDetector>,
    index: usize,
    source: ImageSource,
) -> BatchRecord {
    let image_url = source.identifier();

    let loaded = match loader.load(&source).await {
        Ok(loaded) => loaded,
        Err(e) => {
            let reason = format!("{:#}", e);
            warn!(source = %image_url, error = %reason, "Failed to load image");
            return BatchRecord::failed(image_url);
        }
    };

    let (width, height) = (loaded.width(), loaded.height());
    // Index prefix keeps debug dumps of repeated file names apart
    let label = format!("{:03}_{}", index + 1, source.label());
    let detection = tokio::task::spawn_blocking(move || {
        detector.detect_with_label(&loaded.image, &label)
    })
    .await;

    match detection {
        Ok(Detection::Detected(result)) => BatchRecord::Detected {
            result,
            image_url,
            width,
            height,
        },
        Ok(Detection::NotDetected) => BatchRecord::failed(image_url),
        Err(e) => {
            warn!(source = %image_url, error = %e, "Detection task panicked");
            BatchRecord::failed(image_url)
        }
    }
}
