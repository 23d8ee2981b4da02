#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from chopfinder for tests
pub use chopfinder::{
    BatchRecord, BatchRunner, ChannelOrder, ChopDetector, Detection, DetectionResult,
    DetectorConfig, HsvRange, ImageLoader, ImageSource, MorphologyConfig,
};
