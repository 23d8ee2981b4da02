pub mod batch;
pub mod debug;
pub mod detection;
pub mod models;
pub mod source;

pub use batch::{BatchRecord, BatchRunner};
pub use detection::{ChannelOrder, ChopDetector, DetectorConfig, HsvRange, MorphologyConfig};
pub use models::{BoundingRect, Contour, Detection, DetectionResult};
pub use source::{ImageLoader, ImageSource, LoadedImage, parse_source_list};
