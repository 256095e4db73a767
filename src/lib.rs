pub mod annotate;
pub mod config;
pub mod detection;
pub mod error;
pub mod event;
pub mod grouping;
pub mod handler;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod provision;
pub mod storage;

pub use annotate::{Annotator, label_text};
pub use detection::{Detector, YoloDetector};
pub use error::{DetectError, PipelineError, StorageError};
pub use grouping::{UNKNOWN_GROUP, filename_from_key, group_key, output_key};
pub use handler::Handler;
pub use models::{AnnotatedImage, BoundingBox, Detection, Label, PipelineResult};
pub use pipeline::PipelineOrchestrator;
pub use storage::{LocalObjectStore, ObjectStore};
