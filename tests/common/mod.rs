mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from shelfscan for tests
pub use shelfscan::{
    Annotator, BoundingBox, Detection, Detector, Label, LocalObjectStore, ObjectStore,
    PipelineError, PipelineOrchestrator,
};
