pub mod max_tracker;
pub mod orientation_pipeline;

pub use max_tracker::MaxTracker;
pub use orientation_pipeline::OrientationPipeline;
