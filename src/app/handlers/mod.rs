pub mod calibration;
pub mod data_collection;

pub use calibration::CalibrationHandler;
pub use data_collection::DataCollectionHandler;
