pub mod handlers;
pub mod hub;
pub mod presentation;
pub mod state;

pub use hub::SensorHub;
pub use presentation::PresentationState;
