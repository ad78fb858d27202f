pub mod config;
pub mod error;
pub mod record;
pub mod series;
pub mod lifecycle;
pub mod services;
pub mod tracker;

// Re-export specific items for convenient access
pub use error::{Result, TrackerError};
pub use tracker::{Capture, Tracker};
