//! Discounted returns of windows for training value functions.
mod base;
mod config;
pub use base::{ValueBounds, ValueDataset};
pub use config::ValueConfig;
