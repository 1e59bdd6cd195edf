//! Fitness test grading library and JSON-lines sidecar.

pub mod config;
pub mod error;
pub mod grading;
pub mod ipc;
pub mod results;

pub use grading::{classify, grade, Rank};
