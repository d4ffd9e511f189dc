//! Shared fixtures for unit tests.
//!
//! The image builder is shared with the integration tests under `tests/common`.

#[allow(dead_code)]
#[path = "../../tests/common/image.rs"]
mod image;

pub use image::{ImageBuilder, Row, Table};
