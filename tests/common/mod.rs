#![allow(dead_code, unused_imports)]

pub mod image;

pub use image::{ImageBuilder, Row, Table};
