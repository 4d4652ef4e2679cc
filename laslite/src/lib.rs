#![deny(unused_must_use)]

pub mod cloud;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod header;
pub mod point;
pub mod reader;
pub mod vlr;

pub use nalgebra;

pub use cloud::LasData;
pub use error::ReadLasError;
pub use reader::{read, read_with, try_read_with, ReadOptions};
