//! Turns Micro-Manager TIFF sequences into movies with an external encoder
//! and joins two such movies by stream copy.

pub mod concat;
pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod frames;
pub mod logging;
pub mod prompt;
pub mod source;
pub mod workflow;

pub use error::{Error, Result};
