//! Wavedit Core - sample timeline storage and display downsampling

pub mod timeline;
pub mod types;

pub use timeline::{Channel, Timeline, TimelineError, TimelineResult, CHUNK_CAPACITY};
pub use types::*;
