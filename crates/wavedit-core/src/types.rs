//! Common types for wavedit
//!
//! Fundamental audio types shared by the timeline storage and the
//! waveform view.

/// Audio sample type (16-bit signed, as stored on the timeline)
pub type Sample = i16;

/// Amplitude of a full-scale positive sample
pub const FULL_SCALE: i32 = 32767;

/// Total amplitude range of a sample (peak-to-peak, used for vertical scaling)
pub const SAMPLE_RANGE: u32 = 65536;
